//! Field schema: the declarative description of a single form field.

use crate::layout::ColumnSpan;
use crate::visibility::VisibilityCondition;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Input kind of a field.
///
/// `Heading` and `Divider` are presentational: they carry no value and are
/// never validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
	Text,
	Textarea,
	Number,
	Email,
	Password,
	Date,
	Select,
	Multiselect,
	Checkbox,
	Radio,
	Toggle,
	File,
	Hidden,
	Heading,
	Divider,
}

impl FieldType {
	/// Whether the field collects a value from the user.
	pub fn is_input(self) -> bool {
		!matches!(self, FieldType::Heading | FieldType::Divider)
	}

	/// Whether the field draws its values from `options`.
	pub fn has_options(self) -> bool {
		matches!(
			self,
			FieldType::Select | FieldType::Radio | FieldType::Multiselect
		)
	}

	/// Whether length and pattern rules apply.
	pub fn is_text_like(self) -> bool {
		matches!(
			self,
			FieldType::Text | FieldType::Textarea | FieldType::Password
		)
	}

	/// Whether an unchecked `false` counts as "no answer" for the required check.
	pub fn is_boolean(self) -> bool {
		matches!(self, FieldType::Checkbox | FieldType::Toggle)
	}
}

impl fmt::Display for FieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			FieldType::Text => "text",
			FieldType::Textarea => "textarea",
			FieldType::Number => "number",
			FieldType::Email => "email",
			FieldType::Password => "password",
			FieldType::Date => "date",
			FieldType::Select => "select",
			FieldType::Multiselect => "multiselect",
			FieldType::Checkbox => "checkbox",
			FieldType::Radio => "radio",
			FieldType::Toggle => "toggle",
			FieldType::File => "file",
			FieldType::Hidden => "hidden",
			FieldType::Heading => "heading",
			FieldType::Divider => "divider",
		};
		f.write_str(name)
	}
}

/// One selectable choice of a select, radio or multiselect field.
///
/// `value` is kept as JSON so that numeric option values (`1`, `2`) match
/// both numeric and string answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
	pub value: serde_json::Value,
	pub label: String,
}

impl FieldOption {
	pub fn new(value: impl Into<serde_json::Value>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

/// A compiled regular expression that serializes as its source string.
///
/// An invalid expression fails deserialization, so a field carrying a broken
/// pattern is reported as malformed at load time instead of at validation time.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
	pub fn new(source: &str) -> Result<Self, regex::Error> {
		Regex::new(source).map(Self)
	}

	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}

	pub fn is_match(&self, value: &str) -> bool {
		self.0.is_match(value)
	}
}

impl fmt::Debug for Pattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Pattern").field(&self.as_str()).finish()
	}
}

impl PartialEq for Pattern {
	fn eq(&self, other: &Self) -> bool {
		self.as_str() == other.as_str()
	}
}

impl Serialize for Pattern {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for Pattern {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let source = String::deserialize(deserializer)?;
		Pattern::new(&source).map_err(serde::de::Error::custom)
	}
}

/// Optional validation rules attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_length: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_length: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pattern: Option<Pattern>,
	/// Replaces the built-in message of every rule failure except the
	/// required check.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

/// A single field of a form section.
///
/// Deserialization goes through [`RawFieldDefinition`] so that structural
/// problems (missing `name` on an input field, a choice field without
/// options) are rejected per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawFieldDefinition")]
pub struct FieldDefinition {
	pub id: String,
	pub name: String,
	#[serde(rename = "type")]
	pub field_type: FieldType,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub placeholder: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub help_text: Option<String>,
	pub required: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub validation: Option<ValidationRules>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<FieldOption>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub visible_if: Option<VisibilityCondition>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub column_span: Option<ColumnSpan>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFieldDefinition {
	id: Option<String>,
	name: Option<String>,
	#[serde(rename = "type")]
	field_type: FieldType,
	#[serde(default)]
	label: Option<String>,
	#[serde(default)]
	placeholder: Option<String>,
	#[serde(default)]
	help_text: Option<String>,
	#[serde(default)]
	required: bool,
	#[serde(default)]
	validation: Option<ValidationRules>,
	#[serde(default)]
	options: Vec<FieldOption>,
	#[serde(default)]
	visible_if: Option<VisibilityCondition>,
	#[serde(default)]
	column_span: Option<ColumnSpan>,
}

impl TryFrom<RawFieldDefinition> for FieldDefinition {
	type Error = String;

	fn try_from(raw: RawFieldDefinition) -> Result<Self, Self::Error> {
		let name = raw.name.filter(|n| !n.trim().is_empty());
		let id = raw.id.filter(|i| !i.trim().is_empty());

		let name = match (name, raw.field_type.is_input()) {
			(Some(name), _) => name,
			(None, false) => id
				.clone()
				.ok_or_else(|| format!("{} field is missing both `id` and `name`", raw.field_type))?,
			(None, true) => {
				return Err(format!("{} field is missing `name`", raw.field_type));
			}
		};
		let id = id.unwrap_or_else(|| name.clone());

		if raw.field_type.has_options() && raw.options.is_empty() {
			return Err(format!(
				"{} field `{}` has no options",
				raw.field_type, name
			));
		}

		Ok(Self {
			id,
			name,
			field_type: raw.field_type,
			label: raw.label,
			placeholder: raw.placeholder,
			help_text: raw.help_text,
			required: raw.required,
			validation: raw.validation,
			options: raw.options,
			visible_if: raw.visible_if,
			column_span: raw.column_span,
		})
	}
}

impl FieldDefinition {
	/// Create a field whose `id` equals its `name`.
	///
	/// # Examples
	///
	/// ```
	/// use formdeck_forms::{FieldDefinition, FieldType};
	///
	/// let field = FieldDefinition::new("email", FieldType::Email);
	/// assert_eq!(field.id, "email");
	/// assert_eq!(field.name, "email");
	/// assert!(!field.required);
	/// ```
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		let name = name.into();
		Self {
			id: name.clone(),
			name,
			field_type,
			label: None,
			placeholder: None,
			help_text: None,
			required: false,
			validation: None,
			options: vec![],
			visible_if: None,
			column_span: None,
		}
	}

	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = id.into();
		self
	}

	/// Mark the field as required
	///
	/// # Examples
	///
	/// ```
	/// use formdeck_forms::{FieldDefinition, FieldType};
	///
	/// let field = FieldDefinition::new("age", FieldType::Number).required();
	/// assert!(field.required);
	/// ```
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}

	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}

	pub fn with_validation(mut self, rules: ValidationRules) -> Self {
		self.validation = Some(rules);
		self
	}

	pub fn with_option(mut self, option: FieldOption) -> Self {
		self.options.push(option);
		self
	}

	/// Show the field only when `condition` holds
	///
	/// # Examples
	///
	/// ```
	/// use formdeck_forms::{FieldDefinition, FieldType, Operator, VisibilityCondition};
	/// use serde_json::json;
	///
	/// let field = FieldDefinition::new("pet_name", FieldType::Text)
	///     .with_visible_if(VisibilityCondition::new("has_pet", Operator::Equals, json!(true)));
	/// assert!(field.visible_if.is_some());
	/// ```
	pub fn with_visible_if(mut self, condition: VisibilityCondition) -> Self {
		self.visible_if = Some(condition);
		self
	}

	pub fn with_column_span(mut self, span: ColumnSpan) -> Self {
		self.column_span = Some(span);
		self
	}

	/// Display label, falling back to the machine name.
	pub fn display_label(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.name)
	}

	/// Whether `value` is one of the declared option values.
	pub fn has_option_value(&self, value: &serde_json::Value) -> bool {
		let Some(candidate) = crate::visibility::coerce_to_string(value) else {
			return false;
		};
		self.options.iter().any(|option| {
			crate::visibility::coerce_to_string(&option.value).as_deref() == Some(candidate.as_str())
		})
	}
}
