//! Per-field validation.
//!
//! Validation is a pure function of a field definition and a candidate value:
//! it never mutates its inputs and never fails with an error. A failed check
//! is reported as a [`FieldValidation`] carrying the message shown next to
//! the field.

use crate::field::{FieldDefinition, FieldType, ValidationRules};
use crate::visibility::{as_number, coerce_to_string, is_empty_value};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

/// Message reported for a required field without an answer.
pub const REQUIRED_MESSAGE: &str = "This field is required";

// Loose address shape: something, an @, something, a dot, something.
static EMAIL_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("EMAIL_REGEX: invalid regex pattern"));

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of validating one field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidation {
	pub valid: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl FieldValidation {
	pub fn ok() -> Self {
		Self {
			valid: true,
			message: None,
		}
	}

	pub fn invalid(message: impl Into<String>) -> Self {
		Self {
			valid: false,
			message: Some(message.into()),
		}
	}

	pub fn is_valid(&self) -> bool {
		self.valid
	}
}

/// Whether a field counts as answered for the required check.
///
/// Unchecked checkboxes and toggles are unanswered: a required checkbox
/// is an "I agree" box.
pub fn has_answer(field: &FieldDefinition, value: Option<&Value>) -> bool {
	if field.field_type.is_boolean() && value == Some(&Value::Bool(false)) {
		return false;
	}
	!is_empty_value(value)
}

/// Validates field values with a configurable required-field message.
#[derive(Debug, Clone)]
pub struct FieldValidator {
	required_message: String,
}

impl Default for FieldValidator {
	fn default() -> Self {
		Self::new()
	}
}

impl FieldValidator {
	pub fn new() -> Self {
		Self {
			required_message: REQUIRED_MESSAGE.to_string(),
		}
	}

	/// Replace the message reported for unanswered required fields.
	///
	/// # Examples
	///
	/// ```
	/// use formdeck_forms::{FieldDefinition, FieldType};
	/// use formdeck_forms::validators::FieldValidator;
	///
	/// let validator = FieldValidator::new().with_required_message("Required");
	/// let field = FieldDefinition::new("name", FieldType::Text).required();
	/// let result = validator.validate(&field, None);
	/// assert_eq!(result.message.as_deref(), Some("Required"));
	/// ```
	pub fn with_required_message(mut self, message: impl Into<String>) -> Self {
		self.required_message = message.into();
		self
	}

	pub fn required_message(&self) -> &str {
		&self.required_message
	}

	/// Validate `value` against `field`.
	///
	/// The required check runs first and short-circuits. Type checks only run
	/// when a value is present, so an optional field left blank is valid.
	pub fn validate(&self, field: &FieldDefinition, value: Option<&Value>) -> FieldValidation {
		if !field.field_type.is_input() {
			return FieldValidation::ok();
		}

		if !has_answer(field, value) {
			if field.required {
				return FieldValidation::invalid(&self.required_message);
			}
			if is_empty_value(value) {
				return FieldValidation::ok();
			}
		}
		let Some(value) = value else {
			return FieldValidation::ok();
		};

		let rules = field.validation.as_ref();
		match check_type(field, value, rules) {
			Ok(()) => FieldValidation::ok(),
			Err(message) => FieldValidation::invalid(
				rules
					.and_then(|r| r.message.clone())
					.unwrap_or(message),
			),
		}
	}
}

/// Validate with the default required message.
///
/// # Examples
///
/// ```
/// use formdeck_forms::{validate_field, FieldDefinition, FieldType};
/// use serde_json::json;
///
/// let field = FieldDefinition::new("email", FieldType::Email).required();
/// assert!(!validate_field(&field, None).valid);
/// assert!(!validate_field(&field, Some(&json!("nope"))).valid);
/// assert!(validate_field(&field, Some(&json!("a@b.co"))).valid);
/// ```
pub fn validate_field(field: &FieldDefinition, value: Option<&Value>) -> FieldValidation {
	FieldValidator::new().validate(field, value)
}

fn check_type(
	field: &FieldDefinition,
	value: &Value,
	rules: Option<&ValidationRules>,
) -> Result<(), String> {
	match field.field_type {
		FieldType::Email => {
			let text = value.as_str().ok_or("Enter a valid email address")?;
			if !EMAIL_REGEX.is_match(text) {
				return Err("Enter a valid email address".to_string());
			}
			Ok(())
		}
		FieldType::Number => check_number(value, rules),
		FieldType::Text | FieldType::Textarea | FieldType::Password => {
			let text = coerce_to_string(value).ok_or("Enter a valid value")?;
			check_text(&text, rules)
		}
		FieldType::Date => {
			let text = value.as_str().ok_or("Enter a valid date (YYYY-MM-DD)")?;
			NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
				.map(|_| ())
				.map_err(|_| "Enter a valid date (YYYY-MM-DD)".to_string())
		}
		FieldType::Select | FieldType::Radio => {
			if field.has_option_value(value) {
				Ok(())
			} else {
				Err("Select a valid choice".to_string())
			}
		}
		FieldType::Multiselect => {
			let items = value.as_array().ok_or("Select a valid choice")?;
			match items.iter().find(|item| !field.has_option_value(item)) {
				Some(item) => Err(format!(
					"Select a valid choice. {} is not one of the available choices",
					coerce_to_string(item).unwrap_or_else(|| item.to_string())
				)),
				None => Ok(()),
			}
		}
		FieldType::Checkbox | FieldType::Toggle => {
			if value.is_boolean() {
				Ok(())
			} else {
				Err("Enter a valid boolean".to_string())
			}
		}
		FieldType::File | FieldType::Hidden | FieldType::Heading | FieldType::Divider => Ok(()),
	}
}

fn check_number(value: &Value, rules: Option<&ValidationRules>) -> Result<(), String> {
	let number = as_number(value).ok_or("Enter a valid number")?;
	let Some(rules) = rules else {
		return Ok(());
	};
	if let Some(min) = rules.min
		&& number < min
	{
		return Err(format!("Value must be at least {}", min));
	}
	if let Some(max) = rules.max
		&& number > max
	{
		return Err(format!("Value must be at most {}", max));
	}
	Ok(())
}

fn check_text(text: &str, rules: Option<&ValidationRules>) -> Result<(), String> {
	let Some(rules) = rules else {
		return Ok(());
	};
	let length = text.chars().count();
	if let Some(min_length) = rules.min_length
		&& length < min_length
	{
		return Err(format!(
			"Ensure this value has at least {} characters (it has {})",
			min_length, length
		));
	}
	if let Some(max_length) = rules.max_length
		&& length > max_length
	{
		return Err(format!(
			"Ensure this value has at most {} characters (it has {})",
			max_length, length
		));
	}
	if let Some(pattern) = &rules.pattern
		&& !pattern.is_match(text)
	{
		return Err("Enter a value in the required format".to_string());
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::{FieldOption, Pattern};
	use proptest::prelude::*;
	use rstest::rstest;
	use serde_json::json;

	fn number_field(min: Option<f64>, max: Option<f64>) -> FieldDefinition {
		FieldDefinition::new("age", FieldType::Number)
			.required()
			.with_validation(ValidationRules {
				min,
				max,
				..Default::default()
			})
	}

	#[rstest]
	#[case(None)]
	#[case(Some(json!(null)))]
	#[case(Some(json!("")))]
	#[case(Some(json!("   ")))]
	#[case(Some(json!([])))]
	fn test_required_field_without_value_fails(#[case] value: Option<Value>) {
		let field = FieldDefinition::new("name", FieldType::Text).required();

		let result = validate_field(&field, value.as_ref());

		assert_eq!(result, FieldValidation::invalid(REQUIRED_MESSAGE));
	}

	#[rstest]
	fn test_required_check_short_circuits_custom_message() {
		let field = FieldDefinition::new("name", FieldType::Text)
			.required()
			.with_validation(ValidationRules {
				message: Some("Custom".to_string()),
				..Default::default()
			});

		let result = validate_field(&field, None);

		assert_eq!(result.message.as_deref(), Some(REQUIRED_MESSAGE));
	}

	#[rstest]
	fn test_optional_blank_field_is_valid() {
		let field = FieldDefinition::new("email", FieldType::Email);
		assert!(validate_field(&field, Some(&json!(""))).valid);
		assert!(validate_field(&field, None).valid);
	}

	#[rstest]
	fn test_number_below_minimum_references_minimum() {
		let field = number_field(Some(18.0), None);

		let result = validate_field(&field, Some(&json!("15")));

		assert!(!result.valid);
		assert_eq!(result.message.as_deref(), Some("Value must be at least 18"));
	}

	#[rstest]
	#[case(json!("abc"), Some("Enter a valid number"))]
	#[case(json!(100), Some("Value must be at most 65"))]
	#[case(json!(30), None)]
	#[case(json!("18"), None)]
	fn test_number_checks(#[case] value: Value, #[case] message: Option<&str>) {
		let field = number_field(Some(18.0), Some(65.0));

		let result = validate_field(&field, Some(&value));

		assert_eq!(result.message.as_deref(), message);
		assert_eq!(result.valid, message.is_none());
	}

	#[rstest]
	#[case("user@example.com", true)]
	#[case("user@example", false)]
	#[case("user example.com", false)]
	fn test_email_shape(#[case] value: &str, #[case] valid: bool) {
		let field = FieldDefinition::new("email", FieldType::Email);
		assert_eq!(validate_field(&field, Some(&json!(value))).valid, valid);
	}

	#[rstest]
	fn test_text_length_and_pattern() {
		let field = FieldDefinition::new("code", FieldType::Text).with_validation(ValidationRules {
			min_length: Some(3),
			max_length: Some(5),
			pattern: Some(Pattern::new("^[A-Z]+$").unwrap()),
			..Default::default()
		});

		assert!(!validate_field(&field, Some(&json!("AB"))).valid);
		assert!(!validate_field(&field, Some(&json!("ABCDEF"))).valid);
		assert!(!validate_field(&field, Some(&json!("abcd"))).valid);
		assert!(validate_field(&field, Some(&json!("ABCD"))).valid);
	}

	#[rstest]
	fn test_length_counts_characters_not_bytes() {
		let field = FieldDefinition::new("name", FieldType::Textarea).with_validation(ValidationRules {
			max_length: Some(3),
			..Default::default()
		});

		assert!(validate_field(&field, Some(&json!("äöü"))).valid);
	}

	#[rstest]
	fn test_custom_message_replaces_rule_message() {
		let field = number_field(Some(18.0), None).with_validation(ValidationRules {
			min: Some(18.0),
			message: Some("Adults only".to_string()),
			..Default::default()
		});

		let result = validate_field(&field, Some(&json!(12)));

		assert_eq!(result.message.as_deref(), Some("Adults only"));
	}

	#[rstest]
	fn test_select_and_multiselect_membership() {
		let select = FieldDefinition::new("color", FieldType::Select)
			.with_option(FieldOption::new("red", "Red"))
			.with_option(FieldOption::new("blue", "Blue"));
		let multi = FieldDefinition::new("colors", FieldType::Multiselect)
			.with_option(FieldOption::new("red", "Red"))
			.with_option(FieldOption::new("blue", "Blue"));

		assert!(validate_field(&select, Some(&json!("red"))).valid);
		assert!(!validate_field(&select, Some(&json!("green"))).valid);
		assert!(validate_field(&multi, Some(&json!(["red", "blue"]))).valid);
		assert!(!validate_field(&multi, Some(&json!("red"))).valid);

		let result = validate_field(&multi, Some(&json!(["red", "green"])));
		assert_eq!(
			result.message.as_deref(),
			Some("Select a valid choice. green is not one of the available choices")
		);
	}

	#[rstest]
	fn test_required_checkbox_must_be_checked() {
		let field = FieldDefinition::new("terms", FieldType::Checkbox).required();

		assert!(!validate_field(&field, Some(&json!(false))).valid);
		assert!(validate_field(&field, Some(&json!(true))).valid);
		assert!(!validate_field(&field, Some(&json!("yes"))).valid);
	}

	#[rstest]
	fn test_optional_unchecked_checkbox_is_valid() {
		let field = FieldDefinition::new("newsletter", FieldType::Toggle);
		assert!(validate_field(&field, Some(&json!(false))).valid);
	}

	#[rstest]
	#[case("2024-02-29", true)]
	#[case("2023-02-29", false)]
	#[case("29/02/2024", false)]
	fn test_date_format(#[case] value: &str, #[case] valid: bool) {
		let field = FieldDefinition::new("start", FieldType::Date);
		assert_eq!(validate_field(&field, Some(&json!(value))).valid, valid);
	}

	#[rstest]
	fn test_heading_is_never_validated() {
		let field = FieldDefinition::new("intro", FieldType::Heading).required();
		assert!(validate_field(&field, None).valid);
	}

	proptest! {
		#[test]
		fn prop_required_empty_always_fails(spaces in " {0,8}") {
			let field = FieldDefinition::new("name", FieldType::Text).required();
			let result = validate_field(&field, Some(&json!(spaces)));
			prop_assert_eq!(result, FieldValidation::invalid(REQUIRED_MESSAGE));
		}

		#[test]
		fn prop_validation_is_idempotent(value in ".{0,12}", min in 0usize..6) {
			let field = FieldDefinition::new("name", FieldType::Text)
				.required()
				.with_validation(ValidationRules { min_length: Some(min), ..Default::default() });
			let value = json!(value);
			let first = validate_field(&field, Some(&value));
			let second = validate_field(&field, Some(&value));
			prop_assert_eq!(first, second);
		}
	}
}
