//! Form schema: sections, pages and the form itself.
//!
//! A form is either a legacy single page of sections or an ordered sequence
//! of pages. The JSON schema tags the two with `settings.multiPage`; here
//! they are the two variants of [`FormLayout`] so every consumer matches on
//! the shape instead of null-checking.
//!
//! Loading is lenient per field: a malformed field definition is reported as
//! a [`SchemaWarning`] and dropped while its siblings load normally. Only a
//! form whose overall shape is unreadable fails with a [`SchemaError`].

use crate::field::FieldDefinition;
use crate::visibility::{HiddenValuePolicy, is_visible};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Answers keyed by field `name`.
pub type FormInstanceData = HashMap<String, serde_json::Value>;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
	#[error("Invalid form schema: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Form `{0}` is marked multiPage but declares no pages")]
	NoPages(String),
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// A field that was skipped at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaWarning {
	pub section_id: String,
	/// Position of the field in the section's `fields` array as written.
	pub field_index: usize,
	pub reason: String,
}

impl fmt::Display for SchemaWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"section `{}`, field #{}: {}",
			self.section_id, self.field_index, self.reason
		)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
	pub id: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub fields: Vec<FieldDefinition>,
	pub order: i64,
}

impl Section {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: None,
			description: None,
			fields: vec![],
			order: 0,
		}
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_order(mut self, order: i64) -> Self {
		self.order = order;
		self
	}

	pub fn with_field(mut self, field: FieldDefinition) -> Self {
		self.fields.push(field);
		self
	}

	/// Fields that collect a value.
	pub fn input_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
		self.fields.iter().filter(|f| f.field_type.is_input())
	}
}

/// One page of a multi-page form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPage {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	pub sections: Vec<Section>,
}

impl FormPage {
	pub fn new(sections: Vec<Section>) -> Self {
		Self {
			id: None,
			title: None,
			sections,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
	#[serde(default)]
	pub multi_page: bool,
	#[serde(default)]
	pub show_progress_bar: bool,
	#[serde(default = "default_allow_save_draft")]
	pub allow_save_draft: bool,
}

fn default_allow_save_draft() -> bool {
	true
}

impl Default for FormSettings {
	fn default() -> Self {
		Self {
			multi_page: false,
			show_progress_bar: false,
			allow_save_draft: true,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormLayout {
	SinglePage { sections: Vec<Section> },
	MultiPage { pages: Vec<FormPage> },
}

/// A loaded, read-only form schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
	pub id: String,
	pub title: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(flatten)]
	pub layout: FormLayout,
	pub settings: FormSettings,
	pub published: bool,
	#[serde(skip)]
	warnings: Vec<SchemaWarning>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawForm {
	id: String,
	#[serde(default)]
	title: String,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	sections: Vec<RawSection>,
	#[serde(default)]
	pages: Option<Vec<RawPage>>,
	#[serde(default)]
	settings: FormSettings,
	#[serde(default)]
	published: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage {
	#[serde(default)]
	id: Option<String>,
	#[serde(default)]
	title: Option<String>,
	#[serde(default)]
	sections: Vec<RawSection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSection {
	id: String,
	#[serde(default)]
	title: Option<String>,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	order: i64,
	// Kept as raw JSON so one bad field does not reject the whole form.
	#[serde(default)]
	fields: Vec<serde_json::Value>,
}

/// Field identity bookkeeping shared by every section while loading.
#[derive(Default)]
struct LoadContext {
	field_ids: HashSet<String>,
	warnings: Vec<SchemaWarning>,
}

impl LoadContext {
	fn section(&mut self, raw: RawSection) -> Section {
		let mut names = HashSet::new();
		let mut fields = Vec::with_capacity(raw.fields.len());

		for (index, value) in raw.fields.into_iter().enumerate() {
			let field = match serde_json::from_value::<FieldDefinition>(value) {
				Ok(field) => field,
				Err(e) => {
					self.warn(&raw.id, index, e.to_string());
					continue;
				}
			};
			if !names.insert(field.name.clone()) {
				self.warn(
					&raw.id,
					index,
					format!("duplicate field name `{}` in section", field.name),
				);
				continue;
			}
			if !self.field_ids.insert(field.id.clone()) {
				self.warn(
					&raw.id,
					index,
					format!("duplicate field id `{}` in form", field.id),
				);
				continue;
			}
			fields.push(field);
		}

		Section {
			id: raw.id,
			title: raw.title,
			description: raw.description,
			fields,
			order: raw.order,
		}
	}

	fn sections(&mut self, raw: Vec<RawSection>) -> Vec<Section> {
		let mut sections: Vec<Section> = raw.into_iter().map(|s| self.section(s)).collect();
		// Stable: equal `order` keeps array position.
		sections.sort_by_key(|s| s.order);
		sections
	}

	fn warn(&mut self, section_id: &str, field_index: usize, reason: String) {
		let warning = SchemaWarning {
			section_id: section_id.to_string(),
			field_index,
			reason,
		};
		tracing::warn!(%warning, "skipping malformed field");
		self.warnings.push(warning);
	}
}

impl Form {
	/// Build a single-page form from sections already in display order.
	pub fn single_page(id: impl Into<String>, title: impl Into<String>, sections: Vec<Section>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			description: None,
			layout: FormLayout::SinglePage { sections },
			settings: FormSettings::default(),
			published: false,
			warnings: vec![],
		}
	}

	/// Build a multi-page form.
	pub fn multi_page(id: impl Into<String>, title: impl Into<String>, pages: Vec<FormPage>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			description: None,
			layout: FormLayout::MultiPage { pages },
			settings: FormSettings {
				multi_page: true,
				..FormSettings::default()
			},
			published: false,
			warnings: vec![],
		}
	}

	pub fn with_settings(mut self, settings: FormSettings) -> Self {
		self.settings = FormSettings {
			multi_page: matches!(self.layout, FormLayout::MultiPage { .. }),
			..settings
		};
		self
	}

	/// Load a form from its JSON schema
	///
	/// # Examples
	///
	/// ```
	/// use formdeck_forms::Form;
	/// use serde_json::json;
	///
	/// let form = Form::from_value(json!({
	///     "id": "signup",
	///     "title": "Sign up",
	///     "sections": [{
	///         "id": "main",
	///         "fields": [
	///             { "id": "f1", "name": "email", "type": "email", "required": true },
	///             { "id": "f2", "type": "text" }
	///         ]
	///     }]
	/// }))
	/// .unwrap();
	///
	/// assert_eq!(form.page_count(), 1);
	/// assert_eq!(form.fields().count(), 1);
	/// assert_eq!(form.warnings().len(), 1);
	/// ```
	pub fn from_value(value: serde_json::Value) -> SchemaResult<Self> {
		let raw: RawForm = serde_json::from_value(value)?;
		Self::from_raw(raw)
	}

	pub fn from_json(json: &str) -> SchemaResult<Self> {
		let raw: RawForm = serde_json::from_str(json)?;
		Self::from_raw(raw)
	}

	fn from_raw(raw: RawForm) -> SchemaResult<Self> {
		let mut ctx = LoadContext::default();

		let layout = if raw.settings.multi_page {
			let pages = raw
				.pages
				.filter(|pages| !pages.is_empty())
				.ok_or_else(|| SchemaError::NoPages(raw.id.clone()))?;
			FormLayout::MultiPage {
				pages: pages
					.into_iter()
					.map(|page| FormPage {
						id: page.id,
						title: page.title,
						sections: ctx.sections(page.sections),
					})
					.collect(),
			}
		} else {
			FormLayout::SinglePage {
				sections: ctx.sections(raw.sections),
			}
		};

		tracing::debug!(
			form = %raw.id,
			warnings = ctx.warnings.len(),
			"loaded form schema"
		);

		Ok(Self {
			id: raw.id,
			title: raw.title,
			description: raw.description,
			layout,
			settings: raw.settings,
			published: raw.published,
			warnings: ctx.warnings,
		})
	}

	/// Fields dropped while loading.
	pub fn warnings(&self) -> &[SchemaWarning] {
		&self.warnings
	}

	/// Number of pages; a legacy single-page form has exactly one.
	pub fn page_count(&self) -> usize {
		match &self.layout {
			FormLayout::SinglePage { .. } => 1,
			FormLayout::MultiPage { pages } => pages.len(),
		}
	}

	pub fn page_sections(&self, index: usize) -> Option<&[Section]> {
		match &self.layout {
			FormLayout::SinglePage { sections } => (index == 0).then_some(sections.as_slice()),
			FormLayout::MultiPage { pages } => pages.get(index).map(|p| p.sections.as_slice()),
		}
	}

	pub fn page_title(&self, index: usize) -> Option<&str> {
		match &self.layout {
			FormLayout::SinglePage { .. } => None,
			FormLayout::MultiPage { pages } => pages.get(index).and_then(|p| p.title.as_deref()),
		}
	}

	/// Every section in display order, across pages.
	pub fn sections(&self) -> Box<dyn Iterator<Item = &Section> + '_> {
		match &self.layout {
			FormLayout::SinglePage { sections } => Box::new(sections.iter()),
			FormLayout::MultiPage { pages } => Box::new(pages.iter().flat_map(|p| p.sections.iter())),
		}
	}

	/// Every loaded field in display order.
	pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
		self.sections().flat_map(|s| s.fields.iter())
	}

	pub fn find_field(&self, name: &str) -> Option<&FieldDefinition> {
		self.fields().find(|f| f.name == name)
	}

	pub fn find_section(&self, id: &str) -> Option<&Section> {
		self.sections().find(|s| s.id == id)
	}

	/// Index of the page owning section `id`.
	pub fn page_of_section(&self, id: &str) -> Option<usize> {
		(0..self.page_count()).find(|&i| {
			self.page_sections(i)
				.is_some_and(|sections| sections.iter().any(|s| s.id == id))
		})
	}

	/// Index of the page owning the field named `name`.
	pub fn page_of_field(&self, name: &str) -> Option<usize> {
		(0..self.page_count()).find(|&i| {
			self.page_sections(i).is_some_and(|sections| {
				sections
					.iter()
					.any(|s| s.fields.iter().any(|f| f.name == name))
			})
		})
	}

	/// Whether `field` is visible for `answers`.
	///
	/// Beyond the field's own condition, a field is hidden when its condition
	/// names a field missing from this form, or a field that is itself hidden.
	/// Cyclic conditions hide every field in the cycle.
	pub fn is_field_visible(&self, field: &FieldDefinition, answers: &FormInstanceData) -> bool {
		let mut visiting = HashSet::new();
		self.visible_inner(field, answers, &mut visiting)
	}

	fn visible_inner<'a>(
		&'a self,
		field: &'a FieldDefinition,
		answers: &FormInstanceData,
		visiting: &mut HashSet<&'a str>,
	) -> bool {
		let Some(condition) = &field.visible_if else {
			return true;
		};
		if !visiting.insert(field.name.as_str()) {
			return false;
		}
		let Some(target) = self.find_field(&condition.field_name) else {
			tracing::debug!(
				field = %field.name,
				target = %condition.field_name,
				"visibility condition references an unknown field"
			);
			return false;
		};
		self.visible_inner(target, answers, visiting) && is_visible(field, answers)
	}

	/// The answers that leave the form on draft or submit.
	///
	/// With [`HiddenValuePolicy::Purge`] a key is dropped when every field
	/// carrying that name is hidden. Keys that match no field pass through.
	pub fn payload(&self, answers: &FormInstanceData, policy: HiddenValuePolicy) -> FormInstanceData {
		if policy == HiddenValuePolicy::Retain {
			return answers.clone();
		}
		answers
			.iter()
			.filter(|(name, _)| {
				let mut owners = self.fields().filter(|f| &f.name == *name).peekable();
				owners.peek().is_none() || owners.any(|f| self.is_field_visible(f, answers))
			})
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect()
	}
}
