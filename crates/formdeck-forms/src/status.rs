//! Section, page and form status aggregation.

use crate::field::FieldDefinition;
use crate::schema::{Form, FormInstanceData, Section};
use crate::validators::{FieldValidation, FieldValidator, has_answer};
use crate::visibility::is_visible;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Derived validity of a group of fields.
///
/// Ordered from best to worst so that aggregation is a `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
	Valid,
	Empty,
	Error,
}

impl SectionStatus {
	/// Worst status of `statuses`; an empty sequence is `Valid`.
	///
	/// # Examples
	///
	/// ```
	/// use formdeck_forms::SectionStatus;
	///
	/// let worst = SectionStatus::worst([SectionStatus::Valid, SectionStatus::Empty]);
	/// assert_eq!(worst, SectionStatus::Empty);
	/// assert_eq!(SectionStatus::worst([]), SectionStatus::Valid);
	/// ```
	pub fn worst(statuses: impl IntoIterator<Item = SectionStatus>) -> SectionStatus {
		statuses.into_iter().max().unwrap_or(SectionStatus::Valid)
	}
}

fn section_status_with<V>(
	section: &Section,
	answers: &FormInstanceData,
	validator: &FieldValidator,
	visible: V,
) -> SectionStatus
where
	V: Fn(&FieldDefinition) -> bool,
{
	let fields: Vec<&FieldDefinition> = section.input_fields().filter(|f| visible(*f)).collect();
	if fields.is_empty() {
		return SectionStatus::Valid;
	}
	if !fields.iter().any(|f| has_answer(f, answers.get(&f.name))) {
		return SectionStatus::Empty;
	}
	if fields
		.iter()
		.any(|f| !validator.validate(f, answers.get(&f.name)).valid)
	{
		return SectionStatus::Error;
	}
	SectionStatus::Valid
}

/// Status of a standalone section.
///
/// Only the section's own fields are known here, so visibility is evaluated
/// against the answer set alone; prefer [`FormValidator::section_status`]
/// when the owning form is available.
pub fn validate_section(section: &Section, answers: &FormInstanceData) -> SectionStatus {
	section_status_with(section, answers, &FieldValidator::new(), |f| {
		is_visible(f, answers)
	})
}

/// Worst section status on page `index` of `form`.
pub fn validate_page(form: &Form, index: usize, answers: &FormInstanceData) -> SectionStatus {
	FormValidator::new(form, &FieldValidator::new()).page_status(index, answers)
}

/// Worst section status across every page of `form`.
pub fn validate_form(form: &Form, answers: &FormInstanceData) -> SectionStatus {
	FormValidator::new(form, &FieldValidator::new()).form_status(answers)
}

/// Validation of a whole form against one answer set.
pub struct FormValidator<'a> {
	form: &'a Form,
	fields: &'a FieldValidator,
}

impl<'a> FormValidator<'a> {
	pub fn new(form: &'a Form, fields: &'a FieldValidator) -> Self {
		Self { form, fields }
	}

	/// Validate one field, treating hidden fields as valid.
	pub fn field(&self, field: &FieldDefinition, answers: &FormInstanceData) -> FieldValidation {
		if !self.form.is_field_visible(field, answers) {
			return FieldValidation::ok();
		}
		self.fields.validate(field, answers.get(&field.name))
	}

	pub fn section_status(&self, section: &Section, answers: &FormInstanceData) -> SectionStatus {
		section_status_with(section, answers, self.fields, |f| {
			self.form.is_field_visible(f, answers)
		})
	}

	/// Worst section status on page `index`; `Valid` for an unknown page.
	pub fn page_status(&self, index: usize, answers: &FormInstanceData) -> SectionStatus {
		let Some(sections) = self.form.page_sections(index) else {
			return SectionStatus::Valid;
		};
		SectionStatus::worst(sections.iter().map(|s| self.section_status(s, answers)))
	}

	pub fn form_status(&self, answers: &FormInstanceData) -> SectionStatus {
		SectionStatus::worst(self.form.sections().map(|s| self.section_status(s, answers)))
	}

	/// Status of every section keyed by section id, in display order.
	pub fn section_statuses(&self, answers: &FormInstanceData) -> IndexMap<String, SectionStatus> {
		self.form
			.sections()
			.map(|s| (s.id.clone(), self.section_status(s, answers)))
			.collect()
	}

	/// Failing visible fields on page `index`, keyed by field name.
	pub fn page_errors(&self, index: usize, answers: &FormInstanceData) -> IndexMap<String, String> {
		self.form
			.page_sections(index)
			.unwrap_or_default()
			.iter()
			.flat_map(|s| s.input_fields())
			.filter_map(|f| self.error_for(f, answers))
			.collect()
	}

	/// Failing visible fields across every page, keyed by field name.
	///
	/// Unlike the status aggregation this also reports required fields in
	/// sections nobody has touched yet, which is what submit enforces.
	pub fn form_errors(&self, answers: &FormInstanceData) -> IndexMap<String, String> {
		self.form
			.sections()
			.flat_map(|s| s.input_fields())
			.filter_map(|f| self.error_for(f, answers))
			.collect()
	}

	fn error_for(&self, field: &FieldDefinition, answers: &FormInstanceData) -> Option<(String, String)> {
		let result = self.field(field, answers);
		if result.valid {
			return None;
		}
		let message = result
			.message
			.unwrap_or_else(|| self.fields.required_message().to_string());
		Some((field.name.clone(), message))
	}
}
