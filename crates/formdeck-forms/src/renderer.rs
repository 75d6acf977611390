use crate::schema::{Form, FormInstanceData};
use crate::status::{FormValidator, SectionStatus};
use crate::validators::{FieldValidation, FieldValidator, REQUIRED_MESSAGE};
use crate::visibility::HiddenValuePolicy;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a renderer session treats the answers it was given.
///
/// `Create` starts empty, `Edit` and `View` start from an earlier entry;
/// `View` additionally rejects every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
	Create,
	Edit,
	View,
}

impl FormMode {
	pub fn is_read_only(self) -> bool {
		self == FormMode::View
	}
}

impl fmt::Display for FormMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			FormMode::Create => "create",
			FormMode::Edit => "edit",
			FormMode::View => "view",
		})
	}
}

/// Navigation state of a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "page", rename_all = "snake_case")]
pub enum RendererState {
	ViewingPage(usize),
	SubmittedDraft,
	SubmittedPublished,
}

impl RendererState {
	pub fn is_terminal(self) -> bool {
		!matches!(self, RendererState::ViewingPage(_))
	}
}

/// Failure reported by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PersistenceError {
	message: String,
}

impl PersistenceError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Receives the payloads of `save_draft` and `submit`.
pub trait SubmissionHandler: Send {
	fn on_save_draft(&mut self, answers: &FormInstanceData) -> Result<(), PersistenceError>;
	fn on_submit(&mut self, answers: &FormInstanceData) -> Result<(), PersistenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
	#[error("Page {page} has errors; fix them before continuing")]
	PageHasErrors {
		page: usize,
		errors: IndexMap<String, String>,
	},
	#[error("Form is read-only")]
	ReadOnly,
	#[error("Form has already been submitted")]
	Closed,
	#[error("Unknown field: {0}")]
	UnknownField(String),
	#[error("Unknown section: {0}")]
	UnknownSection(String),
	#[error("Drafts are disabled for this form")]
	DraftsDisabled,
	#[error("Form has {} invalid field(s); first error on page {page}", .errors.len())]
	SubmitRejected {
		page: usize,
		errors: IndexMap<String, String>,
	},
	#[error("Could not save: {0}")]
	Persistence(#[from] PersistenceError),
}

pub type RendererResult<T> = Result<T, RendererError>;

/// Renderer behavior that is configuration rather than schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererOptions {
	pub hidden_values: HiddenValuePolicy,
	pub required_message: String,
}

impl Default for RendererOptions {
	fn default() -> Self {
		Self {
			hidden_values: HiddenValuePolicy::Purge,
			required_message: REQUIRED_MESSAGE.to_string(),
		}
	}
}

/// One editing session over a form: answers, field errors and page navigation.
pub struct FormRenderer {
	form: Form,
	mode: FormMode,
	state: RendererState,
	current_page: usize,
	answers: FormInstanceData,
	field_errors: IndexMap<String, String>,
	validator: FieldValidator,
	hidden_values: HiddenValuePolicy,
	handler: Option<Box<dyn SubmissionHandler>>,
	notice: Option<String>,
}

impl fmt::Debug for FormRenderer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormRenderer")
			.field("form", &self.form.id)
			.field("mode", &self.mode)
			.field("state", &self.state)
			.field("answers", &self.answers)
			.field("field_errors", &self.field_errors)
			.finish_non_exhaustive()
	}
}

impl FormRenderer {
	/// Start a create session with no answers
	///
	/// # Examples
	///
	/// ```
	/// use formdeck_forms::{Form, FormMode, FormRenderer, RendererState};
	///
	/// let renderer = FormRenderer::new(Form::single_page("f", "Feedback", vec![]));
	/// assert_eq!(renderer.mode(), FormMode::Create);
	/// assert_eq!(renderer.state(), RendererState::ViewingPage(0));
	/// assert!(renderer.answers().is_empty());
	/// ```
	pub fn new(form: Form) -> Self {
		Self::with_initial(form, FormMode::Create, FormInstanceData::new())
	}

	/// Start an edit session from an earlier entry.
	pub fn edit(form: Form, initial: FormInstanceData) -> Self {
		Self::with_initial(form, FormMode::Edit, initial)
	}

	/// Start a read-only session over an earlier entry.
	pub fn view(form: Form, initial: FormInstanceData) -> Self {
		Self::with_initial(form, FormMode::View, initial)
	}

	/// Start a session in `mode`; a create session ignores `initial`.
	pub fn with_initial(form: Form, mode: FormMode, initial: FormInstanceData) -> Self {
		for warning in form.warnings() {
			tracing::warn!(form = %form.id, %warning, "form loaded with a skipped field");
		}
		let answers = if mode == FormMode::Create && !initial.is_empty() {
			tracing::warn!(
				form = %form.id,
				fields = initial.len(),
				"initial answers ignored for a create session"
			);
			FormInstanceData::new()
		} else {
			initial
		};
		Self {
			form,
			mode,
			state: RendererState::ViewingPage(0),
			current_page: 0,
			answers,
			field_errors: IndexMap::new(),
			validator: FieldValidator::new(),
			hidden_values: HiddenValuePolicy::default(),
			handler: None,
			notice: None,
		}
	}

	pub fn with_options(mut self, options: RendererOptions) -> Self {
		self.validator = FieldValidator::new().with_required_message(options.required_message);
		self.hidden_values = options.hidden_values;
		self
	}

	pub fn with_handler(mut self, handler: impl SubmissionHandler + 'static) -> Self {
		self.handler = Some(Box::new(handler));
		self
	}

	pub fn form(&self) -> &Form {
		&self.form
	}

	pub fn mode(&self) -> FormMode {
		self.mode
	}

	pub fn state(&self) -> RendererState {
		self.state
	}

	/// Index of the page on screen; kept after a terminal transition.
	pub fn current_page(&self) -> usize {
		self.current_page
	}

	pub fn page_count(&self) -> usize {
		self.form.page_count()
	}

	pub fn is_first_page(&self) -> bool {
		self.current_page == 0
	}

	pub fn is_last_page(&self) -> bool {
		self.current_page + 1 >= self.page_count()
	}

	pub fn answers(&self) -> &FormInstanceData {
		&self.answers
	}

	pub fn value(&self, name: &str) -> Option<&serde_json::Value> {
		self.answers.get(name)
	}

	pub fn field_errors(&self) -> &IndexMap<String, String> {
		&self.field_errors
	}

	pub fn field_error(&self, name: &str) -> Option<&str> {
		self.field_errors.get(name).map(String::as_str)
	}

	/// Last persistence failure, cleared by the next successful save.
	pub fn last_notice(&self) -> Option<&str> {
		self.notice.as_deref()
	}

	fn form_validator(&self) -> FormValidator<'_> {
		FormValidator::new(&self.form, &self.validator)
	}

	fn ensure_editable(&self) -> RendererResult<()> {
		if self.state.is_terminal() {
			return Err(RendererError::Closed);
		}
		if self.mode.is_read_only() {
			return Err(RendererError::ReadOnly);
		}
		Ok(())
	}

	fn ensure_open(&self) -> RendererResult<()> {
		if self.state.is_terminal() {
			return Err(RendererError::Closed);
		}
		Ok(())
	}

	/// Record a new answer for `name`
	///
	/// A field that already shows an error is re-validated so the message
	/// disappears as soon as the value is fixed.
	///
	/// # Examples
	///
	/// ```
	/// use formdeck_forms::{FieldDefinition, FieldType, Form, FormRenderer, Section};
	/// use serde_json::json;
	///
	/// let form = Form::single_page(
	///     "f",
	///     "F",
	///     vec![Section::new("s").with_field(FieldDefinition::new("name", FieldType::Text))],
	/// );
	/// let mut renderer = FormRenderer::new(form);
	/// renderer.set_value("name", json!("Ada")).unwrap();
	/// assert_eq!(renderer.value("name"), Some(&json!("Ada")));
	/// assert!(renderer.set_value("unknown", json!(1)).is_err());
	/// ```
	pub fn set_value(&mut self, name: &str, value: serde_json::Value) -> RendererResult<()> {
		self.ensure_editable()?;
		let field = self
			.form
			.find_field(name)
			.filter(|f| f.field_type.is_input())
			.ok_or_else(|| RendererError::UnknownField(name.to_string()))?;
		let name = field.name.clone();
		self.answers.insert(name.clone(), value);
		if self.field_errors.contains_key(&name) {
			self.refresh_error(&name);
		}
		self.prune_hidden_errors();
		Ok(())
	}

	pub fn clear_value(&mut self, name: &str) -> RendererResult<()> {
		self.ensure_editable()?;
		if self.form.find_field(name).is_none() {
			return Err(RendererError::UnknownField(name.to_string()));
		}
		self.answers.remove(name);
		if self.field_errors.contains_key(name) {
			self.refresh_error(name);
		}
		self.prune_hidden_errors();
		Ok(())
	}

	/// Drop recorded errors of fields the current answers hide.
	fn prune_hidden_errors(&mut self) {
		let form = &self.form;
		let answers = &self.answers;
		self.field_errors.retain(|name, _| {
			form.find_field(name)
				.is_some_and(|field| form.is_field_visible(field, answers))
		});
	}

	/// Validate `name` as the user leaves it and record the outcome.
	pub fn blur(&mut self, name: &str) -> RendererResult<FieldValidation> {
		if self.form.find_field(name).is_none() {
			return Err(RendererError::UnknownField(name.to_string()));
		}
		Ok(self.refresh_error(name))
	}

	fn refresh_error(&mut self, name: &str) -> FieldValidation {
		let result = match self.form.find_field(name) {
			Some(field) => self.form_validator().field(field, &self.answers),
			None => FieldValidation::ok(),
		};
		match &result.message {
			Some(message) if !result.valid => {
				self.field_errors.insert(name.to_string(), message.clone());
			}
			_ => {
				self.field_errors.shift_remove(name);
			}
		}
		result
	}

	pub fn page_status(&self, index: usize) -> SectionStatus {
		self.form_validator().page_status(index, &self.answers)
	}

	pub fn current_page_status(&self) -> SectionStatus {
		self.page_status(self.current_page)
	}

	pub fn form_status(&self) -> SectionStatus {
		self.form_validator().form_status(&self.answers)
	}

	pub fn section_status(&self, id: &str) -> Option<SectionStatus> {
		let section = self.form.find_section(id)?;
		Some(self.form_validator().section_status(section, &self.answers))
	}

	/// Live status of every section for the section navigation sidebar.
	pub fn section_statuses(&self) -> IndexMap<String, SectionStatus> {
		self.form_validator().section_statuses(&self.answers)
	}

	/// Advance one page.
	///
	/// Blocked while the current page has errors: the state stays put and the
	/// page's field errors are recorded. A no-op on the last page.
	pub fn next(&mut self) -> RendererResult<()> {
		self.ensure_open()?;
		if self.current_page_status() == SectionStatus::Error {
			let errors = self
				.form_validator()
				.page_errors(self.current_page, &self.answers);
			tracing::debug!(
				form = %self.form.id,
				page = self.current_page,
				errors = errors.len(),
				"next page blocked by validation errors"
			);
			self.field_errors.extend(errors.clone());
			return Err(RendererError::PageHasErrors {
				page: self.current_page,
				errors,
			});
		}
		if !self.is_last_page() {
			self.go_to(self.current_page + 1);
		}
		Ok(())
	}

	/// Go back one page; never blocked by validation, a no-op on the first page.
	pub fn previous(&mut self) -> RendererResult<()> {
		self.ensure_open()?;
		if !self.is_first_page() {
			self.go_to(self.current_page - 1);
		}
		Ok(())
	}

	/// Move to the page owning section `id`.
	pub fn jump_to_section(&mut self, id: &str) -> RendererResult<usize> {
		self.ensure_open()?;
		let page = self
			.form
			.page_of_section(id)
			.ok_or_else(|| RendererError::UnknownSection(id.to_string()))?;
		self.go_to(page);
		Ok(page)
	}

	fn go_to(&mut self, page: usize) {
		self.current_page = page;
		self.state = RendererState::ViewingPage(page);
	}

	/// Completion through the form, `(page + 1) / page_count` as a percentage.
	///
	/// `None` unless the form asks for a progress bar.
	pub fn progress_percentage(&self) -> Option<f32> {
		if !self.form.settings.show_progress_bar {
			return None;
		}
		let count = self.page_count();
		if count == 0 {
			return Some(0.0);
		}
		Some(((self.current_page + 1) as f32 / count as f32) * 100.0)
	}

	/// The answers that would leave the form right now.
	pub fn payload(&self) -> FormInstanceData {
		self.form.payload(&self.answers, self.hidden_values)
	}

	/// Hand the current answers to the draft handler without validating them.
	pub fn save_draft(&mut self) -> RendererResult<FormInstanceData> {
		self.ensure_editable()?;
		if !self.form.settings.allow_save_draft {
			return Err(RendererError::DraftsDisabled);
		}
		let payload = self.payload();
		if let Some(handler) = self.handler.as_mut()
			&& let Err(e) = handler.on_save_draft(&payload)
		{
			return Err(self.persistence_failed(e));
		}
		tracing::info!(form = %self.form.id, fields = payload.len(), "draft saved");
		self.notice = None;
		self.state = RendererState::SubmittedDraft;
		Ok(payload)
	}

	/// Validate every page and hand the answers to the submit handler.
	///
	/// On failure the renderer records all field errors, moves to the first
	/// page with an error and keeps the answers.
	pub fn submit(&mut self) -> RendererResult<FormInstanceData> {
		self.ensure_editable()?;
		let errors = self.form_validator().form_errors(&self.answers);
		if let Some(first) = errors.keys().next() {
			let page = self.form.page_of_field(first).unwrap_or(self.current_page);
			tracing::debug!(
				form = %self.form.id,
				errors = errors.len(),
				page,
				"submit rejected"
			);
			self.field_errors = errors.clone();
			self.go_to(page);
			return Err(RendererError::SubmitRejected { page, errors });
		}

		let payload = self.payload();
		if let Some(handler) = self.handler.as_mut()
			&& let Err(e) = handler.on_submit(&payload)
		{
			return Err(self.persistence_failed(e));
		}
		tracing::info!(form = %self.form.id, fields = payload.len(), "form submitted");
		self.field_errors.clear();
		self.notice = None;
		self.state = RendererState::SubmittedPublished;
		Ok(payload)
	}

	fn persistence_failed(&mut self, error: PersistenceError) -> RendererError {
		tracing::warn!(form = %self.form.id, error = %error, "persistence failed");
		self.notice = Some(error.to_string());
		RendererError::Persistence(error)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::{FieldDefinition, FieldType, ValidationRules};
	use crate::schema::{FormPage, FormSettings, Section};
	use crate::visibility::{Operator, VisibilityCondition};
	use rstest::{fixture, rstest};
	use serde_json::json;
	use std::sync::{Arc, Mutex};

	#[derive(Clone, Default)]
	struct Recorder {
		drafts: Arc<Mutex<Vec<FormInstanceData>>>,
		submits: Arc<Mutex<Vec<FormInstanceData>>>,
		fail_with: Option<String>,
	}

	impl SubmissionHandler for Recorder {
		fn on_save_draft(&mut self, answers: &FormInstanceData) -> Result<(), PersistenceError> {
			if let Some(message) = &self.fail_with {
				return Err(PersistenceError::new(message.clone()));
			}
			self.drafts.lock().unwrap().push(answers.clone());
			Ok(())
		}

		fn on_submit(&mut self, answers: &FormInstanceData) -> Result<(), PersistenceError> {
			if let Some(message) = &self.fail_with {
				return Err(PersistenceError::new(message.clone()));
			}
			self.submits.lock().unwrap().push(answers.clone());
			Ok(())
		}
	}

	#[fixture]
	fn two_page_form() -> Form {
		Form::multi_page(
			"project",
			"Project",
			vec![
				FormPage::new(vec![
					Section::new("basics")
						.with_field(FieldDefinition::new("title", FieldType::Text).required())
						.with_field(
							FieldDefinition::new("age", FieldType::Number).with_validation(
								ValidationRules {
									min: Some(18.0),
									..Default::default()
								},
							),
						),
				]),
				FormPage::new(vec![
					Section::new("pets")
						.with_field(FieldDefinition::new("hasPet", FieldType::Toggle))
						.with_field(
							FieldDefinition::new("petName", FieldType::Text)
								.required()
								.with_visible_if(VisibilityCondition::new(
									"hasPet",
									Operator::Equals,
									json!(true),
								)),
						),
				]),
			],
		)
		.with_settings(FormSettings {
			show_progress_bar: true,
			..FormSettings::default()
		})
	}

	#[rstest]
	fn test_next_blocked_by_page_errors(two_page_form: Form) {
		let mut renderer = FormRenderer::new(two_page_form);
		renderer.set_value("title", json!("Garden")).unwrap();
		renderer.set_value("age", json!(15)).unwrap();

		let result = renderer.next();

		assert!(matches!(result, Err(RendererError::PageHasErrors { page: 0, .. })));
		assert_eq!(renderer.state(), RendererState::ViewingPage(0));
		assert_eq!(renderer.field_error("age"), Some("Value must be at least 18"));
	}

	#[rstest]
	fn test_next_and_previous_move_between_pages(two_page_form: Form) {
		let mut renderer = FormRenderer::new(two_page_form);

		renderer.previous().unwrap();
		assert_eq!(renderer.current_page(), 0);

		renderer.next().unwrap();
		assert_eq!(renderer.state(), RendererState::ViewingPage(1));

		renderer.next().unwrap();
		assert_eq!(renderer.current_page(), 1);

		renderer.previous().unwrap();
		assert_eq!(renderer.current_page(), 0);
	}

	#[rstest]
	fn test_previous_is_never_blocked(two_page_form: Form) {
		let mut renderer = FormRenderer::new(two_page_form);
		renderer.jump_to_section("pets").unwrap();
		renderer.set_value("hasPet", json!("maybe")).unwrap();
		assert_eq!(renderer.current_page_status(), SectionStatus::Error);

		renderer.previous().unwrap();

		assert_eq!(renderer.current_page(), 0);
	}

	#[rstest]
	fn test_jump_to_unknown_section(two_page_form: Form) {
		let mut renderer = FormRenderer::new(two_page_form);
		assert!(matches!(
			renderer.jump_to_section("nope"),
			Err(RendererError::UnknownSection(_))
		));
		assert_eq!(renderer.current_page(), 0);
	}

	#[rstest]
	fn test_progress_tracks_page(two_page_form: Form) {
		let mut renderer = FormRenderer::new(two_page_form);
		assert_eq!(renderer.progress_percentage(), Some(50.0));
		renderer.next().unwrap();
		assert_eq!(renderer.progress_percentage(), Some(100.0));
	}

	#[rstest]
	fn test_progress_hidden_without_setting() {
		let renderer = FormRenderer::new(Form::single_page("f", "F", vec![]));
		assert_eq!(renderer.progress_percentage(), None);
	}

	#[rstest]
	fn test_blur_records_and_clears_errors(two_page_form: Form) {
		let mut renderer = FormRenderer::new(two_page_form);

		let result = renderer.blur("title").unwrap();
		assert!(!result.valid);
		assert_eq!(renderer.field_error("title"), Some(REQUIRED_MESSAGE));

		renderer.set_value("title", json!("Garden")).unwrap();
		assert_eq!(renderer.field_error("title"), None);
	}

	#[rstest]
	fn test_submit_rejects_and_focuses_first_error_page(two_page_form: Form) {
		let recorder = Recorder::default();
		let mut renderer = FormRenderer::new(two_page_form).with_handler(recorder.clone());
		renderer.set_value("title", json!("Garden")).unwrap();
		renderer.set_value("hasPet", json!(true)).unwrap();
		renderer.jump_to_section("basics").unwrap();

		let result = renderer.submit();

		match result {
			Err(RendererError::SubmitRejected { page, errors }) => {
				assert_eq!(page, 1);
				assert_eq!(errors.keys().collect::<Vec<_>>(), ["petName"]);
			}
			other => panic!("expected SubmitRejected, got {:?}", other),
		}
		assert_eq!(renderer.state(), RendererState::ViewingPage(1));
		assert_eq!(renderer.value("title"), Some(&json!("Garden")));
		assert!(recorder.submits.lock().unwrap().is_empty());
	}

	#[rstest]
	fn test_hidden_required_field_does_not_block_submit(two_page_form: Form) {
		let recorder = Recorder::default();
		let mut renderer = FormRenderer::new(two_page_form).with_handler(recorder.clone());
		renderer.set_value("title", json!("Garden")).unwrap();
		renderer.set_value("hasPet", json!(true)).unwrap();
		renderer.set_value("petName", json!("Rex")).unwrap();
		renderer.set_value("hasPet", json!(false)).unwrap();

		let payload = renderer.submit().unwrap();

		assert_eq!(renderer.state(), RendererState::SubmittedPublished);
		assert!(!payload.contains_key("petName"));
		assert_eq!(recorder.submits.lock().unwrap().len(), 1);
	}

	#[rstest]
	fn test_save_draft_skips_validation_and_purges_hidden(two_page_form: Form) {
		let recorder = Recorder::default();
		let mut renderer = FormRenderer::new(two_page_form).with_handler(recorder.clone());
		renderer.set_value("age", json!(3)).unwrap();
		renderer.set_value("petName", json!("Rex")).unwrap();

		let payload = renderer.save_draft().unwrap();

		assert_eq!(renderer.state(), RendererState::SubmittedDraft);
		assert_eq!(payload.get("age"), Some(&json!(3)));
		assert!(!payload.contains_key("petName"));
		assert_eq!(recorder.drafts.lock().unwrap()[0], payload);
	}

	#[rstest]
	fn test_retain_policy_keeps_hidden_values(two_page_form: Form) {
		let mut renderer = FormRenderer::new(two_page_form).with_options(RendererOptions {
			hidden_values: HiddenValuePolicy::Retain,
			..RendererOptions::default()
		});
		renderer.set_value("petName", json!("Rex")).unwrap();

		let payload = renderer.save_draft().unwrap();

		assert_eq!(payload.get("petName"), Some(&json!("Rex")));
	}

	#[rstest]
	fn test_persistence_failure_keeps_answers(two_page_form: Form) {
		let recorder = Recorder {
			fail_with: Some("disk full".to_string()),
			..Recorder::default()
		};
		let mut renderer = FormRenderer::new(two_page_form).with_handler(recorder);
		renderer.set_value("title", json!("Garden")).unwrap();

		let result = renderer.submit();

		assert!(matches!(result, Err(RendererError::Persistence(_))));
		assert_eq!(renderer.last_notice(), Some("disk full"));
		assert_eq!(renderer.state(), RendererState::ViewingPage(0));
		assert_eq!(renderer.value("title"), Some(&json!("Garden")));
	}

	#[rstest]
	fn test_draft_persistence_failure_keeps_session_open(two_page_form: Form) {
		let recorder = Recorder {
			fail_with: Some("offline".to_string()),
			..Recorder::default()
		};
		let mut renderer = FormRenderer::new(two_page_form).with_handler(recorder.clone());
		renderer.set_value("title", json!("Garden")).unwrap();

		let result = renderer.save_draft();

		assert!(matches!(result, Err(RendererError::Persistence(_))));
		assert_eq!(renderer.last_notice(), Some("offline"));
		assert_eq!(renderer.state(), RendererState::ViewingPage(0));
		assert_eq!(renderer.value("title"), Some(&json!("Garden")));
		assert!(recorder.drafts.lock().unwrap().is_empty());
		renderer.set_value("title", json!("Orchard")).unwrap();
	}

	#[rstest]
	fn test_hidden_field_error_is_dropped(two_page_form: Form) {
		let mut renderer = FormRenderer::new(two_page_form);
		renderer.set_value("hasPet", json!(true)).unwrap();
		renderer.blur("petName").unwrap();
		assert_eq!(renderer.field_error("petName"), Some(REQUIRED_MESSAGE));

		renderer.set_value("hasPet", json!(false)).unwrap();
		assert_eq!(renderer.field_error("petName"), None);

		renderer.set_value("hasPet", json!(true)).unwrap();
		assert_eq!(renderer.field_error("petName"), None);
	}

	#[rstest]
	fn test_clearing_controller_drops_dependent_error(two_page_form: Form) {
		let mut renderer = FormRenderer::new(two_page_form);
		renderer.set_value("hasPet", json!(true)).unwrap();
		renderer.blur("petName").unwrap();

		renderer.clear_value("hasPet").unwrap();

		assert!(renderer.field_errors().is_empty());
	}

	#[rstest]
	fn test_create_session_ignores_initial_answers(two_page_form: Form) {
		let initial: FormInstanceData = [("title".to_string(), json!("Garden"))].into_iter().collect();

		let renderer = FormRenderer::with_initial(two_page_form, FormMode::Create, initial);

		assert_eq!(renderer.mode(), FormMode::Create);
		assert!(renderer.answers().is_empty());
	}

	#[rstest]
	fn test_drafts_disabled(two_page_form: Form) {
		let form = two_page_form.with_settings(FormSettings {
			allow_save_draft: false,
			..FormSettings::default()
		});
		let mut renderer = FormRenderer::new(form);

		assert!(matches!(renderer.save_draft(), Err(RendererError::DraftsDisabled)));
	}

	#[rstest]
	fn test_view_mode_rejects_mutation(two_page_form: Form) {
		let initial: FormInstanceData = [("title".to_string(), json!("Garden"))].into_iter().collect();
		let mut renderer = FormRenderer::view(two_page_form, initial);

		assert!(matches!(renderer.set_value("title", json!("x")), Err(RendererError::ReadOnly)));
		assert!(matches!(renderer.save_draft(), Err(RendererError::ReadOnly)));
		assert!(matches!(renderer.submit(), Err(RendererError::ReadOnly)));
		renderer.next().unwrap();
		assert_eq!(renderer.current_page(), 1);
		assert_eq!(renderer.value("title"), Some(&json!("Garden")));
	}

	#[rstest]
	fn test_edit_mode_starts_from_initial(two_page_form: Form) {
		let initial: FormInstanceData = [("title".to_string(), json!("Garden"))].into_iter().collect();
		let renderer = FormRenderer::edit(two_page_form, initial);

		assert_eq!(renderer.mode(), FormMode::Edit);
		assert_eq!(renderer.section_status("basics"), Some(SectionStatus::Valid));
	}

	#[rstest]
	fn test_terminal_state_rejects_everything(two_page_form: Form) {
		let mut renderer = FormRenderer::new(two_page_form);
		renderer.save_draft().unwrap();

		assert!(matches!(renderer.set_value("title", json!("x")), Err(RendererError::Closed)));
		assert!(matches!(renderer.next(), Err(RendererError::Closed)));
		assert!(matches!(renderer.submit(), Err(RendererError::Closed)));
	}

	#[rstest]
	fn test_custom_required_message(two_page_form: Form) {
		let mut renderer = FormRenderer::new(two_page_form).with_options(RendererOptions {
			required_message: "Pflichtfeld".to_string(),
			..RendererOptions::default()
		});

		renderer.blur("title").unwrap();

		assert_eq!(renderer.field_error("title"), Some("Pflichtfeld"));
	}
}
