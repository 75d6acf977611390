//! Serializable render snapshot of a renderer's current page.
//!
//! The presentation layer never sees [`FormRenderer`] itself. It receives a
//! [`RenderedPage`]: plain data describing which fields to draw, where on the
//! grid, with which value and error, and the status of every section for the
//! navigation sidebar.
//!
//! ```mermaid
//! flowchart LR
//!     Renderer["FormRenderer<br/>(answers, navigation)"]
//!     Page["RenderedPage<br/>(plain data, serializable)"]
//!     UI["Presentation<br/>(form view, section sidebar)"]
//!
//!     Renderer -->|"render_current_page()"| Page
//!     Page --> UI
//! ```
//!
//! ## Example
//!
//! ```
//! use formdeck_forms::{FieldDefinition, FieldType, Form, FormRenderer, Section};
//! use formdeck_forms::metadata::RenderExt;
//!
//! let form = Form::single_page(
//!     "f",
//!     "Feedback",
//!     vec![Section::new("s").with_field(FieldDefinition::new("comment", FieldType::Textarea))],
//! );
//! let renderer = FormRenderer::new(form);
//!
//! let page = renderer.render_current_page();
//! let json = serde_json::to_string(&page).unwrap();
//! assert!(json.contains("\"name\":\"comment\""));
//! ```

use crate::field::{FieldDefinition, FieldOption, FieldType};
use crate::layout::{ResolvedSpan, resolve_column_span};
use crate::renderer::{FormMode, FormRenderer, RendererState};
use crate::status::SectionStatus;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
	pub form_id: String,
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_title: Option<String>,
	pub page_index: usize,
	pub page_count: usize,
	/// Present only when the form shows a progress bar.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub progress: Option<f32>,
	pub mode: FormMode,
	pub state: RendererState,
	pub read_only: bool,
	pub sections: Vec<RenderedSection>,
	/// Every section of the form, not only this page's.
	pub section_statuses: IndexMap<String, SectionStatus>,
	/// Load-time schema warnings, already formatted.
	#[serde(default)]
	pub warnings: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSection {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub status: SectionStatus,
	pub fields: Vec<RenderedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
	pub id: String,
	pub name: String,
	pub field_type: FieldType,
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub placeholder: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub help_text: Option<String>,
	pub required: bool,
	pub read_only: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<serde_json::Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	pub span: ResolvedSpan,
	pub grid_classes: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<FieldOption>,
}

/// Extension trait producing render snapshots from a renderer.
pub trait RenderExt {
	/// Snapshot of the page currently on screen, visible fields only.
	fn render_current_page(&self) -> RenderedPage;
}

impl RenderExt for FormRenderer {
	fn render_current_page(&self) -> RenderedPage {
		let form = self.form();
		let read_only = self.mode().is_read_only() || self.state().is_terminal();
		let statuses = self.section_statuses();

		let sections = form
			.page_sections(self.current_page())
			.unwrap_or_default()
			.iter()
			.map(|section| RenderedSection {
				id: section.id.clone(),
				title: section.title.clone(),
				description: section.description.clone(),
				status: statuses
					.get(&section.id)
					.copied()
					.unwrap_or(SectionStatus::Valid),
				fields: section
					.fields
					.iter()
					.filter(|f| form.is_field_visible(f, self.answers()))
					.map(|f| render_field(self, f, read_only))
					.collect(),
			})
			.collect();

		RenderedPage {
			form_id: form.id.clone(),
			title: form.title.clone(),
			page_title: form.page_title(self.current_page()).map(str::to_string),
			page_index: self.current_page(),
			page_count: self.page_count(),
			progress: self.progress_percentage(),
			mode: self.mode(),
			state: self.state(),
			read_only,
			sections,
			section_statuses: statuses,
			warnings: form.warnings().iter().map(|w| w.to_string()).collect(),
			notice: self.last_notice().map(str::to_string),
		}
	}
}

fn render_field(renderer: &FormRenderer, field: &FieldDefinition, read_only: bool) -> RenderedField {
	let span = resolve_column_span(field.column_span.as_ref());
	RenderedField {
		id: field.id.clone(),
		name: field.name.clone(),
		field_type: field.field_type,
		label: field.display_label().to_string(),
		placeholder: field.placeholder.clone(),
		help_text: field.help_text.clone(),
		required: field.required,
		read_only,
		value: renderer.value(&field.name).cloned(),
		error: renderer.field_error(&field.name).map(str::to_string),
		grid_classes: span.grid_classes(),
		span,
		options: field.options.clone(),
	}
}
