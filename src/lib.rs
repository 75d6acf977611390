//! # formdeck
//!
//! Dynamic, schema-driven forms for project entry screens.
//!
//! A form is plain data: pages of sections of fields, each field with
//! optional validation rules, a visibility condition on another field's
//! answer, and a responsive column span. formdeck loads that schema, keeps
//! an editing session's answers, validates them, and walks the user through
//! the pages until the entry is saved as a draft or published.
//!
//! ## Feature Flags
//!
//! - `forms` - Schema, validation, visibility, layout and the renderer
//! - `conf` - TOML/env settings, logging subscriber and theme
//! - `full` (default) - Everything
//!
//! ## Quick Example
//!
//! ```
//! use formdeck::prelude::*;
//! use serde_json::json;
//!
//! let form = Form::from_value(json!({
//!     "id": "intake",
//!     "title": "Intake",
//!     "sections": [{
//!         "id": "owner",
//!         "fields": [
//!             { "name": "age", "type": "number", "required": true, "validation": { "min": 18 } }
//!         ]
//!     }]
//! }))
//! .unwrap();
//!
//! let mut renderer = FormRenderer::new(form);
//! renderer.set_value("age", json!(15)).unwrap();
//! assert!(renderer.submit().is_err());
//!
//! renderer.set_value("age", json!(42)).unwrap();
//! let payload = renderer.submit().unwrap();
//! assert_eq!(payload["age"], json!(42));
//! ```

#[cfg(feature = "forms")]
pub use formdeck_forms as forms;

#[cfg(feature = "conf")]
pub use formdeck_conf as conf;

#[cfg(feature = "forms")]
pub use formdeck_forms::{
	FieldDefinition, FieldType, Form, FormInstanceData, FormMode, FormRenderer, RenderExt,
	RendererError, RendererOptions, RendererState, SchemaError, Section, SectionStatus,
	SubmissionHandler,
};

#[cfg(feature = "conf")]
pub use formdeck_conf::{FormsSettings, SettingsError, init_logging};

/// Start a renderer for `form` in `mode`, configured from `settings`.
#[cfg(feature = "conf")]
pub fn renderer_from_settings(
	form: Form,
	mode: FormMode,
	initial: FormInstanceData,
	settings: &FormsSettings,
) -> FormRenderer {
	FormRenderer::with_initial(form, mode, initial).with_options(settings.renderer_options())
}

pub mod prelude {
	#[cfg(feature = "forms")]
	pub use formdeck_forms::{
		ColumnSpan, FieldDefinition, FieldOption, FieldType, Form, FormInstanceData, FormLayout,
		FormMode, FormPage, FormRenderer, FormSettings, HiddenValuePolicy, Operator,
		PersistenceError, RenderExt, RenderedPage, RendererError, RendererOptions, RendererState,
		Section, SectionStatus, SubmissionHandler, ValidationRules, VisibilityCondition,
	};

	#[cfg(feature = "conf")]
	pub use formdeck_conf::{FormsSettings, ThemeSettings, current_theme, init_logging, init_theme};

	#[cfg(feature = "conf")]
	pub use crate::renderer_from_settings;
}
