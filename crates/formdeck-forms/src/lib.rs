//! Dynamic forms for formdeck
//!
//! This crate turns a declarative form schema into an editing session:
//! - Field, section and page schema loaded from JSON, skipping malformed fields
//! - Conditional visibility between fields
//! - Per-field validation and section/page/form status aggregation
//! - Responsive column spans on a 12-column grid
//! - A multi-page renderer with draft and publish submission
//! - Serializable render snapshots and permission-based mode resolution

pub mod access;
pub mod field;
pub mod layout;
pub mod metadata;
pub mod renderer;
pub mod schema;
pub mod status;
pub mod validators;
pub mod visibility;

pub use access::{AccessError, FormAccess, Role, resolve_mode};
pub use field::{FieldDefinition, FieldOption, FieldType, Pattern, ValidationRules};
pub use layout::{BreakpointSpans, ColumnSpan, ResolvedSpan, resolve_column_span};
pub use metadata::{RenderExt, RenderedField, RenderedPage, RenderedSection};
pub use renderer::{
	FormMode, FormRenderer, PersistenceError, RendererError, RendererOptions, RendererResult,
	RendererState, SubmissionHandler,
};
pub use schema::{
	Form, FormInstanceData, FormLayout, FormPage, FormSettings, SchemaError, SchemaResult,
	SchemaWarning, Section,
};
pub use status::{FormValidator, SectionStatus, validate_form, validate_page, validate_section};
pub use validators::{FieldValidation, FieldValidator, REQUIRED_MESSAGE, validate_field};
pub use visibility::{HiddenValuePolicy, Operator, VisibilityCondition, is_visible};
