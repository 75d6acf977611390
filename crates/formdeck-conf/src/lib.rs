//! # formdeck configuration
//!
//! Settings for the form engine, read from TOML and `FORMDECK_*` environment
//! variables, plus the logging subscriber and the process-wide theme.

pub mod logging;
pub mod settings;
pub mod theme;

pub use logging::init_logging;
pub use settings::{FormsSettings, LoggingSettings, SettingsError, SettingsResult};
pub use theme::{ThemeMode, ThemeSettings, current_theme, init_theme, teardown_theme};
