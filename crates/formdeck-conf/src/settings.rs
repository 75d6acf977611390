//! Form engine settings
//!
//! ```toml
//! hidden_values = "retain"
//! required_message = "Please fill in this field"
//!
//! [log]
//! filter = "formdeck=debug"
//! ansi = false
//!
//! [theme]
//! mode = "dark"
//! primary_color = "#7c3aed"
//! ```
//!
//! Every key is optional. Environment variables win over the file:
//!
//! | Variable                    | Setting            |
//! |-----------------------------|--------------------|
//! | `FORMDECK_HIDDEN_VALUES`    | `hidden_values`    |
//! | `FORMDECK_REQUIRED_MESSAGE` | `required_message` |
//! | `FORMDECK_LOG`              | `log.filter`       |
//! | `FORMDECK_THEME`            | `theme.mode`       |

use crate::theme::{ThemeMode, ThemeSettings};
use formdeck_forms::{HiddenValuePolicy, REQUIRED_MESSAGE, RendererOptions};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_HIDDEN_VALUES: &str = "FORMDECK_HIDDEN_VALUES";
pub const ENV_REQUIRED_MESSAGE: &str = "FORMDECK_REQUIRED_MESSAGE";
pub const ENV_LOG: &str = "FORMDECK_LOG";
pub const ENV_THEME: &str = "FORMDECK_THEME";

/// Settings error
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("File error: {0}")]
	FileError(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Invalid value for {key}: {value:?}")]
	InvalidValue { key: &'static str, value: String },

	#[error("Unsupported format: {0}")]
	UnsupportedFormat(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// `EnvFilter` directives, used when `RUST_LOG` is unset.
	pub filter: String,
	pub ansi: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			filter: "formdeck=info".to_string(),
			ansi: true,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsSettings {
	/// What happens to answers of hidden fields when the form is saved.
	pub hidden_values: HiddenValuePolicy,
	pub required_message: String,
	pub log: LoggingSettings,
	pub theme: ThemeSettings,
}

impl Default for FormsSettings {
	fn default() -> Self {
		Self {
			hidden_values: HiddenValuePolicy::Purge,
			required_message: REQUIRED_MESSAGE.to_string(),
			log: LoggingSettings::default(),
			theme: ThemeSettings::default(),
		}
	}
}

impl FormsSettings {
	pub fn from_toml_str(contents: &str) -> SettingsResult<Self> {
		toml::from_str(contents)
			.map_err(|e| SettingsError::ParseError(format!("TOML parse error: {}", e)))
	}

	/// Load settings from a `.toml` or `.json` file.
	pub fn from_file(path: impl Into<PathBuf>) -> SettingsResult<Self> {
		let path = path.into();
		let contents = std::fs::read_to_string(&path).map_err(|e| {
			SettingsError::FileError(format!("Failed to read {}: {}", path.display(), e))
		})?;

		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml_str(&contents),
			Some("json") => serde_json::from_str(&contents)
				.map_err(|e| SettingsError::ParseError(format!("JSON parse error: {}", e))),
			_ => Err(SettingsError::UnsupportedFormat(
				"Supported formats: .toml, .json".to_string(),
			)),
		}
	}

	/// Defaults overlaid with the process environment.
	pub fn from_env() -> SettingsResult<Self> {
		Self::default().with_env_overrides()
	}

	/// Load `.env` from `dir` into the process environment, then apply
	/// overrides. A missing `.env` is not an error.
	pub fn with_dotenv(self, dir: impl AsRef<Path>) -> SettingsResult<Self> {
		let path = dir.as_ref().join(".env");
		if path.exists() {
			dotenv::from_path(&path).map_err(|e| {
				SettingsError::FileError(format!("Failed to load {}: {}", path.display(), e))
			})?;
			tracing::debug!(path = %path.display(), "loaded .env");
		}
		self.with_env_overrides()
	}

	/// Apply `FORMDECK_*` variables on top of these settings.
	pub fn with_env_overrides(mut self) -> SettingsResult<Self> {
		if let Ok(policy) = env::var(ENV_HIDDEN_VALUES) {
			self.hidden_values = parse_hidden_values(&policy)?;
		}
		if let Ok(message) = env::var(ENV_REQUIRED_MESSAGE)
			&& !message.trim().is_empty()
		{
			self.required_message = message;
		}
		if let Ok(filter) = env::var(ENV_LOG) {
			self.log.filter = filter;
		}
		if let Ok(mode) = env::var(ENV_THEME) {
			self.theme.mode = parse_theme_mode(&mode)?;
		}
		Ok(self)
	}

	pub fn renderer_options(&self) -> RendererOptions {
		RendererOptions {
			hidden_values: self.hidden_values,
			required_message: self.required_message.clone(),
		}
	}
}

fn parse_hidden_values(value: &str) -> SettingsResult<HiddenValuePolicy> {
	match value.trim().to_lowercase().as_str() {
		"purge" => Ok(HiddenValuePolicy::Purge),
		"retain" => Ok(HiddenValuePolicy::Retain),
		_ => Err(SettingsError::InvalidValue {
			key: ENV_HIDDEN_VALUES,
			value: value.to_string(),
		}),
	}
}

fn parse_theme_mode(value: &str) -> SettingsResult<ThemeMode> {
	match value.trim().to_lowercase().as_str() {
		"light" => Ok(ThemeMode::Light),
		"dark" => Ok(ThemeMode::Dark),
		"system" => Ok(ThemeMode::System),
		_ => Err(SettingsError::InvalidValue {
			key: ENV_THEME,
			value: value.to_string(),
		}),
	}
}
