//! Process-wide theme
//!
//! The presentation layer reads the theme once per render through
//! [`current_theme`]. It is installed with [`init_theme`] at startup and
//! removed with [`teardown_theme`]; before init the default light theme is
//! reported.

use indexmap::IndexMap;
use parking_lot::{RwLock, const_rwlock};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
	#[default]
	Light,
	Dark,
	/// Follow the operating system preference.
	System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
	pub mode: ThemeMode,
	pub primary_color: String,
	/// Extra palette entries, emitted as `--<name>` variables.
	pub palette: IndexMap<String, String>,
}

impl Default for ThemeSettings {
	fn default() -> Self {
		Self {
			mode: ThemeMode::Light,
			primary_color: "#2563eb".to_string(),
			palette: IndexMap::new(),
		}
	}
}

impl ThemeSettings {
	/// CSS custom properties for this theme, in declaration order.
	pub fn css_variables(&self) -> Vec<(String, String)> {
		let mode = match self.mode {
			ThemeMode::Light => "light",
			ThemeMode::Dark => "dark",
			ThemeMode::System => "light dark",
		};
		let mut vars = vec![
			("--color-scheme".to_string(), mode.to_string()),
			("--primary-color".to_string(), self.primary_color.clone()),
		];
		vars.extend(
			self.palette
				.iter()
				.map(|(name, value)| (format!("--{}", name), value.clone())),
		);
		vars
	}
}

static THEME: RwLock<Option<ThemeSettings>> = const_rwlock(None);

/// Install `theme`, returning the one it replaces.
pub fn init_theme(theme: ThemeSettings) -> Option<ThemeSettings> {
	tracing::debug!(mode = ?theme.mode, "theme installed");
	THEME.write().replace(theme)
}

pub fn current_theme() -> ThemeSettings {
	THEME.read().clone().unwrap_or_default()
}

/// Remove the installed theme.
pub fn teardown_theme() -> Option<ThemeSettings> {
	THEME.write().take()
}
