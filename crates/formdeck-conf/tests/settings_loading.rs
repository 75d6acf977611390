//! Settings loading from files, `.env` and the environment

use formdeck_conf::{FormsSettings, SettingsError, ThemeMode};
use formdeck_forms::HiddenValuePolicy;
use rstest::*;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

const VARS: [&str; 4] = [
	"FORMDECK_HIDDEN_VALUES",
	"FORMDECK_REQUIRED_MESSAGE",
	"FORMDECK_LOG",
	"FORMDECK_THEME",
];

#[fixture]
fn temp_dir() -> TempDir {
	TempDir::new().expect("Failed to create temp directory")
}

fn clear_vars() {
	// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
	// Every test touching them runs under #[serial].
	unsafe {
		for var in VARS {
			env::remove_var(var);
		}
	}
}

#[rstest]
fn test_from_toml_file(temp_dir: TempDir) {
	let path = temp_dir.path().join("formdeck.toml");
	fs::write(
		&path,
		r##"
required_message = "Please fill in this field"

[log]
filter = "formdeck=debug"

[theme]
mode = "dark"
primary_color = "#7c3aed"

[theme.palette]
surface = "#111827"
"##,
	)
	.expect("Failed to write formdeck.toml");

	let settings = FormsSettings::from_file(&path).unwrap();

	assert_eq!(settings.required_message, "Please fill in this field");
	assert_eq!(settings.log.filter, "formdeck=debug");
	assert_eq!(settings.theme.mode, ThemeMode::Dark);
	assert_eq!(settings.theme.palette["surface"], "#111827");
	assert_eq!(settings.hidden_values, HiddenValuePolicy::Purge);
}

#[rstest]
fn test_from_json_file(temp_dir: TempDir) {
	let path = temp_dir.path().join("formdeck.json");
	fs::write(&path, r#"{ "hidden_values": "retain" }"#).expect("Failed to write formdeck.json");

	let settings = FormsSettings::from_file(&path).unwrap();

	assert_eq!(settings.hidden_values, HiddenValuePolicy::Retain);
}

#[rstest]
#[case("formdeck.yaml", "hidden_values: retain")]
fn test_unsupported_extension(temp_dir: TempDir, #[case] name: &str, #[case] contents: &str) {
	let path = temp_dir.path().join(name);
	fs::write(&path, contents).unwrap();

	let result = FormsSettings::from_file(&path);

	assert!(matches!(result, Err(SettingsError::UnsupportedFormat(_))));
}

#[rstest]
fn test_missing_file(temp_dir: TempDir) {
	let result = FormsSettings::from_file(temp_dir.path().join("absent.toml"));

	assert!(matches!(result, Err(SettingsError::FileError(_))));
}

#[rstest]
#[serial]
fn test_env_overrides_file_values() {
	clear_vars();
	// SAFETY: see clear_vars.
	unsafe {
		env::set_var("FORMDECK_HIDDEN_VALUES", "retain");
		env::set_var("FORMDECK_REQUIRED_MESSAGE", "Required!");
		env::set_var("FORMDECK_THEME", "system");
	}

	let settings = FormsSettings::from_toml_str("hidden_values = \"purge\"")
		.and_then(FormsSettings::with_env_overrides)
		.unwrap();

	clear_vars();
	assert_eq!(settings.hidden_values, HiddenValuePolicy::Retain);
	assert_eq!(settings.renderer_options().required_message, "Required!");
	assert_eq!(settings.theme.mode, ThemeMode::System);
}

#[rstest]
#[serial]
fn test_invalid_env_value_is_reported() {
	clear_vars();
	// SAFETY: see clear_vars.
	unsafe {
		env::set_var("FORMDECK_HIDDEN_VALUES", "sometimes");
	}

	let result = FormsSettings::from_env();

	clear_vars();
	match result {
		Err(SettingsError::InvalidValue { key, value }) => {
			assert_eq!(key, "FORMDECK_HIDDEN_VALUES");
			assert_eq!(value, "sometimes");
		}
		other => panic!("expected InvalidValue, got {:?}", other),
	}
}

#[rstest]
#[serial]
fn test_dotenv_is_loaded(temp_dir: TempDir) {
	clear_vars();
	let dotenv_content = r#"
FORMDECK_LOG=formdeck=trace
FORMDECK_HIDDEN_VALUES=retain
"#;
	fs::write(temp_dir.path().join(".env"), dotenv_content).expect("Failed to write .env");

	let settings = FormsSettings::default().with_dotenv(temp_dir.path()).unwrap();

	clear_vars();
	assert_eq!(settings.log.filter, "formdeck=trace");
	assert_eq!(settings.hidden_values, HiddenValuePolicy::Retain);
}

#[rstest]
#[serial]
fn test_missing_dotenv_is_fine(temp_dir: TempDir) {
	clear_vars();

	let settings = FormsSettings::default().with_dotenv(temp_dir.path()).unwrap();

	assert_eq!(settings, FormsSettings::default());
}
