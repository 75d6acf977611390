//! Which renderer mode a user may open a project entry in.
//!
//! Permissions are plain strings in the format `"app_label.permission_name"`
//! and a check is set membership; superusers pass every check.
//!
//! ```
//! use formdeck_forms::FormMode;
//! use formdeck_forms::access::{Role, VIEW_PROJECT, resolve_mode};
//!
//! let viewer = Role::new("viewer").with_permission(VIEW_PROJECT);
//! assert_eq!(resolve_mode(&viewer, FormMode::Edit).unwrap(), FormMode::View);
//! assert!(resolve_mode(&viewer, FormMode::Create).is_err());
//! ```

use crate::renderer::FormMode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const ADD_PROJECT: &str = "projects.add_project";
pub const CHANGE_PROJECT: &str = "projects.change_project";
pub const VIEW_PROJECT: &str = "projects.view_project";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Permission `{permission}` is required to {mode} entries")]
pub struct AccessError {
	pub permission: &'static str,
	pub mode: FormMode,
}

/// Anything that carries permissions: a user, a role, a group.
pub trait FormAccess {
	fn is_superuser(&self) -> bool;

	fn permissions(&self) -> &[String];

	fn has_perm(&self, perm: &str) -> bool {
		self.is_superuser() || self.permissions().iter().any(|p| p == perm)
	}

	fn has_perms(&self, perms: &[&str]) -> bool {
		if self.is_superuser() {
			return true;
		}
		let held: HashSet<&str> = self.permissions().iter().map(String::as_str).collect();
		perms.iter().all(|p| held.contains(p))
	}

	/// Any permission under `"<app_label>."`.
	fn has_module_perms(&self, app_label: &str) -> bool {
		if self.is_superuser() {
			return true;
		}
		let prefix = format!("{}.", app_label);
		self.permissions().iter().any(|p| p.starts_with(&prefix))
	}
}

/// A named permission set, as stored by the admin's role management.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
	pub name: String,
	#[serde(default)]
	pub permissions: Vec<String>,
	#[serde(default)]
	pub is_superuser: bool,
}

impl Role {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	pub fn superuser(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			is_superuser: true,
			..Self::default()
		}
	}

	pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
		self.permissions.push(permission.into());
		self
	}
}

impl FormAccess for Role {
	fn is_superuser(&self) -> bool {
		self.is_superuser
	}

	fn permissions(&self) -> &[String] {
		&self.permissions
	}
}

/// Mode granted for `requested`.
///
/// Edit falls back to view when the user can read but not change entries.
pub fn resolve_mode(user: &impl FormAccess, requested: FormMode) -> Result<FormMode, AccessError> {
	let denied = |permission| AccessError {
		permission,
		mode: requested,
	};
	match requested {
		FormMode::Create if user.has_perm(ADD_PROJECT) => Ok(FormMode::Create),
		FormMode::Create => Err(denied(ADD_PROJECT)),
		FormMode::Edit if user.has_perm(CHANGE_PROJECT) => Ok(FormMode::Edit),
		FormMode::Edit | FormMode::View if user.has_perm(VIEW_PROJECT) => Ok(FormMode::View),
		FormMode::Edit => Err(denied(CHANGE_PROJECT)),
		FormMode::View => Err(denied(VIEW_PROJECT)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(FormMode::Create, Ok(FormMode::Create))]
	#[case(FormMode::Edit, Ok(FormMode::Edit))]
	#[case(FormMode::View, Err(VIEW_PROJECT))]
	fn test_editor_without_view(#[case] requested: FormMode, #[case] expected: Result<FormMode, &str>) {
		let editor = Role::new("editor")
			.with_permission(ADD_PROJECT)
			.with_permission(CHANGE_PROJECT);

		let result = resolve_mode(&editor, requested).map_err(|e| e.permission);

		assert_eq!(result, expected);
	}

	#[rstest]
	fn test_superuser_gets_requested_mode() {
		let admin = Role::superuser("admin");
		for mode in [FormMode::Create, FormMode::Edit, FormMode::View] {
			assert_eq!(resolve_mode(&admin, mode), Ok(mode));
		}
	}

	#[rstest]
	fn test_no_permissions_is_denied_with_message() {
		let guest = Role::new("guest");

		let err = resolve_mode(&guest, FormMode::Edit).unwrap_err();

		assert_eq!(
			err.to_string(),
			"Permission `projects.change_project` is required to edit entries"
		);
	}

	#[rstest]
	fn test_permission_helpers() {
		let role: Role = serde_json::from_value(json!({
			"name": "reporter",
			"permissions": ["projects.view_project", "pages.view_page"]
		}))
		.unwrap();

		assert!(role.has_perm(VIEW_PROJECT));
		assert!(!role.has_perm(ADD_PROJECT));
		assert!(role.has_perms(&[VIEW_PROJECT, "pages.view_page"]));
		assert!(!role.has_perms(&[VIEW_PROJECT, ADD_PROJECT]));
		assert!(role.has_module_perms("pages"));
		assert!(!role.has_module_perms("users"));
	}
}
