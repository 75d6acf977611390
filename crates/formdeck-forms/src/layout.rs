//! Responsive column spans on a 12-column grid.
//!
//! A field's `columnSpan` comes in two shapes that must never be mixed:
//!
//! - a bare number, which applies unchanged to every breakpoint;
//! - an object keyed by breakpoint, where each missing key falls back to its
//!   own default (mobile 12, tablet 6, desktop 4).
//!
//! ```
//! use formdeck_forms::layout::{resolve_column_span, BreakpointSpans, ColumnSpan, ResolvedSpan};
//!
//! assert_eq!(
//!     resolve_column_span(Some(&ColumnSpan::Uniform(6))),
//!     ResolvedSpan { mobile: 6, tablet: 6, desktop: 6 },
//! );
//!
//! let desktop_only = ColumnSpan::Responsive(BreakpointSpans { desktop: Some(3), ..Default::default() });
//! assert_eq!(
//!     resolve_column_span(Some(&desktop_only)),
//!     ResolvedSpan { mobile: 12, tablet: 6, desktop: 3 },
//! );
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

pub const GRID_COLUMNS: u8 = 12;
pub const DEFAULT_MOBILE_SPAN: u8 = 12;
pub const DEFAULT_TABLET_SPAN: u8 = 6;
pub const DEFAULT_DESKTOP_SPAN: u8 = 4;

/// Column span as written in the schema.
///
/// Any JSON number is accepted: fractions are truncated and integers beyond
/// `i64` saturate, so every value still reaches the clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSpan {
	Uniform(#[serde(deserialize_with = "span_value")] i64),
	Responsive(BreakpointSpans),
}

/// Per-breakpoint spans; any of them may be omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointSpans {
	#[serde(
		default,
		deserialize_with = "optional_span_value",
		skip_serializing_if = "Option::is_none"
	)]
	pub mobile: Option<i64>,
	#[serde(
		default,
		deserialize_with = "optional_span_value",
		skip_serializing_if = "Option::is_none"
	)]
	pub tablet: Option<i64>,
	#[serde(
		default,
		deserialize_with = "optional_span_value",
		skip_serializing_if = "Option::is_none"
	)]
	pub desktop: Option<i64>,
}

fn number_to_span(n: &Number) -> i64 {
	if let Some(i) = n.as_i64() {
		i
	} else if n.as_u64().is_some() {
		i64::MAX
	} else {
		// `as` saturates at the i64 bounds.
		n.as_f64().map_or(0, |f| f.trunc() as i64)
	}
}

fn span_value<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: Deserializer<'de>,
{
	Number::deserialize(deserializer).map(|n| number_to_span(&n))
}

fn optional_span_value<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<Number>::deserialize(deserializer).map(|n| n.as_ref().map(number_to_span))
}

/// Concrete span per breakpoint, each in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedSpan {
	pub mobile: u8,
	pub tablet: u8,
	pub desktop: u8,
}

impl Default for ResolvedSpan {
	fn default() -> Self {
		Self {
			mobile: DEFAULT_MOBILE_SPAN,
			tablet: DEFAULT_TABLET_SPAN,
			desktop: DEFAULT_DESKTOP_SPAN,
		}
	}
}

impl ResolvedSpan {
	/// Grid utility classes, mobile first.
	///
	/// # Examples
	///
	/// ```
	/// use formdeck_forms::layout::ResolvedSpan;
	///
	/// assert_eq!(ResolvedSpan::default().grid_classes(), "col-12 md:col-6 lg:col-4");
	/// ```
	pub fn grid_classes(&self) -> String {
		format!(
			"col-{} md:col-{} lg:col-{}",
			self.mobile, self.tablet, self.desktop
		)
	}
}

fn clamp_span(value: i64) -> u8 {
	// Clamped into 1..=12, so the cast cannot truncate.
	value.clamp(1, i64::from(GRID_COLUMNS)) as u8
}

/// Resolve a schema column span into concrete per-breakpoint spans.
pub fn resolve_column_span(span: Option<&ColumnSpan>) -> ResolvedSpan {
	match span {
		None => ResolvedSpan::default(),
		Some(ColumnSpan::Uniform(n)) => {
			let n = clamp_span(*n);
			ResolvedSpan {
				mobile: n,
				tablet: n,
				desktop: n,
			}
		}
		Some(ColumnSpan::Responsive(spans)) => ResolvedSpan {
			mobile: spans
				.mobile
				.map_or(DEFAULT_MOBILE_SPAN, clamp_span),
			tablet: spans
				.tablet
				.map_or(DEFAULT_TABLET_SPAN, clamp_span),
			desktop: spans
				.desktop
				.map_or(DEFAULT_DESKTOP_SPAN, clamp_span),
		},
	}
}
