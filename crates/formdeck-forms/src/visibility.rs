//! Conditional visibility of fields.
//!
//! A field with a `visibleIf` condition is rendered, validated and submitted
//! only while the condition holds against the current answers. Evaluation is
//! recomputed on every call; the answer set is small enough that caching
//! would only add invalidation bugs.

use crate::field::FieldDefinition;
use crate::schema::FormInstanceData;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison applied by a [`VisibilityCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
	Equals,
	NotEquals,
	Contains,
	GreaterThan,
	LessThan,
	IsEmpty,
	IsNotEmpty,
}

/// "Show this field only if `field_name` satisfies `operator` against `value`".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityCondition {
	pub field_name: String,
	pub operator: Operator,
	#[serde(default)]
	pub value: Value,
}

/// What happens to the stored answer of a field once it becomes hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiddenValuePolicy {
	/// Hidden answers are left out of every draft and submit payload.
	#[default]
	Purge,
	/// Hidden answers stay in payloads; they are still never validated.
	Retain,
}

impl VisibilityCondition {
	pub fn new(field_name: impl Into<String>, operator: Operator, value: Value) -> Self {
		Self {
			field_name: field_name.into(),
			operator,
			value,
		}
	}

	/// Evaluate the condition against the referenced field's answer.
	///
	/// # Examples
	///
	/// ```
	/// use formdeck_forms::{Operator, VisibilityCondition};
	/// use serde_json::json;
	///
	/// let condition = VisibilityCondition::new("age", Operator::GreaterThan, json!(17));
	/// assert!(condition.evaluate(Some(&json!("18"))));
	/// assert!(!condition.evaluate(Some(&json!("n/a"))));
	/// assert!(!condition.evaluate(None));
	/// ```
	pub fn evaluate(&self, answer: Option<&Value>) -> bool {
		match self.operator {
			Operator::Equals => values_equal(answer, &self.value),
			Operator::NotEquals => !values_equal(answer, &self.value),
			Operator::Contains => contains(answer, &self.value),
			Operator::GreaterThan => compare_numbers(answer, &self.value, |a, b| a > b),
			Operator::LessThan => compare_numbers(answer, &self.value, |a, b| a < b),
			Operator::IsEmpty => is_empty_value(answer),
			Operator::IsNotEmpty => !is_empty_value(answer),
		}
	}
}

/// Whether `field` is visible for `answers`, looking only at the answer set.
///
/// Use [`Form::is_field_visible`](crate::schema::Form::is_field_visible) when
/// the whole form is at hand: it also hides fields whose condition names a
/// field that does not exist or is itself hidden.
pub fn is_visible(field: &FieldDefinition, answers: &FormInstanceData) -> bool {
	match &field.visible_if {
		None => true,
		Some(condition) => condition.evaluate(answers.get(&condition.field_name)),
	}
}

/// String form used for equality and option membership.
///
/// Integral floats print without a fractional part so that `18`, `18.0` and
/// `"18"` compare equal. Arrays and objects have no scalar form.
pub fn coerce_to_string(value: &Value) -> Option<String> {
	match value {
		Value::Null | Value::Array(_) | Value::Object(_) => None,
		Value::String(s) => Some(s.clone()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				Some(i.to_string())
			} else if let Some(u) = n.as_u64() {
				Some(u.to_string())
			} else {
				n.as_f64().map(|f| f.to_string())
			}
		}
	}
}

/// Numeric reading of a JSON number or a numeric string.
pub fn as_number(value: &Value) -> Option<f64> {
	match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
		_ => None,
	}
}

/// Absent, null, blank string or empty array.
pub fn is_empty_value(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => true,
		Some(Value::String(s)) => s.trim().is_empty(),
		Some(Value::Array(items)) => items.is_empty(),
		Some(_) => false,
	}
}

/// A missing answer equals only an explicit `null`.
fn values_equal(answer: Option<&Value>, expected: &Value) -> bool {
	match answer {
		None => expected.is_null(),
		Some(answer) => value_matches(answer, expected),
	}
}

/// Scalars compare through [`coerce_to_string`]; arrays element by element
/// in order; objects structurally. Values of different shapes never match.
fn value_matches(answer: &Value, expected: &Value) -> bool {
	match (answer, expected) {
		(Value::Null, Value::Null) => true,
		(Value::Array(left), Value::Array(right)) => {
			left.len() == right.len()
				&& left.iter().zip(right).all(|(l, r)| value_matches(l, r))
		}
		(Value::Object(_), Value::Object(_)) => answer == expected,
		_ => match (coerce_to_string(answer), coerce_to_string(expected)) {
			(Some(left), Some(right)) => left == right,
			_ => false,
		},
	}
}

fn contains(answer: Option<&Value>, needle: &Value) -> bool {
	let Some(needle) = coerce_to_string(needle) else {
		return false;
	};
	match answer {
		Some(Value::String(haystack)) => haystack.contains(&needle),
		Some(Value::Array(items)) => items
			.iter()
			.any(|item| coerce_to_string(item).as_deref() == Some(needle.as_str())),
		_ => false,
	}
}

fn compare_numbers(answer: Option<&Value>, expected: &Value, cmp: fn(f64, f64) -> bool) -> bool {
	match (answer.and_then(as_number), as_number(expected)) {
		(Some(a), Some(b)) => cmp(a, b),
		_ => false,
	}
}
