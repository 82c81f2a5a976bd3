//! Error types for file validation
//!
//! Validation outcomes that a user should see are reported as
//! [`Violation`](crate::file::Violation)s, not as errors. The variants here
//! describe integration problems: a value that cannot be interpreted as a file,
//! or a constraint that cannot be built from its configuration.

use crate::file::Violation;

/// Errors raised by the file validator
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
	/// The validated value is not a path, a file handle, an upload or text.
	#[error("Unexpected type: expected {expected}, found {found}")]
	UnexpectedType {
		expected: &'static str,
		found: String,
	},

	#[error("Invalid max size: {0}")]
	InvalidMaxSize(String),

	/// Returned by the [`Validator`](crate::Validator) adapter when the file
	/// produced at least one violation.
	#[error("File rejected with {} violation(s)", .0.len())]
	Rejected(Vec<Violation>),

	#[error("TOML error: {0}")]
	Config(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl ValidationError {
	/// Builds an [`UnexpectedType`](Self::UnexpectedType) error for a JSON value.
	pub(crate) fn unexpected_value(expected: &'static str, value: &serde_json::Value) -> Self {
		let found = match value {
			serde_json::Value::Null => "null",
			serde_json::Value::Bool(_) => "boolean",
			serde_json::Value::Number(_) => "number",
			serde_json::Value::String(_) => "string",
			serde_json::Value::Array(_) => "array",
			serde_json::Value::Object(_) => "object",
		};
		Self::UnexpectedType {
			expected,
			found: found.to_string(),
		}
	}

	/// Violations carried by a [`Rejected`](Self::Rejected) error
	pub fn violations(&self) -> &[Violation] {
		match self {
			Self::Rejected(violations) => violations,
			_ => &[],
		}
	}
}

pub type ValidationResult<T> = Result<T, ValidationError>;
