//! MIME type allow-lists
//!
//! An allow-list holds exact types (`application/pdf`) and wildcard patterns
//! over a discrete type (`image/*`). Matching is ASCII case-insensitive.
//!
//! # Examples
//!
//! ```
//! use reinhardt_validators::file::MimeTypeMatcher;
//!
//! let matcher = MimeTypeMatcher::new(vec![
//!     "image/*".to_string(),
//!     "application/pdf".to_string(),
//! ]);
//!
//! assert!(matcher.matches("image/png"));
//! assert!(matcher.matches("application/pdf"));
//! assert!(!matcher.matches("text/plain"));
//! ```
//!
//! ## Using presets
//!
//! ```
//! use reinhardt_validators::file::MimeTypeMatcher;
//!
//! let matcher = MimeTypeMatcher::images();
//! assert!(matcher.matches("image/webp"));
//!
//! let matcher = MimeTypeMatcher::documents();
//! assert!(matcher.matches("application/msword"));
//! assert!(!matcher.matches("image/jpeg"));
//! ```

use serde::{Deserialize, Serialize};

/// Suffix marking a pattern that accepts every subtype of a discrete type
const WILDCARD_SUFFIX: &str = "/*";

/// Rejected MIME type, with the allow-list it was checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeMismatch {
	/// Type of the file, `None` when it could not be determined
	pub actual: Option<String>,
	pub allowed: Vec<String>,
}

impl MimeMismatch {
	/// Actual type quoted for display, or an empty quoted string
	pub fn quoted_actual(&self) -> String {
		format!("\"{}\"", self.actual.as_deref().unwrap_or_default())
	}

	/// Allowed patterns as a quoted, comma-separated list
	pub fn quoted_allowed(&self) -> String {
		self.allowed
			.iter()
			.map(|pattern| format!("\"{}\"", pattern))
			.collect::<Vec<_>>()
			.join(", ")
	}
}

/// Ordered allow-list of MIME type patterns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MimeTypeMatcher {
	allowed: Vec<String>,
}

// Common MIME type constants
impl MimeTypeMatcher {
	pub const MIME_JPEG: &'static str = "image/jpeg";
	pub const MIME_PNG: &'static str = "image/png";
	pub const MIME_GIF: &'static str = "image/gif";

	pub const MIME_PDF: &'static str = "application/pdf";
	pub const MIME_DOC: &'static str = "application/msword";
	pub const MIME_DOCX: &'static str =
		"application/vnd.openxmlformats-officedocument.wordprocessingml.document";
	pub const MIME_XLS: &'static str = "application/vnd.ms-excel";
	pub const MIME_XLSX: &'static str =
		"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
	pub const MIME_PPT: &'static str = "application/vnd.ms-powerpoint";
	pub const MIME_PPTX: &'static str =
		"application/vnd.openxmlformats-officedocument.presentationml.presentation";

	pub const MIME_TEXT: &'static str = "text/plain";
	pub const MIME_JSON: &'static str = "application/json";
	pub const MIME_ZIP: &'static str = "application/zip";
}

impl MimeTypeMatcher {
	/// Creates a matcher over `allowed`, in the given order
	///
	/// An empty list disables the check: every type is accepted.
	pub fn new(allowed: Vec<String>) -> Self {
		Self { allowed }
	}

	/// Accepts any `image/*` type
	pub fn images() -> Self {
		Self::new(vec!["image/*".to_string()])
	}

	/// Accepts PDF, Microsoft Office formats and plain text
	pub fn documents() -> Self {
		Self::new(vec![
			Self::MIME_PDF.to_string(),
			Self::MIME_DOC.to_string(),
			Self::MIME_DOCX.to_string(),
			Self::MIME_XLS.to_string(),
			Self::MIME_XLSX.to_string(),
			Self::MIME_PPT.to_string(),
			Self::MIME_PPTX.to_string(),
			Self::MIME_TEXT.to_string(),
		])
	}

	pub fn allowed(&self) -> &[String] {
		&self.allowed
	}

	/// `true` when no pattern is configured and the check is skipped
	pub fn is_empty(&self) -> bool {
		self.allowed.is_empty()
	}

	/// Returns `true` if any pattern accepts `actual`
	///
	/// Does not consider an empty allow-list; see [`check`](Self::check).
	pub fn matches(&self, actual: &str) -> bool {
		let discrete = actual.split_once('/').map(|(discrete, _)| discrete);

		self.allowed.iter().any(|pattern| {
			if pattern.eq_ignore_ascii_case(actual) {
				return true;
			}
			match (pattern.strip_suffix(WILDCARD_SUFFIX), discrete) {
				(Some(wanted), Some(discrete)) if !wanted.is_empty() => {
					wanted.eq_ignore_ascii_case(discrete)
				}
				_ => false,
			}
		})
	}

	/// Checks a sniffed type against the allow-list
	///
	/// An empty allow-list accepts everything, including an unknown type.
	/// Otherwise an unknown type (`None`) is always rejected.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_validators::file::MimeTypeMatcher;
	///
	/// let matcher = MimeTypeMatcher::new(vec!["text/plain".to_string()]);
	/// assert!(matcher.check(Some("text/plain")).is_ok());
	///
	/// let mismatch = matcher.check(Some("text/html")).unwrap_err();
	/// assert_eq!(mismatch.allowed, vec!["text/plain".to_string()]);
	///
	/// assert!(MimeTypeMatcher::default().check(None).is_ok());
	/// ```
	pub fn check(&self, actual: Option<&str>) -> Result<(), MimeMismatch> {
		if self.is_empty() {
			return Ok(());
		}

		match actual {
			Some(actual) if self.matches(actual) => Ok(()),
			_ => Err(MimeMismatch {
				actual: actual.map(str::to_string),
				allowed: self.allowed.clone(),
			}),
		}
	}
}

impl From<Vec<String>> for MimeTypeMatcher {
	fn from(allowed: Vec<String>) -> Self {
		Self::new(allowed)
	}
}
