//! File constraint declaration
//!
//! A [`FileConstraint`] is built once, either in code or from a settings
//! file, and is only read by the validator.
//!
//! # Examples
//!
//! ```
//! use reinhardt_validators::file::FileConstraint;
//!
//! let constraint = FileConstraint::new()
//!     .with_max_size_str("2Mi")
//!     .unwrap()
//!     .with_mime_types(vec!["image/*".to_string()])
//!     .with_disallow_empty(true);
//!
//! assert_eq!(constraint.max_size_bytes(), Some(2 * 1024 * 1024));
//! assert!(constraint.uses_binary_format());
//! ```
//!
//! ## Loading from TOML
//!
//! ```
//! use reinhardt_validators::file::FileConstraint;
//!
//! let constraint = FileConstraint::from_toml_str(r#"
//!     max_size = "500k"
//!     mime_types = ["application/pdf"]
//!
//!     [messages]
//!     max_size = "Too big ({size} {suffix})."
//! "#).unwrap();
//!
//! assert_eq!(constraint.max_size_bytes(), Some(500_000));
//! assert!(!constraint.uses_binary_format());
//! assert_eq!(constraint.messages.max_size, "Too big ({size} {suffix}).");
//! ```

use super::mime::MimeTypeMatcher;
use super::size::MaxSize;
use super::violation::ViolationKind;
use crate::ValidationResult;
use serde::{Deserialize, Serialize};

/// Message templates, one per failure kind
///
/// Templates use `{name}` placeholders; see
/// [`Violation::render`](super::Violation::render).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMessages {
	pub not_found: String,
	pub not_readable: String,
	pub disallow_empty: String,
	pub max_size: String,
	pub mime_types: String,
	pub upload_ini_size_error: String,
	pub upload_form_size_error: String,
	pub upload_partial_error: String,
	pub upload_no_file_error: String,
	pub upload_no_tmp_dir_error: String,
	pub upload_cant_write_error: String,
	pub upload_extension_error: String,
	pub upload_generic_error: String,
}

impl Default for FileMessages {
	fn default() -> Self {
		Self {
			not_found: "The file could not be found.".to_string(),
			not_readable: "The file is not readable.".to_string(),
			disallow_empty: "An empty file is not allowed.".to_string(),
			max_size: "The file is too large ({size} {suffix}). Allowed maximum size is {limit} {suffix}.".to_string(),
			mime_types: "The mime type of the file is invalid ({type}). Allowed mime types are {types}.".to_string(),
			upload_ini_size_error: "The file is too large. Allowed maximum size is {limit} {suffix}.".to_string(),
			upload_form_size_error: "The file is too large.".to_string(),
			upload_partial_error: "The file was only partially uploaded.".to_string(),
			upload_no_file_error: "No file was uploaded.".to_string(),
			upload_no_tmp_dir_error: "No temporary folder was configured.".to_string(),
			upload_cant_write_error: "Cannot write temporary file to disk.".to_string(),
			upload_extension_error: "An extension caused the upload to fail.".to_string(),
			upload_generic_error: "The file could not be uploaded.".to_string(),
		}
	}
}

impl FileMessages {
	/// Template used for violations of `kind`
	pub fn for_kind(&self, kind: ViolationKind) -> &str {
		match kind {
			ViolationKind::NotFound => &self.not_found,
			ViolationKind::NotReadable => &self.not_readable,
			ViolationKind::EmptyFile => &self.disallow_empty,
			ViolationKind::TooLarge => &self.max_size,
			ViolationKind::InvalidMimeType => &self.mime_types,
			ViolationKind::UploadIniSize => &self.upload_ini_size_error,
			ViolationKind::UploadFormSize => &self.upload_form_size_error,
			ViolationKind::UploadPartial => &self.upload_partial_error,
			ViolationKind::UploadNoFile => &self.upload_no_file_error,
			ViolationKind::UploadNoTmpDir => &self.upload_no_tmp_dir_error,
			ViolationKind::UploadCantWrite => &self.upload_cant_write_error,
			ViolationKind::UploadExtension => &self.upload_extension_error,
			ViolationKind::UploadError => &self.upload_generic_error,
		}
	}
}

/// Declarative constraint on a single file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConstraint {
	/// Upper bound on the file size, in raw bytes
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_size: Option<MaxSize>,
	/// Display sizes in KiB/MiB instead of kB/MB
	///
	/// When unset, follows the suffix `max_size` was declared with.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub binary_format: Option<bool>,
	/// Accepted MIME types; empty accepts every type
	pub mime_types: MimeTypeMatcher,
	pub disallow_empty: bool,
	pub messages: FileMessages,
}

impl FileConstraint {
	/// Creates a constraint that accepts any existing, readable file
	pub fn new() -> Self {
		Self::default()
	}

	/// Accepts only `image/*` files
	pub fn images_only() -> Self {
		Self::new().with_mime_types(MimeTypeMatcher::images())
	}

	/// Accepts only PDF, Microsoft Office and plain text files
	pub fn documents_only() -> Self {
		Self::new().with_mime_types(MimeTypeMatcher::documents())
	}

	/// Sets the maximum size
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_validators::file::FileConstraint;
	///
	/// let constraint = FileConstraint::new().with_max_size(1_000_000);
	/// assert_eq!(constraint.max_size_bytes(), Some(1_000_000));
	/// ```
	pub fn with_max_size(mut self, bytes: u64) -> Self {
		self.max_size = Some(MaxSize::from_bytes(bytes));
		self
	}

	/// Sets the maximum size from a declaration such as `"500k"` or `"2Mi"`
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_validators::file::FileConstraint;
	///
	/// let constraint = FileConstraint::new().with_max_size_str("2Mi").unwrap();
	/// assert_eq!(constraint.max_size_bytes(), Some(2_097_152));
	/// assert!(constraint.uses_binary_format());
	///
	/// assert!(FileConstraint::new().with_max_size_str("big").is_err());
	/// ```
	pub fn with_max_size_str(mut self, text: &str) -> ValidationResult<Self> {
		self.max_size = Some(MaxSize::parse(text)?);
		Ok(self)
	}

	pub fn with_binary_format(mut self, binary_format: bool) -> Self {
		self.binary_format = Some(binary_format);
		self
	}

	pub fn with_mime_types(mut self, mime_types: impl Into<MimeTypeMatcher>) -> Self {
		self.mime_types = mime_types.into();
		self
	}

	pub fn with_disallow_empty(mut self, disallow_empty: bool) -> Self {
		self.disallow_empty = disallow_empty;
		self
	}

	pub fn with_messages(mut self, messages: FileMessages) -> Self {
		self.messages = messages;
		self
	}

	pub fn max_size_bytes(&self) -> Option<u64> {
		self.max_size.map(|size| size.bytes())
	}

	/// Unit system used to display sizes
	///
	/// An explicit `binary_format` wins; otherwise binary units are used only
	/// when the maximum size was declared with a `Ki`/`Mi` suffix.
	pub fn uses_binary_format(&self) -> bool {
		self.binary_format
			.unwrap_or_else(|| self.max_size.is_some_and(|size| size.is_binary()))
	}

	pub fn from_toml_str(text: &str) -> ValidationResult<Self> {
		Ok(toml::from_str(text)?)
	}

	pub fn from_json_value(value: serde_json::Value) -> ValidationResult<Self> {
		Ok(serde_json::from_value(value)?)
	}
}
