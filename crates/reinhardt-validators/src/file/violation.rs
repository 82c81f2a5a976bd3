//! Violations reported by the file validator

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Failure kind; each kind has its own message template on the constraint
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
	NotFound,
	NotReadable,
	EmptyFile,
	TooLarge,
	InvalidMimeType,
	UploadIniSize,
	UploadFormSize,
	UploadPartial,
	UploadNoFile,
	UploadNoTmpDir,
	UploadCantWrite,
	UploadExtension,
	UploadError,
}

impl ViolationKind {
	/// Stable identifier, also used as the serialized name
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::NotFound => "not_found",
			Self::NotReadable => "not_readable",
			Self::EmptyFile => "empty_file",
			Self::TooLarge => "too_large",
			Self::InvalidMimeType => "invalid_mime_type",
			Self::UploadIniSize => "upload_ini_size",
			Self::UploadFormSize => "upload_form_size",
			Self::UploadPartial => "upload_partial",
			Self::UploadNoFile => "upload_no_file",
			Self::UploadNoTmpDir => "upload_no_tmp_dir",
			Self::UploadCantWrite => "upload_cant_write",
			Self::UploadExtension => "upload_extension",
			Self::UploadError => "upload_error",
		}
	}
}

impl fmt::Display for ViolationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A single user-facing validation failure
///
/// Carries the unrendered message template and its parameters so that the
/// receiving side can translate the template before substituting values.
///
/// # Examples
///
/// ```
/// use reinhardt_validators::file::{Violation, ViolationKind};
///
/// let violation = Violation::new(ViolationKind::TooLarge, "Too large: {size} {suffix}.")
///     .with_parameter("size", "1.1")
///     .with_parameter("suffix", "MB");
///
/// assert_eq!(violation.render(), "Too large: 1.1 MB.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
	pub kind: ViolationKind,
	pub message: String,
	pub parameters: BTreeMap<String, String>,
	/// Raw transport code, set only for unrecognized upload errors
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<i64>,
}

impl Violation {
	pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
			parameters: BTreeMap::new(),
			code: None,
		}
	}

	pub fn with_parameter(mut self, name: impl Into<String>, value: impl ToString) -> Self {
		self.parameters.insert(name.into(), value.to_string());
		self
	}

	pub fn with_code(mut self, code: i64) -> Self {
		self.code = Some(code);
		self
	}

	pub fn parameter(&self, name: &str) -> Option<&str> {
		self.parameters.get(name).map(String::as_str)
	}

	/// Substitutes every `{name}` placeholder with its parameter value
	///
	/// The template is scanned once, left to right. Inserted values are copied
	/// verbatim and never scanned again. Placeholders without a parameter are
	/// left untouched.
	pub fn render(&self) -> String {
		let mut rendered = String::with_capacity(self.message.len());
		let mut rest = self.message.as_str();

		while let Some(open) = rest.find('{') {
			rendered.push_str(&rest[..open]);
			let tail = &rest[open..];
			let Some(close) = tail.find('}') else {
				rest = tail;
				break;
			};
			match self.parameters.get(&tail[1..close]) {
				Some(value) => {
					rendered.push_str(value);
					rest = &tail[close + 1..];
				}
				None => {
					rendered.push('{');
					rest = &tail[1..];
				}
			}
		}
		rendered.push_str(rest);
		rendered
	}
}

impl fmt::Display for Violation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render())
	}
}

/// Receiver of violations produced during one validation
pub trait ViolationSink {
	fn add(&mut self, violation: Violation);
}

impl ViolationSink for Vec<Violation> {
	fn add(&mut self, violation: Violation) {
		self.push(violation);
	}
}
