//! Upload transport failures
//!
//! When an upload fails before the file reaches the server, none of the file
//! checks can run. The failure is reported as a single violation instead.

use super::constraint::FileConstraint;
use super::violation::{Violation, ViolationKind};
use std::path::{Path, PathBuf};

/// Upload ceiling applied by the server when none is configured (10MB)
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Reason an upload failed in transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadErrorKind {
	/// Larger than the server's upload ceiling
	IniSize,
	/// Larger than the limit declared by the submitting form
	FormSize,
	Partial,
	NoFile,
	NoTmpDir,
	CantWrite,
	/// Stopped by a server-side upload extension
	Extension,
	/// A status code outside the known set, kept for diagnostics
	Unrecognized(i64),
}

impl UploadErrorKind {
	/// Maps a multipart upload status code
	///
	/// Returns `None` for `0`, which reports a successful upload.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_validators::file::UploadErrorKind;
	///
	/// assert_eq!(UploadErrorKind::from_code(0), None);
	/// assert_eq!(UploadErrorKind::from_code(3), Some(UploadErrorKind::Partial));
	/// assert_eq!(UploadErrorKind::from_code(5), Some(UploadErrorKind::Unrecognized(5)));
	/// ```
	pub fn from_code(code: i64) -> Option<Self> {
		match code {
			0 => None,
			1 => Some(Self::IniSize),
			2 => Some(Self::FormSize),
			3 => Some(Self::Partial),
			4 => Some(Self::NoFile),
			6 => Some(Self::NoTmpDir),
			7 => Some(Self::CantWrite),
			8 => Some(Self::Extension),
			other => Some(Self::Unrecognized(other)),
		}
	}

	/// Parses a kind name such as `"partial"` or `"no_tmp_dir"`
	pub fn from_name(name: &str) -> Option<Self> {
		match name.to_ascii_lowercase().replace('-', "_").as_str() {
			"ini_size" => Some(Self::IniSize),
			"form_size" => Some(Self::FormSize),
			"partial" => Some(Self::Partial),
			"no_file" => Some(Self::NoFile),
			"no_tmp_dir" => Some(Self::NoTmpDir),
			"cant_write" => Some(Self::CantWrite),
			"extension" => Some(Self::Extension),
			_ => None,
		}
	}

	pub fn code(&self) -> i64 {
		match self {
			Self::IniSize => 1,
			Self::FormSize => 2,
			Self::Partial => 3,
			Self::NoFile => 4,
			Self::NoTmpDir => 6,
			Self::CantWrite => 7,
			Self::Extension => 8,
			Self::Unrecognized(code) => *code,
		}
	}

	pub fn violation_kind(&self) -> ViolationKind {
		match self {
			Self::IniSize => ViolationKind::UploadIniSize,
			Self::FormSize => ViolationKind::UploadFormSize,
			Self::Partial => ViolationKind::UploadPartial,
			Self::NoFile => ViolationKind::UploadNoFile,
			Self::NoTmpDir => ViolationKind::UploadNoTmpDir,
			Self::CantWrite => ViolationKind::UploadCantWrite,
			Self::Extension => ViolationKind::UploadExtension,
			Self::Unrecognized(_) => ViolationKind::UploadError,
		}
	}
}

/// A file received through a multipart upload
///
/// The size and MIME type declared by the client are kept for display only.
/// Validation reads both from the stored file.
///
/// # Examples
///
/// ```
/// use reinhardt_validators::file::{UploadErrorKind, UploadedFile};
///
/// let upload = UploadedFile::new("/tmp/upload_1234").with_client_name("photo.jpg");
/// assert!(upload.is_valid());
///
/// let failed = UploadedFile::failed(UploadErrorKind::Partial);
/// assert!(!failed.is_valid());
/// assert_eq!(failed.error(), Some(UploadErrorKind::Partial));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
	path: PathBuf,
	client_name: Option<String>,
	client_size: Option<u64>,
	client_mime_type: Option<String>,
	error: Option<UploadErrorKind>,
	max_upload_size: u64,
}

impl UploadedFile {
	/// A successful upload stored at `path`
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			client_name: None,
			client_size: None,
			client_mime_type: None,
			error: None,
			max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
		}
	}

	/// An upload that failed in transport
	pub fn failed(error: UploadErrorKind) -> Self {
		Self::new(PathBuf::new()).with_error(error)
	}

	/// Marks the upload as failed in transport
	pub fn with_error(mut self, error: UploadErrorKind) -> Self {
		self.error = Some(error);
		self
	}

	pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
		self.client_name = Some(name.into());
		self
	}

	pub fn with_client_size(mut self, size: u64) -> Self {
		self.client_size = Some(size);
		self
	}

	pub fn with_client_mime_type(mut self, mime_type: impl Into<String>) -> Self {
		self.client_mime_type = Some(mime_type.into());
		self
	}

	/// Sets the server's upload ceiling, in bytes
	pub fn with_max_upload_size(mut self, bytes: u64) -> Self {
		self.max_upload_size = bytes;
		self
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Filename sent by the client
	pub fn client_name(&self) -> Option<&str> {
		self.client_name.as_deref()
	}

	/// Size declared by the client, not verified
	pub fn client_size(&self) -> Option<u64> {
		self.client_size
	}

	/// MIME type declared by the client, not verified
	pub fn client_mime_type(&self) -> Option<&str> {
		self.client_mime_type.as_deref()
	}

	pub fn is_valid(&self) -> bool {
		self.error.is_none()
	}

	pub fn error(&self) -> Option<UploadErrorKind> {
		self.error
	}

	pub fn max_upload_size(&self) -> u64 {
		self.max_upload_size
	}
}

/// Builds the violation reported for a failed upload
///
/// For [`UploadErrorKind::IniSize`] the reported limit is the lower of the
/// server ceiling and the constraint's maximum size, in bytes. No file size is
/// known at this stage, so the limit is not scaled to a larger unit.
///
/// # Examples
///
/// ```
/// use reinhardt_validators::file::{upload_violation, FileConstraint, UploadErrorKind};
///
/// let constraint = FileConstraint::new().with_max_size(2_000_000);
/// let violation = upload_violation(UploadErrorKind::IniSize, &constraint, 5_000_000, None);
///
/// assert_eq!(violation.parameter("limit"), Some("2000000"));
/// assert_eq!(violation.parameter("suffix"), Some("bytes"));
/// ```
pub fn upload_violation(
	error: UploadErrorKind,
	constraint: &FileConstraint,
	max_upload_size: u64,
	client_name: Option<&str>,
) -> Violation {
	let kind = error.violation_kind();
	let mut violation = Violation::new(kind, constraint.messages.for_kind(kind));

	if let Some(name) = client_name {
		violation = violation.with_parameter("file", name);
	}

	match error {
		UploadErrorKind::IniSize => {
			let limit = constraint
				.max_size_bytes()
				.map_or(max_upload_size, |max| max.min(max_upload_size));
			violation
				.with_parameter("limit", limit)
				.with_parameter("suffix", "bytes")
		}
		UploadErrorKind::Unrecognized(code) => violation.with_code(code),
		_ => violation,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(1, UploadErrorKind::IniSize)]
	#[case(2, UploadErrorKind::FormSize)]
	#[case(3, UploadErrorKind::Partial)]
	#[case(4, UploadErrorKind::NoFile)]
	#[case(6, UploadErrorKind::NoTmpDir)]
	#[case(7, UploadErrorKind::CantWrite)]
	#[case(8, UploadErrorKind::Extension)]
	#[case(5, UploadErrorKind::Unrecognized(5))]
	#[case(-1, UploadErrorKind::Unrecognized(-1))]
	fn test_from_code(#[case] code: i64, #[case] expected: UploadErrorKind) {
		let kind = UploadErrorKind::from_code(code).unwrap();

		assert_eq!(kind, expected);
		assert_eq!(kind.code(), code);
	}

	#[rstest]
	#[case("partial", Some(UploadErrorKind::Partial))]
	#[case("no-tmp-dir", Some(UploadErrorKind::NoTmpDir))]
	#[case("INI_SIZE", Some(UploadErrorKind::IniSize))]
	#[case("exploded", None)]
	fn test_from_name(#[case] name: &str, #[case] expected: Option<UploadErrorKind>) {
		assert_eq!(UploadErrorKind::from_name(name), expected);
	}

	#[rstest]
	#[case(Some(2_000_000), 5_000_000, "2000000")]
	#[case(Some(8_000_000), 5_000_000, "5000000")]
	#[case(None, 5_000_000, "5000000")]
	fn test_ini_size_reports_lower_limit(
		#[case] max_size: Option<u64>,
		#[case] ceiling: u64,
		#[case] expected: &str,
	) {
		// Arrange
		let mut constraint = FileConstraint::new().with_binary_format(true);
		if let Some(max) = max_size {
			constraint = constraint.with_max_size(max);
		}

		// Act
		let violation = upload_violation(UploadErrorKind::IniSize, &constraint, ceiling, None);

		// Assert
		assert_eq!(violation.kind, ViolationKind::UploadIniSize);
		assert_eq!(violation.parameter("limit"), Some(expected));
		assert_eq!(violation.parameter("suffix"), Some("bytes"));
		assert_eq!(violation.code, None);
	}

	#[rstest]
	#[case(UploadErrorKind::FormSize, ViolationKind::UploadFormSize)]
	#[case(UploadErrorKind::Partial, ViolationKind::UploadPartial)]
	#[case(UploadErrorKind::NoFile, ViolationKind::UploadNoFile)]
	#[case(UploadErrorKind::NoTmpDir, ViolationKind::UploadNoTmpDir)]
	#[case(UploadErrorKind::CantWrite, ViolationKind::UploadCantWrite)]
	#[case(UploadErrorKind::Extension, ViolationKind::UploadExtension)]
	fn test_fixed_message_errors(#[case] error: UploadErrorKind, #[case] kind: ViolationKind) {
		// Arrange
		let constraint = FileConstraint::new();

		// Act
		let violation = upload_violation(error, &constraint, DEFAULT_MAX_UPLOAD_SIZE, None);

		// Assert
		assert_eq!(violation.kind, kind);
		assert_eq!(violation.message, constraint.messages.for_kind(kind));
		assert!(violation.parameters.is_empty());
		assert_eq!(violation.code, None);
	}

	#[rstest]
	fn test_unrecognized_error_keeps_code() {
		// Arrange
		let constraint = FileConstraint::new();

		// Act
		let violation = upload_violation(
			UploadErrorKind::Unrecognized(42),
			&constraint,
			DEFAULT_MAX_UPLOAD_SIZE,
			None,
		);

		// Assert
		assert_eq!(violation.kind, ViolationKind::UploadError);
		assert_eq!(violation.code, Some(42));
		assert_eq!(violation.render(), "The file could not be uploaded.");
	}

	#[rstest]
	fn test_client_name_is_reported() {
		let violation = upload_violation(
			UploadErrorKind::Partial,
			&FileConstraint::new(),
			DEFAULT_MAX_UPLOAD_SIZE,
			Some("report.pdf"),
		);

		assert_eq!(violation.parameter("file"), Some("report.pdf"));
	}

	#[rstest]
	fn test_uploaded_file_defaults() {
		let upload = UploadedFile::new("/tmp/upload_123");

		assert!(upload.is_valid());
		assert_eq!(upload.path(), Path::new("/tmp/upload_123"));
		assert_eq!(upload.max_upload_size(), DEFAULT_MAX_UPLOAD_SIZE);
		assert_eq!(upload.client_name(), None);
		assert_eq!(upload.client_size(), None);
		assert_eq!(upload.client_mime_type(), None);
	}
}
