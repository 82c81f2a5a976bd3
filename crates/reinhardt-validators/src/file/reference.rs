//! Values accepted as a file
//!
//! A file can be named by a path, by a handle that already knows its size or
//! MIME type, by plain text, or by an upload. Dynamic input (form data decoded
//! as JSON) is resolved into one of these shapes once, before validation.

use super::upload::{UploadErrorKind, UploadedFile};
use crate::{ValidationError, ValidationResult};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const EXPECTED: &str = "a file path, file handle or upload";

/// A file whose metadata is partly known
///
/// Fields left as `None` are looked up through
/// [`FileMetadata`](super::FileMetadata).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
	pub path: PathBuf,
	pub size: Option<u64>,
	pub mime_type: Option<String>,
}

impl FileHandle {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			size: None,
			mime_type: None,
		}
	}

	pub fn with_size(mut self, size: u64) -> Self {
		self.size = Some(size);
		self
	}

	pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
		self.mime_type = Some(mime_type.into());
		self
	}
}

/// The file to validate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileReference {
	Path(PathBuf),
	Handle(FileHandle),
	/// Text naming a path; empty text means no file
	Text(String),
	Upload(UploadedFile),
}

impl FileReference {
	/// Resolves form-style JSON input
	///
	/// | Input | Result |
	/// |---|---|
	/// | `null`, `""` | `None` |
	/// | string | [`Text`](Self::Text) |
	/// | `{"path", "size"?, "mime_type"?}` | [`Handle`](Self::Handle) |
	/// | `{"upload_error", "filename"?, "path"?, ...}` | [`Upload`](Self::Upload) |
	/// | `{"filename", "path", ...}` | [`Upload`](Self::Upload) |
	///
	/// Anything else is a [`ValidationError::UnexpectedType`].
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_validators::file::FileReference;
	/// use serde_json::json;
	///
	/// let reference = FileReference::from_value(&json!("/tmp/a.txt")).unwrap();
	/// assert!(matches!(reference, Some(FileReference::Text(_))));
	///
	/// let reference = FileReference::from_value(&json!({ "upload_error": 3 })).unwrap();
	/// assert!(matches!(reference, Some(FileReference::Upload(ref u)) if !u.is_valid()));
	///
	/// assert!(FileReference::from_value(&json!(null)).unwrap().is_none());
	/// assert!(FileReference::from_value(&json!(42)).is_err());
	/// ```
	pub fn from_value(value: &Value) -> ValidationResult<Option<Self>> {
		match value {
			Value::Null => Ok(None),
			Value::String(text) if text.is_empty() => Ok(None),
			Value::String(text) => Ok(Some(Self::Text(text.clone()))),
			Value::Object(object) => Self::from_object(object, value).map(Some),
			other => Err(ValidationError::unexpected_value(EXPECTED, other)),
		}
	}

	fn from_object(object: &Map<String, Value>, value: &Value) -> ValidationResult<Self> {
		let path = optional_str(object, "path")?;
		let filename = optional_str(object, "filename")?;
		let size = optional_u64(object, "size")?;
		let mime_type = optional_str(object, "mime_type")?;
		let error = upload_error(object)?;

		if error.is_none() && filename.is_none() {
			let path = path.ok_or_else(|| ValidationError::unexpected_value(EXPECTED, value))?;
			return Ok(Self::Handle(FileHandle {
				path: PathBuf::from(path),
				size,
				mime_type: mime_type.map(str::to_string),
			}));
		}

		if error.is_none() && path.is_none() {
			return Err(ValidationError::unexpected_value(EXPECTED, value));
		}

		let mut upload = UploadedFile::new(path.unwrap_or_default());
		if let Some(filename) = filename {
			upload = upload.with_client_name(filename);
		}
		if let Some(size) = size {
			upload = upload.with_client_size(size);
		}
		if let Some(mime_type) = mime_type {
			upload = upload.with_client_mime_type(mime_type);
		}
		if let Some(ceiling) = optional_u64(object, "max_upload_size")? {
			upload = upload.with_max_upload_size(ceiling);
		}
		if let Some(error) = error {
			upload = upload.with_error(error);
		}
		Ok(Self::Upload(upload))
	}

	/// `true` for empty text, which stands for "no file"
	pub fn is_absent(&self) -> bool {
		matches!(self, Self::Text(text) if text.is_empty())
	}

	/// Path to check on disk
	pub fn path(&self) -> &Path {
		match self {
			Self::Path(path) => path,
			Self::Handle(handle) => &handle.path,
			Self::Text(text) => Path::new(text),
			Self::Upload(upload) => upload.path(),
		}
	}

	/// Size already known without asking the filesystem
	///
	/// Only a [`Handle`](Self::Handle) supplies one. Sizes declared by an
	/// upload's client are never trusted.
	pub fn known_size(&self) -> Option<u64> {
		match self {
			Self::Handle(handle) => handle.size,
			Self::Path(_) | Self::Text(_) | Self::Upload(_) => None,
		}
	}

	/// MIME type already known without sniffing
	///
	/// Only a [`Handle`](Self::Handle) supplies one. Types declared by an
	/// upload's client are never trusted.
	pub fn known_mime_type(&self) -> Option<&str> {
		match self {
			Self::Handle(handle) => handle.mime_type.as_deref(),
			Self::Path(_) | Self::Text(_) | Self::Upload(_) => None,
		}
	}
}

fn optional_str<'a>(object: &'a Map<String, Value>, key: &str) -> ValidationResult<Option<&'a str>> {
	match object.get(key) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(text)) => Ok(Some(text)),
		Some(other) => Err(ValidationError::unexpected_value("a string", other)),
	}
}

fn optional_u64(object: &Map<String, Value>, key: &str) -> ValidationResult<Option<u64>> {
	match object.get(key) {
		None | Some(Value::Null) => Ok(None),
		Some(value) => value
			.as_u64()
			.map(Some)
			.ok_or_else(|| ValidationError::unexpected_value("a non-negative integer", value)),
	}
}

fn upload_error(object: &Map<String, Value>) -> ValidationResult<Option<UploadErrorKind>> {
	match object.get("upload_error") {
		None | Some(Value::Null) => Ok(None),
		Some(value @ Value::Number(number)) => number
			.as_i64()
			.map(UploadErrorKind::from_code)
			.ok_or_else(|| ValidationError::unexpected_value("an upload error code", value)),
		Some(Value::String(name)) => UploadErrorKind::from_name(name)
			.map(Some)
			.ok_or_else(|| ValidationError::UnexpectedType {
				expected: "an upload error name",
				found: name.clone(),
			}),
		Some(other) => Err(ValidationError::unexpected_value("an upload error code", other)),
	}
}

impl From<PathBuf> for FileReference {
	fn from(path: PathBuf) -> Self {
		Self::Path(path)
	}
}

impl From<&Path> for FileReference {
	fn from(path: &Path) -> Self {
		Self::Path(path.to_path_buf())
	}
}

impl From<String> for FileReference {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<&str> for FileReference {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<FileHandle> for FileReference {
	fn from(handle: FileHandle) -> Self {
		Self::Handle(handle)
	}
}

impl From<UploadedFile> for FileReference {
	fn from(upload: UploadedFile) -> Self {
		Self::Upload(upload)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(null))]
	#[case(json!(""))]
	fn test_absent_values(#[case] value: Value) {
		assert_eq!(FileReference::from_value(&value).unwrap(), None);
	}

	#[rstest]
	#[case(json!(42), "number")]
	#[case(json!(true), "boolean")]
	#[case(json!(["/tmp/a"]), "array")]
	#[case(json!({ "size": 10 }), "object")]
	fn test_unexpected_types(#[case] value: Value, #[case] found_kind: &str) {
		// Act
		let result = FileReference::from_value(&value);

		// Assert
		match result {
			Err(ValidationError::UnexpectedType { found, .. }) => assert_eq!(found, found_kind),
			other => panic!("Expected UnexpectedType error, got {:?}", other),
		}
	}

	#[rstest]
	fn test_text_value() {
		let reference = FileReference::from_value(&json!("/var/data/report.pdf"))
			.unwrap()
			.unwrap();

		assert_eq!(reference, FileReference::Text("/var/data/report.pdf".to_string()));
		assert_eq!(reference.path(), Path::new("/var/data/report.pdf"));
	}

	#[rstest]
	fn test_handle_value() {
		// Arrange
		let value = json!({ "path": "/tmp/a.png", "size": 2048, "mime_type": "image/png" });

		// Act
		let reference = FileReference::from_value(&value).unwrap().unwrap();

		// Assert
		assert_eq!(
			reference,
			FileReference::Handle(
				FileHandle::new("/tmp/a.png")
					.with_size(2048)
					.with_mime_type("image/png")
			)
		);
		assert_eq!(reference.known_size(), Some(2048));
		assert_eq!(reference.known_mime_type(), Some("image/png"));
	}

	#[rstest]
	fn test_handle_value_rejects_negative_size() {
		let result = FileReference::from_value(&json!({ "path": "/tmp/a", "size": -1 }));

		assert!(matches!(result, Err(ValidationError::UnexpectedType { .. })));
	}

	#[rstest]
	fn test_failed_upload_by_code() {
		// Arrange
		let value = json!({
			"filename": "big.iso",
			"upload_error": 1,
			"max_upload_size": 5_000_000
		});

		// Act
		let reference = FileReference::from_value(&value).unwrap().unwrap();

		// Assert
		let FileReference::Upload(upload) = reference else {
			panic!("Expected upload reference");
		};
		assert_eq!(upload.error(), Some(UploadErrorKind::IniSize));
		assert_eq!(upload.client_name(), Some("big.iso"));
		assert_eq!(upload.max_upload_size(), 5_000_000);
	}

	#[rstest]
	fn test_failed_upload_by_name() {
		let reference = FileReference::from_value(&json!({ "upload_error": "cant_write" }))
			.unwrap()
			.unwrap();

		assert!(matches!(
			reference,
			FileReference::Upload(ref upload) if upload.error() == Some(UploadErrorKind::CantWrite)
		));
	}

	#[rstest]
	fn test_unknown_upload_error_name_is_rejected() {
		let result = FileReference::from_value(&json!({ "upload_error": "meltdown" }));

		assert!(matches!(result, Err(ValidationError::UnexpectedType { .. })));
	}

	#[rstest]
	fn test_successful_upload_value() {
		// Arrange
		let value = json!({ "filename": "cv.pdf", "path": "/tmp/upload_1", "upload_error": 0 });

		// Act
		let reference = FileReference::from_value(&value).unwrap().unwrap();

		// Assert
		let FileReference::Upload(upload) = reference else {
			panic!("Expected upload reference");
		};
		assert!(upload.is_valid());
		assert_eq!(upload.path(), Path::new("/tmp/upload_1"));
	}

	#[rstest]
	fn test_upload_client_metadata_is_not_known_metadata() {
		// Arrange
		let value = json!({
			"filename": "cat.png",
			"path": "/tmp/upload_2",
			"size": 1,
			"mime_type": "image/png",
			"upload_error": 0
		});

		// Act
		let reference = FileReference::from_value(&value).unwrap().unwrap();

		// Assert
		assert_eq!(reference.known_size(), None);
		assert_eq!(reference.known_mime_type(), None);
		let FileReference::Upload(upload) = reference else {
			panic!("Expected upload reference");
		};
		assert_eq!(upload.client_size(), Some(1));
		assert_eq!(upload.client_mime_type(), Some("image/png"));
	}

	#[rstest]
	fn test_successful_upload_requires_path() {
		let result = FileReference::from_value(&json!({ "filename": "cv.pdf" }));

		assert!(matches!(result, Err(ValidationError::UnexpectedType { .. })));
	}

	#[rstest]
	fn test_conversions() {
		assert!(matches!(FileReference::from("a.txt"), FileReference::Text(_)));
		assert!(matches!(
			FileReference::from(PathBuf::from("a.txt")),
			FileReference::Path(_)
		));
		assert!(FileReference::from("").is_absent());
		assert!(!FileReference::from(Path::new("")).is_absent());
	}
}
