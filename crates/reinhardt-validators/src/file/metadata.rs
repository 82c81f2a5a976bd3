//! File metadata lookup
//!
//! The validator never touches the filesystem directly. It asks a
//! [`FileMetadata`] implementation, which makes it possible to validate files
//! held by a storage backend or to substitute a fake in tests.

use std::fs;
use std::io;
use std::path::Path;

/// Source of existence, readability, size and MIME information for a path
pub trait FileMetadata: Send + Sync {
	/// Whether `path` names an existing regular file
	fn exists(&self, path: &Path) -> bool;

	fn is_readable(&self, path: &Path) -> bool;

	fn size_bytes(&self, path: &Path) -> io::Result<u64>;

	/// MIME type of the file, `None` when it cannot be determined
	fn mime_type(&self, path: &Path) -> Option<String>;
}

/// Metadata read from the local filesystem
///
/// MIME types are guessed from the file extension.
///
/// # Examples
///
/// ```
/// use reinhardt_validators::file::{FileMetadata, FsMetadata};
/// use std::path::Path;
///
/// let metadata = FsMetadata;
/// assert!(!metadata.exists(Path::new("/nonexistent/file.txt")));
/// assert_eq!(
///     metadata.mime_type(Path::new("report.pdf")).as_deref(),
///     Some("application/pdf")
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMetadata;

impl FileMetadata for FsMetadata {
	fn exists(&self, path: &Path) -> bool {
		fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
	}

	fn is_readable(&self, path: &Path) -> bool {
		fs::File::open(path).is_ok()
	}

	fn size_bytes(&self, path: &Path) -> io::Result<u64> {
		Ok(fs::metadata(path)?.len())
	}

	fn mime_type(&self, path: &Path) -> Option<String> {
		mime_guess::from_path(path)
			.first()
			.map(|mime| mime.essence_str().to_string())
	}
}

impl<M: FileMetadata + ?Sized> FileMetadata for &M {
	fn exists(&self, path: &Path) -> bool {
		(**self).exists(path)
	}

	fn is_readable(&self, path: &Path) -> bool {
		(**self).is_readable(path)
	}

	fn size_bytes(&self, path: &Path) -> io::Result<u64> {
		(**self).size_bytes(path)
	}

	fn mime_type(&self, path: &Path) -> Option<String> {
		(**self).mime_type(path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	fn test_fs_metadata_existing_file() {
		// Arrange
		let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
		file.write_all(b"hello").unwrap();
		let metadata = FsMetadata;

		// Act & Assert
		assert!(metadata.exists(file.path()));
		assert!(metadata.is_readable(file.path()));
		assert_eq!(metadata.size_bytes(file.path()).unwrap(), 5);
		assert_eq!(metadata.mime_type(file.path()).as_deref(), Some("text/plain"));
	}

	#[rstest]
	fn test_fs_metadata_directory_is_not_a_file() {
		let dir = tempfile::tempdir().unwrap();

		assert!(!FsMetadata.exists(dir.path()));
	}

	#[rstest]
	fn test_fs_metadata_missing_file() {
		// Arrange
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing.bin");

		// Act & Assert
		assert!(!FsMetadata.exists(&path));
		assert!(!FsMetadata.is_readable(&path));
		assert!(FsMetadata.size_bytes(&path).is_err());
	}

	#[rstest]
	#[case("photo.PNG", Some("image/png"))]
	#[case("archive.zip", Some("application/zip"))]
	#[case("no_extension", None)]
	fn test_fs_metadata_mime_guess(#[case] name: &str, #[case] expected: Option<&str>) {
		assert_eq!(FsMetadata.mime_type(Path::new(name)).as_deref(), expected);
	}
}
