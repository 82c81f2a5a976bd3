//! File validators for Reinhardt
//!
//! This crate validates files submitted through forms and uploads: existence,
//! readability, emptiness, size limits with human-readable units, MIME type
//! allow-lists and upload transport failures.
//!
//! Failures a user should see are reported as [`file::Violation`]s. Errors in
//! [`ValidationError`] are reserved for integration problems such as a value
//! that cannot be read as a file.

pub mod errors;
pub mod file;

pub use errors::{ValidationError, ValidationResult};
pub use file::{
	FileConstraint, FileHandle, FileMessages, FileMetadata, FileReference, FileValidator,
	FsMetadata, MaxSize, MimeTypeMatcher, UploadErrorKind, UploadedFile, Violation,
	ViolationKind, ViolationSink,
};

/// Re-export commonly used types
pub mod prelude {
	pub use crate::Validator;
	pub use crate::errors::*;
	pub use crate::file::*;
}

/// Trait for validators
pub trait Validator<T: ?Sized> {
	fn validate(&self, value: &T) -> ValidationResult<()>;
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_file_validator_trait() {
		let validator = FileValidator::new(FileConstraint::new());

		assert!(validator.validate(&FileReference::from("")).is_ok());
		assert!(
			validator
				.validate(&FileReference::from("/nonexistent/reinhardt/file.txt"))
				.is_err()
		);
	}

	#[rstest]
	fn test_rejected_error_message() {
		// Arrange
		let validator = FileValidator::new(FileConstraint::new());

		// Act
		let error = validator
			.validate(&FileReference::from("/nonexistent/reinhardt/file.txt"))
			.unwrap_err();

		// Assert
		assert_eq!(error.to_string(), "File rejected with 1 violation(s)");
		assert_eq!(error.violations()[0].kind, ViolationKind::NotFound);
	}

	#[rstest]
	fn test_validator_as_trait_object() {
		let validators: Vec<Box<dyn Validator<FileReference>>> = vec![
			Box::new(FileValidator::new(FileConstraint::new())),
			Box::new(FileValidator::new(FileConstraint::images_only())),
		];

		for validator in &validators {
			assert!(validator.validate(&FileReference::from("")).is_ok());
		}
	}

	#[rstest]
	fn test_prelude_exports() {
		use crate::prelude::*;

		let constraint = FileConstraint::documents_only().with_max_size(1_024);
		let validator = FileValidator::new(constraint);
		let mut sink: Vec<Violation> = Vec::new();

		validator.validate_into(None, &mut sink);
		assert!(sink.is_empty());
		assert_eq!(format_sizes(2_048, 1_024, true).suffix, "KiB");
	}
}
