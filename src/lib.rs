//! # Reinhardt File Validation
//!
//! Validation of file references and multipart uploads for Reinhardt forms.
//!
//! A [`FileValidator`] checks a single file against a [`FileConstraint`] and
//! reports every failure as a [`Violation`] carrying a message template and its
//! parameters. Size violations show the file size and the limit in the same
//! unit, never rounded to the same figure.
//!
//! ## Quick Example
//!
//! ```
//! use reinhardt_file_validation::prelude::*;
//! use serde_json::json;
//!
//! let constraint = FileConstraint::from_toml_str(r#"
//!     max_size = "2M"
//!     mime_types = ["image/*"]
//! "#).unwrap();
//! let validator = FileValidator::new(constraint);
//!
//! let mut violations = Vec::new();
//! validator
//!     .validate_value_into(&json!({ "filename": "a.png", "upload_error": 3 }), &mut violations)
//!     .unwrap();
//!
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations[0].render(), "The file was only partially uploaded.");
//! ```

pub use reinhardt_validators::file;
pub use reinhardt_validators::file::{
	DEFAULT_MAX_UPLOAD_SIZE, FileConstraint, FileHandle, FileMessages, FileMetadata, FileReference,
	FileValidator, FormattedSizes, FsMetadata, MaxSize, MimeMismatch, MimeTypeMatcher,
	UploadErrorKind, UploadedFile, Violation, ViolationKind, ViolationSink, format_sizes,
	upload_violation,
};
pub use reinhardt_validators::{ValidationError, ValidationResult, Validator};

/// Re-export commonly used types
pub mod prelude {
	pub use crate::{
		FileConstraint, FileHandle, FileMessages, FileMetadata, FileReference, FileValidator,
		FsMetadata, MimeTypeMatcher, UploadErrorKind, UploadedFile, ValidationError,
		ValidationResult, Validator, Violation, ViolationKind, ViolationSink,
	};
}
