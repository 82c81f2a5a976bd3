//! File reference validation
//!
//! Checks that a submitted file exists, is readable, is not empty when that is
//! forbidden, fits under a size limit and has an accepted MIME type. Uploads
//! that failed in transport are reported before any of that.
//!
//! ## Example
//!
//! ```
//! use reinhardt_validators::file::{FileConstraint, FileReference, FileValidator, ViolationKind};
//! use std::io::Write;
//!
//! let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
//! file.write_all(&[b'x'; 1_500]).unwrap();
//!
//! let constraint = FileConstraint::new()
//!     .with_max_size(1_000)
//!     .with_mime_types(vec!["text/plain".to_string()]);
//! let validator = FileValidator::new(constraint);
//!
//! let violations = validator.violations(Some(&FileReference::from(file.path())));
//!
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations[0].kind, ViolationKind::TooLarge);
//! assert_eq!(
//!     violations[0].render(),
//!     "The file is too large (1.5 kB). Allowed maximum size is 1 kB."
//! );
//! ```

pub mod constraint;
pub mod metadata;
pub mod mime;
pub mod reference;
pub mod size;
pub mod upload;
pub mod validator;
pub mod violation;

pub use constraint::{FileConstraint, FileMessages};
pub use metadata::{FileMetadata, FsMetadata};
pub use mime::{MimeMismatch, MimeTypeMatcher};
pub use reference::{FileHandle, FileReference};
pub use size::{FormattedSizes, MaxSize, format_sizes};
pub use upload::{DEFAULT_MAX_UPLOAD_SIZE, UploadErrorKind, UploadedFile, upload_violation};
pub use validator::FileValidator;
pub use violation::{Violation, ViolationKind, ViolationSink};
