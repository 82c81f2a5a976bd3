//! File validator
//!
//! Checks run in a fixed order and each one either stops validation or lets
//! it continue:
//!
//! 1. no file: accepted, stop
//! 2. failed upload: one upload violation, stop
//! 3. missing file: violation, stop
//! 4. unreadable file: violation, stop
//! 5. empty file with `disallow_empty`: violation, **continue**
//! 6. file over `max_size`: violation, stop
//! 7. MIME type outside the allow-list: violation, stop
//!
//! An empty file still has its MIME type checked, while an oversized file does
//! not.

use super::constraint::FileConstraint;
use super::metadata::{FileMetadata, FsMetadata};
use super::reference::FileReference;
use super::size::format_sizes;
use super::upload::{upload_violation, UploadErrorKind, UploadedFile};
use super::violation::{Violation, ViolationKind, ViolationSink};
use crate::{ValidationError, ValidationResult, Validator};
use std::path::Path;

/// Whether the next check runs after the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
	Continue,
	Stop,
}

/// Validates a single file against a [`FileConstraint`]
///
/// # Examples
///
/// ```
/// use reinhardt_validators::file::{FileConstraint, FileReference, FileValidator, ViolationKind};
///
/// let validator = FileValidator::new(FileConstraint::new().with_max_size(1_000));
/// let violations = validator.violations(Some(&FileReference::from("/nonexistent/upload.bin")));
///
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].kind, ViolationKind::NotFound);
/// ```
#[derive(Debug, Clone)]
pub struct FileValidator<M = FsMetadata> {
	constraint: FileConstraint,
	metadata: M,
}

impl FileValidator<FsMetadata> {
	/// Creates a validator reading metadata from the local filesystem
	pub fn new(constraint: FileConstraint) -> Self {
		Self::with_metadata(constraint, FsMetadata)
	}
}

impl<M: FileMetadata> FileValidator<M> {
	/// Creates a validator with a custom metadata source
	pub fn with_metadata(constraint: FileConstraint, metadata: M) -> Self {
		Self {
			constraint,
			metadata,
		}
	}

	pub fn constraint(&self) -> &FileConstraint {
		&self.constraint
	}

	/// Validates `value`, reporting violations to `sink`
	///
	/// `None` stands for "no file" and is accepted.
	pub fn validate_into(&self, value: Option<&FileReference>, sink: &mut dyn ViolationSink) {
		let Some(reference) = value.filter(|reference| !reference.is_absent()) else {
			tracing::trace!("no file given, nothing to validate");
			return;
		};

		if let FileReference::Upload(upload) = reference
			&& let Some(error) = upload.error()
		{
			self.reject_upload(upload, error, sink);
			return;
		}

		let path = reference.path();
		let mut counted = CountingSink { sink, count: 0 };
		self.check_file(reference, path, &mut counted);

		if counted.count == 0 {
			tracing::debug!(file = %path.display(), "file accepted");
		} else {
			tracing::debug!(file = %path.display(), violations = counted.count, "file rejected");
		}
	}

	/// Validates dynamic input, see [`FileReference::from_value`]
	///
	/// Returns [`ValidationError::UnexpectedType`] when the value cannot stand
	/// for a file.
	pub fn validate_value_into(
		&self,
		value: &serde_json::Value,
		sink: &mut dyn ViolationSink,
	) -> ValidationResult<()> {
		let reference = FileReference::from_value(value)?;
		self.validate_into(reference.as_ref(), sink);
		Ok(())
	}

	/// Collects the violations produced for `value`
	pub fn violations(&self, value: Option<&FileReference>) -> Vec<Violation> {
		let mut violations = Vec::new();
		self.validate_into(value, &mut violations);
		violations
	}

	fn reject_upload(
		&self,
		upload: &UploadedFile,
		error: UploadErrorKind,
		sink: &mut dyn ViolationSink,
	) {
		tracing::debug!(
			code = error.code(),
			client_name = upload.client_name().unwrap_or_default(),
			"upload failed in transport"
		);
		sink.add(upload_violation(
			error,
			&self.constraint,
			upload.max_upload_size(),
			upload.client_name(),
		));
	}

	fn check_file(&self, reference: &FileReference, path: &Path, sink: &mut dyn ViolationSink) {
		if self.check_exists(path, sink) == Flow::Stop
			|| self.check_readable(path, sink) == Flow::Stop
			|| self.check_size(reference, path, sink) == Flow::Stop
		{
			return;
		}
		self.check_mime_type(reference, path, sink);
	}

	fn violation(&self, kind: ViolationKind, path: &Path) -> Violation {
		Violation::new(kind, self.constraint.messages.for_kind(kind))
			.with_parameter("file", path.display())
	}

	fn check_exists(&self, path: &Path, sink: &mut dyn ViolationSink) -> Flow {
		if self.metadata.exists(path) {
			return pass("exists", path);
		}
		tracing::debug!(file = %path.display(), "file not found");
		sink.add(self.violation(ViolationKind::NotFound, path));
		Flow::Stop
	}

	fn check_readable(&self, path: &Path, sink: &mut dyn ViolationSink) -> Flow {
		if self.metadata.is_readable(path) {
			return pass("readable", path);
		}
		tracing::debug!(file = %path.display(), "file not readable");
		sink.add(self.violation(ViolationKind::NotReadable, path));
		Flow::Stop
	}

	fn check_size(&self, reference: &FileReference, path: &Path, sink: &mut dyn ViolationSink) -> Flow {
		let size = match reference.known_size() {
			Some(size) => size,
			None => match self.metadata.size_bytes(path) {
				Ok(size) => size,
				Err(error) => {
					tracing::warn!(file = %path.display(), %error, "could not read file size");
					sink.add(self.violation(ViolationKind::NotReadable, path));
					return Flow::Stop;
				}
			},
		};

		if size == 0 {
			if self.constraint.disallow_empty {
				tracing::debug!(file = %path.display(), "empty file");
				sink.add(self.violation(ViolationKind::EmptyFile, path));
			}
			return pass("size", path);
		}

		if let Some(limit) = self.constraint.max_size_bytes()
			&& size > limit
		{
			let sizes = format_sizes(size, limit, self.constraint.uses_binary_format());
			tracing::debug!(file = %path.display(), size, limit, "file too large");
			sink.add(
				self.violation(ViolationKind::TooLarge, path)
					.with_parameter("size", sizes.size)
					.with_parameter("limit", sizes.limit)
					.with_parameter("suffix", sizes.suffix),
			);
			return Flow::Stop;
		}

		pass("size", path)
	}

	fn check_mime_type(
		&self,
		reference: &FileReference,
		path: &Path,
		sink: &mut dyn ViolationSink,
	) -> Flow {
		if self.constraint.mime_types.is_empty() {
			return pass("mime_type", path);
		}

		let mime_type = match reference.known_mime_type() {
			Some(mime_type) => Some(mime_type.to_string()),
			None => self.metadata.mime_type(path),
		};

		if let Err(mismatch) = self.constraint.mime_types.check(mime_type.as_deref()) {
			tracing::debug!(file = %path.display(), mime_type = ?mismatch.actual, "mime type rejected");
			sink.add(
				self.violation(ViolationKind::InvalidMimeType, path)
					.with_parameter("type", mismatch.quoted_actual())
					.with_parameter("types", mismatch.quoted_allowed()),
			);
			return Flow::Stop;
		}

		pass("mime_type", path)
	}
}

/// Forwards violations while counting them
struct CountingSink<'a> {
	sink: &'a mut dyn ViolationSink,
	count: usize,
}

impl ViolationSink for CountingSink<'_> {
	fn add(&mut self, violation: Violation) {
		self.count += 1;
		self.sink.add(violation);
	}
}

fn pass(check: &'static str, path: &Path) -> Flow {
	tracing::trace!(check, file = %path.display(), "check passed");
	Flow::Continue
}

impl<M: FileMetadata> Validator<FileReference> for FileValidator<M> {
	fn validate(&self, value: &FileReference) -> ValidationResult<()> {
		let violations = self.violations(Some(value));
		if violations.is_empty() {
			Ok(())
		} else {
			Err(ValidationError::Rejected(violations))
		}
	}
}

impl<M: FileMetadata> Validator<serde_json::Value> for FileValidator<M> {
	fn validate(&self, value: &serde_json::Value) -> ValidationResult<()> {
		let mut violations = Vec::new();
		self.validate_value_into(value, &mut violations)?;
		if violations.is_empty() {
			Ok(())
		} else {
			Err(ValidationError::Rejected(violations))
		}
	}
}
