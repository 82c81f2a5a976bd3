//! Byte-size limits and their human-readable rendering
//!
//! A size violation shows the file size and the configured limit in the same
//! unit. The limit is never rounded (a 1.129 MB limit is never shown as
//! 1.13 MB), and the two figures are never textually identical, so a message
//! such as "5 MB exceeds 5 MB" cannot occur.
//!
//! # Examples
//!
//! ```
//! use reinhardt_validators::file::size::format_sizes;
//!
//! let sizes = format_sizes(1_100_000, 1_000_000, false);
//! assert_eq!(sizes.size, "1.1");
//! assert_eq!(sizes.limit, "1");
//! assert_eq!(sizes.suffix, "MB");
//!
//! let sizes = format_sizes(1_536, 1_024, true);
//! assert_eq!(sizes.size, "1.5");
//! assert_eq!(sizes.limit, "1");
//! assert_eq!(sizes.suffix, "KiB");
//! ```

use crate::{ValidationError, ValidationResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const KB_BYTES: u64 = 1_000;
pub const MB_BYTES: u64 = 1_000_000;
pub const KIB_BYTES: u64 = 1_024;
pub const MIB_BYTES: u64 = 1_048_576;

/// Maximum number of digits shown after the decimal point
const MAX_DECIMALS: usize = 2;

/// A byte-scaling coefficient and the suffix it is displayed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
	pub coefficient: u64,
	pub suffix: &'static str,
}

/// Coefficient ladder for one unit system, ordered by increasing coefficient
#[derive(Debug)]
pub struct UnitTable {
	units: [Unit; 3],
}

/// Base-1000 units: bytes, kB, MB
pub static DECIMAL_UNITS: UnitTable = UnitTable {
	units: [
		Unit {
			coefficient: 1,
			suffix: "bytes",
		},
		Unit {
			coefficient: KB_BYTES,
			suffix: "kB",
		},
		Unit {
			coefficient: MB_BYTES,
			suffix: "MB",
		},
	],
};

/// Base-1024 units: bytes, KiB, MiB
pub static BINARY_UNITS: UnitTable = UnitTable {
	units: [
		Unit {
			coefficient: 1,
			suffix: "bytes",
		},
		Unit {
			coefficient: KIB_BYTES,
			suffix: "KiB",
		},
		Unit {
			coefficient: MIB_BYTES,
			suffix: "MiB",
		},
	],
};

impl UnitTable {
	/// Returns the ladder for the requested unit system
	pub fn for_format(binary_format: bool) -> &'static UnitTable {
		if binary_format {
			&BINARY_UNITS
		} else {
			&DECIMAL_UNITS
		}
	}

	pub fn units(&self) -> &[Unit] {
		&self.units
	}

	/// Suffix registered for `coefficient`, if it belongs to this ladder
	pub fn suffix(&self, coefficient: u64) -> Option<&'static str> {
		self.units
			.iter()
			.find(|unit| unit.coefficient == coefficient)
			.map(|unit| unit.suffix)
	}
}

/// Size and limit rendered against a shared coefficient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSizes {
	/// Actual size, rounded to two decimals
	pub size: String,
	/// Limit, exact
	pub limit: String,
	pub suffix: &'static str,
	pub coefficient: u64,
}

/// Renders `size_bytes` and `limit_bytes` in the largest unit that shows the
/// limit exactly with at most two decimals and keeps both strings distinct.
///
/// Intended for `size_bytes > limit_bytes`. Equal inputs descend to bytes and
/// come back as equal strings.
pub fn format_sizes(size_bytes: u64, limit_bytes: u64, binary_format: bool) -> FormattedSizes {
	let units = UnitTable::for_format(binary_format).units();
	let mut index = units.len() - 1;

	while index > 0 && decimal_places(limit_bytes, units[index].coefficient) > MAX_DECIMALS {
		index -= 1;
	}

	let mut limit = exact_quotient(limit_bytes, units[index].coefficient);
	let mut size = rounded_quotient(size_bytes, units[index].coefficient);

	// Rounding collision: descend until the two figures can be told apart.
	while size == limit && index > 0 {
		index -= 1;
		limit = exact_quotient(limit_bytes, units[index].coefficient);
		size = rounded_quotient(size_bytes, units[index].coefficient);
	}

	FormattedSizes {
		size,
		limit,
		suffix: units[index].suffix,
		coefficient: units[index].coefficient,
	}
}

/// Number of digits after the decimal point in the exact expansion of
/// `value / coefficient`.
///
/// Every ladder coefficient factors into 2s and 5s, so the expansion is finite.
fn decimal_places(value: u64, coefficient: u64) -> usize {
	let mut remainder = value % coefficient;
	let mut places = 0;
	while remainder != 0 {
		remainder = (remainder * 10) % coefficient;
		places += 1;
	}
	places
}

/// Exact decimal text of `value / coefficient`, without trailing zeros
fn exact_quotient(value: u64, coefficient: u64) -> String {
	let integer = value / coefficient;
	let mut remainder = value % coefficient;
	if remainder == 0 {
		return integer.to_string();
	}

	let mut text = format!("{}.", integer);
	while remainder != 0 {
		remainder *= 10;
		let digit = remainder / coefficient;
		text.push(char::from(b'0' + digit as u8));
		remainder %= coefficient;
	}
	text
}

/// Text of `value / coefficient` rounded half-up to two decimals, without
/// trailing zeros
fn rounded_quotient(value: u64, coefficient: u64) -> String {
	let coefficient = u128::from(coefficient);
	let hundredths = (u128::from(value) * 200 + coefficient) / (2 * coefficient);
	let integer = hundredths / 100;
	let fraction = hundredths % 100;

	match fraction {
		0 => integer.to_string(),
		f if f % 10 == 0 => format!("{}.{}", integer, f / 10),
		f => format!("{}.{:02}", integer, f),
	}
}

/// A configured maximum size, stored in raw bytes
///
/// Parsed from a byte count or from a count with a unit suffix:
/// `k` (1000), `M` (1000²), `Ki` (1024) or `Mi` (1024²). Suffixes are
/// case-insensitive.
///
/// # Examples
///
/// ```
/// use reinhardt_validators::file::size::MaxSize;
///
/// let size = MaxSize::parse("2M").unwrap();
/// assert_eq!(size.bytes(), 2_000_000);
/// assert!(!size.is_binary());
///
/// let size = MaxSize::parse("512Ki").unwrap();
/// assert_eq!(size.bytes(), 524_288);
/// assert!(size.is_binary());
///
/// assert!(MaxSize::parse("2 gigabytes").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxSize {
	bytes: u64,
	binary: bool,
}

impl MaxSize {
	/// A limit in plain bytes
	pub fn from_bytes(bytes: u64) -> Self {
		Self {
			bytes,
			binary: false,
		}
	}

	pub fn parse(text: &str) -> ValidationResult<Self> {
		let text = text.trim();
		let split = text
			.find(|c: char| !c.is_ascii_digit())
			.unwrap_or(text.len());
		let (digits, suffix) = text.split_at(split);

		if digits.is_empty() {
			return Err(ValidationError::InvalidMaxSize(text.to_string()));
		}

		let (coefficient, binary) = match suffix.to_ascii_lowercase().as_str() {
			"" => (1, false),
			"k" => (KB_BYTES, false),
			"m" => (MB_BYTES, false),
			"ki" => (KIB_BYTES, true),
			"mi" => (MIB_BYTES, true),
			_ => return Err(ValidationError::InvalidMaxSize(text.to_string())),
		};

		let bytes = digits
			.parse::<u64>()
			.ok()
			.and_then(|count| count.checked_mul(coefficient))
			.ok_or_else(|| ValidationError::InvalidMaxSize(text.to_string()))?;

		Ok(Self { bytes, binary })
	}

	pub fn bytes(&self) -> u64 {
		self.bytes
	}

	/// Whether the limit was declared with a binary (`Ki`/`Mi`) suffix
	pub fn is_binary(&self) -> bool {
		self.binary
	}
}

impl From<u64> for MaxSize {
	fn from(bytes: u64) -> Self {
		Self::from_bytes(bytes)
	}
}

impl fmt::Display for MaxSize {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.binary && self.bytes != 0 {
			if self.bytes % MIB_BYTES == 0 {
				return write!(f, "{}Mi", self.bytes / MIB_BYTES);
			}
			if self.bytes % KIB_BYTES == 0 {
				return write!(f, "{}Ki", self.bytes / KIB_BYTES);
			}
		}
		write!(f, "{}", self.bytes)
	}
}

impl Serialize for MaxSize {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		if self.binary {
			serializer.serialize_str(&self.to_string())
		} else {
			serializer.serialize_u64(self.bytes)
		}
	}
}

impl<'de> Deserialize<'de> for MaxSize {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Bytes(u64),
			Text(String),
		}

		match Raw::deserialize(deserializer)? {
			Raw::Bytes(bytes) => Ok(Self::from_bytes(bytes)),
			Raw::Text(text) => Self::parse(&text).map_err(serde::de::Error::custom),
		}
	}
}
