//! The tagged scalar representation of one SQL cell.

use crate::Blob;
use crate::json::stringify;
use anyhow::{Result, bail};

/// One cell value, tagged by its SQLite storage class.
///
/// The tag is derived solely from the storage class of the cell at read time,
/// never from column declarations: MBTiles/SQLite columns are dynamically typed
/// per cell. Exactly one kind is active per value, and no kind is ever coerced
/// into another: an integer cell stays [`Integer`](SqlValue::Integer) and is
/// not widened to [`Float`](SqlValue::Float).
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
	Null,
	Integer(i64),
	Float(f64),
	Text(String),
	Binary(Blob),
}

impl SqlValue {
	/// Return the kind as a lowercase string (`"null"`, `"integer"`, etc.).
	#[must_use]
	pub fn type_as_str(&self) -> &str {
		use SqlValue::*;
		match self {
			Null => "null",
			Integer(_) => "integer",
			Float(_) => "float",
			Text(_) => "text",
			Binary(_) => "binary",
		}
	}

	/// Serialize this value to compact JSON text. Binary values appear as
	/// base64 strings, never raw bytes.
	#[must_use]
	pub fn stringify(&self) -> String {
		stringify(self)
	}

	/// Return the integer value.
	///
	/// # Errors
	/// Returns an error if the value is not an integer.
	pub fn as_integer(&self) -> Result<i64> {
		if let SqlValue::Integer(value) = self {
			Ok(*value)
		} else {
			bail!("expected an integer, found a {}", self.type_as_str())
		}
	}

	/// Return the float value.
	///
	/// # Errors
	/// Returns an error if the value is not a float.
	pub fn as_float(&self) -> Result<f64> {
		if let SqlValue::Float(value) = self {
			Ok(*value)
		} else {
			bail!("expected a float, found a {}", self.type_as_str())
		}
	}

	/// Return a string slice if this value is text.
	///
	/// # Errors
	/// Returns an error if the value is not text.
	pub fn as_str(&self) -> Result<&str> {
		if let SqlValue::Text(text) = self {
			Ok(text)
		} else {
			bail!("expected text, found a {}", self.type_as_str())
		}
	}

	/// Borrow the binary payload.
	///
	/// # Errors
	/// Returns an error if the value is not binary.
	pub fn as_blob(&self) -> Result<&Blob> {
		if let SqlValue::Binary(blob) = self {
			Ok(blob)
		} else {
			bail!("expected binary, found a {}", self.type_as_str())
		}
	}

	/// Return `true` if this value is `Null`.
	#[must_use]
	pub fn is_null(&self) -> bool {
		matches!(self, SqlValue::Null)
	}
}

impl From<i64> for SqlValue {
	fn from(input: i64) -> Self {
		SqlValue::Integer(input)
	}
}

impl From<f64> for SqlValue {
	fn from(input: f64) -> Self {
		SqlValue::Float(input)
	}
}

impl From<&str> for SqlValue {
	fn from(input: &str) -> Self {
		SqlValue::Text(input.to_string())
	}
}

impl From<String> for SqlValue {
	fn from(input: String) -> Self {
		SqlValue::Text(input)
	}
}

impl From<Blob> for SqlValue {
	fn from(input: Blob) -> Self {
		SqlValue::Binary(input)
	}
}

impl From<Vec<u8>> for SqlValue {
	fn from(input: Vec<u8>) -> Self {
		SqlValue::Binary(Blob::from(input))
	}
}
