//! Binary payloads: tile blobs and blob-typed SQL cells.
//!
//! [`Blob`] is a thin wrapper around [`Vec<u8>`]. Since the JSON boundary has no
//! native binary scalar, blobs cross it as base64 text; [`Blob::as_base64`] and
//! [`Blob::from_base64`] are the two directions of that encoding.
//!
//! ```rust
//! use mbtiles_reader::Blob;
//!
//! let blob = Blob::from(vec![0x89, 0x50, 0x4e, 0x47]);
//! assert_eq!(blob.len(), 4);
//! assert_eq!(blob.as_base64(), "iVBORw==");
//! assert_eq!(Blob::from_base64("iVBORw==").unwrap(), blob);
//! ```

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::fmt::Debug;

/// A byte payload read from the archive, e.g. one tile or one blob cell.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Returns the length of the payload in bytes.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` if the payload contains no bytes.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the payload as a byte slice.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	/// Consumes the `Blob` and returns the underlying byte vector.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Encodes the payload as standard base64 text, the representation used at
	/// the JSON boundary.
	#[must_use]
	pub fn as_base64(&self) -> String {
		STANDARD.encode(&self.0)
	}

	/// Decodes standard base64 text back into a `Blob`.
	///
	/// # Errors
	/// Returns an error if the text is not valid base64.
	pub fn from_base64(text: &str) -> Result<Blob> {
		Ok(Blob(STANDARD.decode(text).context("invalid base64")?))
	}
}

impl From<Vec<u8>> for Blob {
	fn from(vec: Vec<u8>) -> Self {
		Blob(vec)
	}
}

impl From<&[u8]> for Blob {
	fn from(slice: &[u8]) -> Self {
		Blob(slice.to_vec())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Blob").field("len", &self.0.len()).finish()
	}
}
