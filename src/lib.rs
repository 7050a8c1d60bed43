//! Read-only access to MBTiles archives: SQLite-encoded tile pyramids used
//! for offline map rendering.
//!
//! The crate exposes:
//! - metadata key/value retrieval ([`MBTilesReader::get_metadata`])
//! - zoom-level range discovery ([`MBTilesReader::get_min_zoom`],
//!   [`MBTilesReader::get_max_zoom`])
//! - tile-blob lookup with fallback to the highest available zoom
//!   ([`MBTilesReader::get_tile`])
//! - a generic parametrized SQL path that marshals arbitrary result sets into
//!   type-tagged, JSON-compatible values ([`MBTilesReader::execute`])
//!
//! All results are portable value trees ([`Row`], [`ResultSet`], [`SqlValue`])
//! that serialize directly to JSON text; binary payloads cross that boundary
//! as base64 strings. The reader never writes tile data.
//!
//! ```rust,no_run
//! use mbtiles_reader::MBTilesReader;
//! use anyhow::Result;
//! use std::path::PathBuf;
//!
//! fn main() -> Result<()> {
//!     let mut reader = MBTilesReader::new(Some(PathBuf::from("/data/tiles")));
//!     reader.open("berlin.mbtiles")?;
//!
//!     let rows = reader.execute("SELECT name, value FROM metadata", &[])?;
//!     println!("{}", rows.stringify());
//!
//!     reader.close();
//!     Ok(())
//! }
//! ```

mod blob;
pub mod json;
mod query;
mod reader;
#[cfg(test)]
mod testing;

pub use blob::Blob;
pub use json::{ResultSet, Row, SqlValue};
pub use reader::MBTilesReader;
