//! Read tiles and metadata from an MBTiles (SQLite) database.
//!
//! [`MBTilesReader`] owns one read-only SQLite connection to an archive inside
//! a resolved base directory. It exposes the MBTiles fixed-shape queries
//! (`metadata` table scan, MIN/MAX zoom aggregates, tile point lookup) plus
//! the generic statement executor ([`MBTilesReader::execute`]).
//!
//! ## Lifecycle
//! A reader starts closed. [`open`](MBTilesReader::open) resolves the archive
//! file inside the base directory and opens it read-only; a failed open leaves
//! the reader closed, never half-open. [`close`](MBTilesReader::close) is
//! idempotent. No query runs while closed.
//!
//! ## Usage
//! ```rust,no_run
//! use mbtiles_reader::MBTilesReader;
//! use anyhow::Result;
//! use std::path::PathBuf;
//!
//! fn main() -> Result<()> {
//!     let mut reader = MBTilesReader::new(Some(PathBuf::from("/data/tiles")));
//!     reader.open("berlin.mbtiles")?;
//!
//!     let metadata = reader.get_metadata()?;
//!     let max_zoom = reader.get_max_zoom()?;
//!     if let Some(tile) = reader.get_tile(14, 8803, 5376)? {
//!         println!("{} bytes, base64 {}", tile.len(), tile.as_base64());
//!     }
//!
//!     reader.close();
//!     Ok(())
//! }
//! ```

use crate::{Blob, json::Row};
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::path::{Path, PathBuf};

/// Reader for MBTiles (SQLite) tile archives.
///
/// Holds at most one live read-only connection. Access is synchronous and
/// blocking; the reader provides no internal locking, so callers are
/// responsible for serializing use of one instance.
pub struct MBTilesReader {
	directory: Option<PathBuf>,
	connection: Option<Connection>,
}

/// A struct representing one record of the MBTiles `metadata` table.
///
/// Both cells can hold NULL; such records carry no usable entry.
struct MetadataRecord {
	name: Option<String>,
	value: Option<String>,
}

impl MBTilesReader {
	/// Creates a closed reader over the given base directory.
	///
	/// `directory` is the storage location already resolved by the caller;
	/// `None` means storage is unavailable and every `open` will fail.
	#[must_use]
	pub fn new(directory: Option<PathBuf>) -> MBTilesReader {
		MBTilesReader {
			directory,
			connection: None,
		}
	}

	/// Opens the archive file `name` inside the base directory, read-only.
	///
	/// Any previously open archive is closed first. On failure the reader is
	/// left closed, never with a half-open handle.
	///
	/// # Errors
	/// Returns an error if the base directory is unresolved or SQLite cannot
	/// open the file (missing, corrupt, no permission).
	pub fn open(&mut self, name: &str) -> Result<()> {
		self.close();

		let Some(directory) = &self.directory else {
			bail!("cannot open '{name}': storage directory is not resolved");
		};
		let path = directory.join(name);

		log::debug!("open {path:?}");

		match Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY) {
			Ok(connection) => {
				self.connection = Some(connection);
				Ok(())
			}
			Err(e) => {
				log::error!("can't open database {path:?}: {e}");
				Err(e).with_context(|| format!("opening MBTiles at {path:?}"))
			}
		}
	}

	/// Closes the archive. No-op if the reader is already closed.
	pub fn close(&mut self) {
		if let Some(connection) = self.connection.take() {
			log::debug!("close {:?}", connection.path());
		}
	}

	/// Returns `true` iff a live handle is held.
	#[must_use]
	pub fn is_open(&self) -> bool {
		self.connection.is_some()
	}

	/// Returns the resolved base directory, if storage was available.
	#[must_use]
	pub fn working_directory(&self) -> Option<&Path> {
		self.directory.as_deref()
	}

	/// The live connection, or an error if the reader is closed.
	pub(crate) fn connection(&self) -> Result<&Connection> {
		match &self.connection {
			Some(connection) => Ok(connection),
			None => bail!("database is not open"),
		}
	}

	/// Reads the full `metadata` table into a key/value mapping.
	///
	/// Key collisions keep the last value read. An absent `metadata` table or
	/// zero rows yield an empty mapping. Records with a NULL name or value are
	/// skipped; one malformed record must not lose the rest of the mapping.
	///
	/// # Errors
	/// Returns an error if the reader is closed or the scan fails.
	pub fn get_metadata(&self) -> Result<Row> {
		log::debug!("get_metadata");

		let connection = self.connection()?;

		let table_exists: bool = connection.query_row(
			"SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'metadata')",
			[],
			|row| row.get(0),
		)?;
		if !table_exists {
			return Ok(Row::new());
		}

		let mut stmt = connection.prepare("SELECT name, value FROM metadata")?;
		let entries = stmt.query_map([], |row| {
			Ok(MetadataRecord {
				name: row.get(0)?,
				value: row.get(1)?,
			})
		})?;

		let mut metadata = Row::new();
		for entry in entries {
			let entry = entry?;
			let (Some(name), Some(value)) = (entry.name, entry.value) else {
				continue;
			};
			metadata.set(&name, value);
		}

		Ok(metadata)
	}

	/// Lowest zoom level present in the `tiles` table, or `None` if the
	/// archive contains no tiles.
	///
	/// # Errors
	/// Returns an error if the reader is closed or the query fails.
	pub fn get_min_zoom(&self) -> Result<Option<u8>> {
		self.zoom_query("MIN(zoom_level)")
	}

	/// Highest zoom level present in the `tiles` table, or `None` if the
	/// archive contains no tiles.
	///
	/// # Errors
	/// Returns an error if the reader is closed or the query fails.
	pub fn get_max_zoom(&self) -> Result<Option<u8>> {
		self.zoom_query("MAX(zoom_level)")
	}

	/// Execute a single aggregate over the zoom column of the `tiles` table.
	///
	/// `MIN`/`MAX` over an empty table yield SQL NULL, reported as `None`:
	/// a missing-data condition, never zero.
	fn zoom_query(&self, sql_value: &str) -> Result<Option<u8>> {
		let sql = format!("SELECT {sql_value} FROM tiles");

		log::trace!("SQL: {sql}");

		let connection = self.connection()?;
		let mut stmt = connection.prepare(&sql)?;
		Ok(stmt.query_row([], |row| row.get::<_, Option<u8>>(0))?)
	}

	/// Fetch a single tile by (zoom, column, row).
	///
	/// A request above the archive's maximum zoom is answered at the maximum
	/// zoom instead: the closest coarser tile beats failing outright. Returns
	/// `Ok(None)` when no tile exists at the looked-up coordinate. If storage
	/// holds duplicate coordinates, the first row the engine returns wins.
	///
	/// # Errors
	/// Returns an error if the reader is closed or a query fails.
	pub fn get_tile(&self, zoom: u8, column: u32, row: u32) -> Result<Option<Blob>> {
		log::debug!("get_tile [{zoom}, {column}, {row}]");

		let zoom = match self.get_max_zoom()? {
			Some(max_zoom) if zoom > max_zoom => max_zoom,
			_ => zoom,
		};

		let connection = self.connection()?;
		let mut stmt =
			connection.prepare("SELECT tile_data FROM tiles WHERE zoom_level = ? AND tile_column = ? AND tile_row = ?")?;

		let tile = stmt
			.query_row(params![zoom, column, row], |r| r.get::<_, Vec<u8>>(0))
			.optional()?;

		Ok(tile.map(Blob::from))
	}
}

impl std::fmt::Debug for MBTilesReader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MBTilesReader")
			.field("directory", &self.directory)
			.field("open", &self.is_open())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::json::SqlValue;
	use crate::testing::{write_archive, write_empty_archive, write_tiles_only_archive};
	use assert_fs::TempDir;
	use rstest::rstest;

	fn open_fixture(temp: &TempDir) -> Result<MBTilesReader> {
		write_archive(&temp.path().join("fixture.mbtiles"), 5)?;
		let mut reader = MBTilesReader::new(Some(temp.path().to_path_buf()));
		reader.open("fixture.mbtiles")?;
		Ok(reader)
	}

	#[test]
	fn open_fails_without_directory() {
		let mut reader = MBTilesReader::new(None);
		assert!(reader.open("fixture.mbtiles").is_err());
		assert!(!reader.is_open());
	}

	#[test]
	fn open_fails_on_missing_file() -> Result<()> {
		let temp = TempDir::new()?;
		let mut reader = MBTilesReader::new(Some(temp.path().to_path_buf()));
		assert!(reader.open("missing.mbtiles").is_err());
		assert!(!reader.is_open());
		Ok(())
	}

	#[test]
	fn close_is_idempotent() -> Result<()> {
		let temp = TempDir::new()?;
		let mut reader = open_fixture(&temp)?;
		assert!(reader.is_open());

		reader.close();
		assert!(!reader.is_open());
		reader.close();
		assert!(!reader.is_open());
		Ok(())
	}

	#[test]
	fn close_on_never_opened_reader() {
		let mut reader = MBTilesReader::new(None);
		reader.close();
		assert!(!reader.is_open());
	}

	#[test]
	fn reopen_replaces_handle() -> Result<()> {
		let temp = TempDir::new()?;
		write_archive(&temp.path().join("one.mbtiles"), 2)?;
		write_archive(&temp.path().join("two.mbtiles"), 4)?;

		let mut reader = MBTilesReader::new(Some(temp.path().to_path_buf()));
		reader.open("one.mbtiles")?;
		assert_eq!(reader.get_max_zoom()?, Some(2));

		reader.open("two.mbtiles")?;
		assert!(reader.is_open());
		assert_eq!(reader.get_max_zoom()?, Some(4));
		Ok(())
	}

	#[test]
	fn working_directory_is_reported() -> Result<()> {
		let temp = TempDir::new()?;
		let reader = MBTilesReader::new(Some(temp.path().to_path_buf()));
		assert_eq!(reader.working_directory(), Some(temp.path()));

		let unresolved = MBTilesReader::new(None);
		assert_eq!(unresolved.working_directory(), None);
		Ok(())
	}

	#[test]
	fn metadata_scenario() -> Result<()> {
		let temp = TempDir::new()?;
		let reader = open_fixture(&temp)?;

		let metadata = reader.get_metadata()?;
		assert_eq!(metadata.get("format"), Some(&SqlValue::from("pbf")));
		assert_eq!(metadata.get("name"), Some(&SqlValue::from("fixture")));
		Ok(())
	}

	#[test]
	fn metadata_key_collision_keeps_last_value() -> Result<()> {
		let temp = TempDir::new()?;
		let reader = open_fixture(&temp)?;

		// the fixture writes 'version' twice, '1' then '2'
		assert_eq!(reader.get_metadata()?.get("version"), Some(&SqlValue::from("2")));
		Ok(())
	}

	#[test]
	fn metadata_record_with_null_value_is_skipped() -> Result<()> {
		let temp = TempDir::new()?;
		let reader = open_fixture(&temp)?;

		// the fixture writes a ('broken', NULL) record; it must not abort the scan
		let metadata = reader.get_metadata()?;
		assert_eq!(metadata.get("broken"), None);
		assert_eq!(metadata.get("format"), Some(&SqlValue::from("pbf")));
		assert_eq!(metadata.get("name"), Some(&SqlValue::from("fixture")));
		Ok(())
	}

	#[test]
	fn metadata_of_archive_without_metadata_table_is_empty() -> Result<()> {
		let temp = TempDir::new()?;
		write_tiles_only_archive(&temp.path().join("bare.mbtiles"))?;
		let mut reader = MBTilesReader::new(Some(temp.path().to_path_buf()));
		reader.open("bare.mbtiles")?;

		assert!(reader.get_metadata()?.is_empty());
		Ok(())
	}

	#[test]
	fn metadata_fails_when_closed() {
		let reader = MBTilesReader::new(None);
		assert!(reader.get_metadata().is_err());
	}

	#[test]
	fn zoom_bounds() -> Result<()> {
		let temp = TempDir::new()?;
		let reader = open_fixture(&temp)?;

		assert_eq!(reader.get_min_zoom()?, Some(0));
		assert_eq!(reader.get_max_zoom()?, Some(5));
		Ok(())
	}

	#[test]
	fn zoom_bounds_of_empty_archive_are_absent() -> Result<()> {
		let temp = TempDir::new()?;
		write_empty_archive(&temp.path().join("empty.mbtiles"))?;
		let mut reader = MBTilesReader::new(Some(temp.path().to_path_buf()));
		reader.open("empty.mbtiles")?;

		assert_eq!(reader.get_min_zoom()?, None);
		assert_eq!(reader.get_max_zoom()?, None);
		Ok(())
	}

	#[test]
	fn get_tile_returns_payload() -> Result<()> {
		let temp = TempDir::new()?;
		let reader = open_fixture(&temp)?;

		let tile = reader.get_tile(3, 0, 0)?.unwrap();
		assert_eq!(tile.as_slice(), &[3, 0xab, 0xcd]);
		Ok(())
	}

	#[rstest]
	#[case(6)]
	#[case(9)]
	#[case(255)]
	fn get_tile_clamps_to_max_zoom(#[case] zoom: u8) -> Result<()> {
		let temp = TempDir::new()?;
		let reader = open_fixture(&temp)?;

		let clamped = reader.get_tile(zoom, 0, 0)?;
		assert_eq!(clamped, reader.get_tile(5, 0, 0)?);
		assert_eq!(clamped.unwrap().as_slice(), &[5, 0xab, 0xcd]);
		Ok(())
	}

	#[test]
	fn get_tile_absent_coordinate_is_none() -> Result<()> {
		let temp = TempDir::new()?;
		let reader = open_fixture(&temp)?;

		assert_eq!(reader.get_tile(3, 7, 7)?, None);
		Ok(())
	}

	#[test]
	fn get_tile_fails_when_closed() -> Result<()> {
		let temp = TempDir::new()?;
		let mut reader = open_fixture(&temp)?;
		reader.close();

		assert!(reader.get_tile(0, 0, 0).is_err());
		Ok(())
	}
}
