//! Shared test fixtures: small MBTiles databases written into temp directories.
//!
//! Only compiled for tests. Fixtures are written with a plain writable
//! `rusqlite` connection; the crate under test then opens them read-only.

use anyhow::Result;
use rusqlite::{Connection, params};
use std::path::Path;

/// Writes a standard fixture archive at `path`.
///
/// Layout:
/// - `metadata`: `name = "fixture"`, `format = "pbf"`, `version` written twice
///   (`"1"` then `"2"`) to exercise key collisions, and a `broken` record with
///   a NULL value to exercise malformed-record skipping.
/// - `tiles`: one tile at (zoom, 0, 0) for every zoom in `0..=max_zoom`, with
///   payload `[zoom, 0xab, 0xcd]`.
pub fn write_archive(path: &Path, max_zoom: u8) -> Result<()> {
	let connection = Connection::open(path)?;
	create_schema(&connection)?;

	connection.execute(
		"INSERT INTO metadata (name, value) VALUES ('name', 'fixture'), ('format', 'pbf'), ('version', '1'), ('version', '2'), ('broken', NULL)",
		[],
	)?;

	for zoom in 0..=max_zoom {
		connection.execute(
			"INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?, 0, 0, ?)",
			params![zoom, vec![zoom, 0xab, 0xcd]],
		)?;
	}

	Ok(())
}

/// Writes an archive with both tables present but no rows at all.
pub fn write_empty_archive(path: &Path) -> Result<()> {
	let connection = Connection::open(path)?;
	create_schema(&connection)
}

/// Writes an archive with only an empty `tiles` table and no `metadata` table.
pub fn write_tiles_only_archive(path: &Path) -> Result<()> {
	let connection = Connection::open(path)?;
	connection.execute_batch(
		"CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB);",
	)?;
	Ok(())
}

fn create_schema(connection: &Connection) -> Result<()> {
	connection.execute_batch(
		"CREATE TABLE metadata (name TEXT, value TEXT);
		CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB);",
	)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;

	#[test]
	fn fixture_has_expected_shape() -> Result<()> {
		let temp = TempDir::new()?;
		let path = temp.path().join("fixture.mbtiles");
		write_archive(&path, 3)?;

		let connection = Connection::open(&path)?;
		let tiles: i64 = connection.query_row("SELECT COUNT(*) FROM tiles", [], |row| row.get(0))?;
		assert_eq!(tiles, 4);
		let entries: i64 = connection.query_row("SELECT COUNT(*) FROM metadata", [], |row| row.get(0))?;
		assert_eq!(entries, 5);
		Ok(())
	}
}
