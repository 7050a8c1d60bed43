//! Generic statement execution against an open archive.
//!
//! Unlike the fixed-shape queries on [`MBTilesReader`], nothing is known in
//! advance about a statement passed to [`MBTilesReader::execute`]: neither the
//! column set nor the storage class of any cell. Each cell is classified at
//! read time from the engine's own type metadata and marshalled into a
//! [`SqlValue`]; each row becomes an ordered [`Row`]; the whole result a
//! [`ResultSet`].
//!
//! A cell that cannot be marshalled (e.g. text that is not valid UTF-8) is
//! logged and omitted from its row; the rest of the result set is still
//! returned. Statement-level failures (malformed SQL, closed reader) abort the
//! call with no partial result.

use crate::Blob;
use crate::json::{ResultSet, Row, SqlValue};
use crate::reader::MBTilesReader;
use anyhow::{Context, Result, ensure};
use rusqlite::{params_from_iter, types::ValueRef};

impl MBTilesReader {
	/// Runs an arbitrary parametrized statement and marshals its result set.
	///
	/// `params` are bound positionally to `?` placeholders, each as a text
	/// value, matching the dynamically typed binding model of the engine.
	/// An empty `query` returns an empty result set without touching the
	/// database. Rows come back in the engine's natural order; the statement
	/// and its cursor are released on every exit path.
	///
	/// # Errors
	/// Returns an error if the reader is closed or the statement is malformed
	/// or fails during execution.
	pub fn execute(&self, query: &str, params: &[String]) -> Result<ResultSet> {
		if query.is_empty() {
			return Ok(ResultSet::default());
		}

		log::trace!("SQL: {query}");

		let connection = self.connection()?;
		let mut stmt = connection
			.prepare(query)
			.with_context(|| format!("preparing statement '{query}'"))?;
		let column_names: Vec<String> = stmt.column_names().iter().map(|name| (*name).to_string()).collect();

		let mut rows = stmt.query(params_from_iter(params))?;
		let mut result = ResultSet::default();
		while let Some(row) = rows.next()? {
			result.push(materialize_row(&column_names, row));
		}

		Ok(result)
	}
}

/// Builds one [`Row`] from the cursor's current position.
///
/// Empty column names are skipped. A cell that fails to marshal is logged and
/// omitted; one bad cell must not lose the rest of the batch. Never advances
/// the cursor.
fn materialize_row(column_names: &[String], row: &rusqlite::Row) -> Row {
	let mut result = Row::new();
	for (index, name) in column_names.iter().enumerate() {
		if name.is_empty() {
			continue;
		}
		match read_cell(row, index) {
			Ok(value) => result.set(name, value),
			Err(e) => log::warn!("skipping column '{name}': {e}"),
		}
	}
	result
}

/// Classifies and reads the cell at `index` into a [`SqlValue`].
///
/// The storage class comes from the engine's per-cell type metadata; the match
/// arms keep the canonical classification order null → integer → float →
/// text → binary. No cross-kind coercion: an integer cell is never widened to
/// a float. A REAL cell holding a non-finite value is a marshal failure, since
/// JSON has no representation for it.
fn read_cell(row: &rusqlite::Row, index: usize) -> Result<SqlValue> {
	Ok(match row.get_ref(index)? {
		ValueRef::Null => SqlValue::Null,
		ValueRef::Integer(value) => SqlValue::Integer(value),
		ValueRef::Real(value) => {
			ensure!(value.is_finite(), "float cell {value} cannot be encoded as JSON");
			SqlValue::Float(value)
		}
		ValueRef::Text(text) => SqlValue::Text(
			std::str::from_utf8(text)
				.context("text cell is not valid UTF-8")?
				.to_string(),
		),
		ValueRef::Blob(bytes) => SqlValue::Binary(Blob::from(bytes)),
	})
}
