//! Ordered row objects and result-set sequences.

use crate::json::{SqlValue, escape_json_string};
use std::fmt::{Debug, Display};

/// An ordered mapping from column name to [`SqlValue`].
///
/// Keys keep the order in which they were first set, i.e. the result set's
/// column order. Setting an existing key overwrites its value in place, so duplicate
/// column names resolve to the last value written.
#[derive(Clone, Default, PartialEq)]
pub struct Row(Vec<(String, SqlValue)>);

impl Row {
	/// Create a new, empty `Row`.
	#[must_use]
	pub fn new() -> Self {
		Self(Vec::new())
	}

	/// Get the value for the specified key, if present.
	#[must_use]
	pub fn get(&self, key: &str) -> Option<&SqlValue> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	/// Set the specified key to the given value. An existing key keeps its
	/// position and gets the new value; a new key is appended.
	pub fn set<T>(&mut self, key: &str, value: T)
	where
		SqlValue: From<T>,
	{
		let value = SqlValue::from(value);
		if let Some(entry) = self.0.iter_mut().find(|(k, _)| k == key) {
			entry.1 = value;
		} else {
			self.0.push((key.to_owned(), value));
		}
	}

	/// Number of columns in this row.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Return `true` if the row has no columns.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterate over key-value pairs in column order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &SqlValue)> {
		self.0.iter().map(|(k, v)| (k, v))
	}

	/// Column names in column order.
	pub fn keys(&self) -> impl Iterator<Item = &String> {
		self.0.iter().map(|(k, _)| k)
	}

	/// Serialize this `Row` into a compact JSON object.
	#[must_use]
	pub fn stringify(&self) -> String {
		let items = self
			.0
			.iter()
			.map(|(key, value)| format!("\"{}\":{}", escape_json_string(key), value.stringify()))
			.collect::<Vec<_>>();
		format!("{{{}}}", items.join(","))
	}
}

impl Debug for Row {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_map().entries(self.0.iter().map(|(k, v)| (k, v))).finish()
	}
}

impl Display for Row {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.stringify())
	}
}

/// Convert a `Vec<(&str, T)>` into a `Row`, consuming the vector of key-value pairs.
impl<T> From<Vec<(&str, T)>> for Row
where
	SqlValue: From<T>,
{
	fn from(input: Vec<(&str, T)>) -> Self {
		let mut row = Row::new();
		for (key, value) in input {
			row.set(key, value);
		}
		row
	}
}

/// An ordered sequence of [`Row`]s, created fresh per executed statement and
/// owned exclusively by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSet(pub Vec<Row>);

impl ResultSet {
	/// Append a row to the sequence.
	pub fn push(&mut self, row: Row) {
		self.0.push(row);
	}

	/// Number of rows.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Return `true` if the sequence contains no rows.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterate over the rows in result order.
	pub fn iter(&self) -> impl Iterator<Item = &Row> {
		self.0.iter()
	}

	/// Serialize the whole sequence into a compact JSON array of objects.
	#[must_use]
	pub fn stringify(&self) -> String {
		let items = self.0.iter().map(Row::stringify).collect::<Vec<_>>();
		format!("[{}]", items.join(","))
	}
}

impl Display for ResultSet {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.stringify())
	}
}

impl IntoIterator for ResultSet {
	type Item = Row;
	type IntoIter = std::vec::IntoIter<Row>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
