//! JSON-compatible portable values.
//!
//! Every query result leaves this crate as a tree of these types, suitable for
//! direct serialization as JSON: [`Row`] (an ordered string-keyed object),
//! [`ResultSet`] (an ordered array of rows) and [`SqlValue`] (a scalar tagged
//! by its SQLite storage class).

mod row;
mod stringify;
mod value;

pub use row::{ResultSet, Row};
pub use stringify::{escape_json_string, stringify};
pub use value::SqlValue;
