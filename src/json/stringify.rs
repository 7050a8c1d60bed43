use super::SqlValue;

/// Serialize a single [`SqlValue`] as compact JSON text.
///
/// Binary values are emitted as base64 strings since JSON has no binary scalar.
pub fn stringify(value: &SqlValue) -> String {
	match value {
		SqlValue::Null => String::from("null"),
		SqlValue::Integer(i) => i.to_string(),
		SqlValue::Float(f) => f.to_string(),
		SqlValue::Text(s) => format!("\"{}\"", escape_json_string(s)),
		SqlValue::Binary(blob) => format!("\"{}\"", blob.as_base64()),
	}
}

pub fn escape_json_string(input: &str) -> String {
	input
		.chars()
		.map(|c| match c {
			'"' => "\\\"".to_string(),
			'\\' => "\\\\".to_string(),
			'\n' => "\\n".to_string(),
			'\r' => "\\r".to_string(),
			'\t' => "\\t".to_string(),
			'\u{08}' => "\\b".to_string(),
			'\u{0c}' => "\\f".to_string(),
			c if c.is_control() => format!("\\u{:04x}", c as u32),
			c => c.to_string(),
		})
		.collect()
}
