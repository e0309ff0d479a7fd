//! Identifier decoding shared by resource types.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Number(i64),
}

/// Accepts identifiers encoded either as JSON strings or integers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match RawId::deserialize(deserializer)? {
		RawId::Text(text) => text,
		RawId::Number(n) => n.to_string(),
	})
}
