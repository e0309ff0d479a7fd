//! Response normalization.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use skillswap_protocol::{Envelope, GENERIC_ERROR};

/// Folds a raw response into an [`Envelope`].
///
/// - Non-2xx: failure with the body's `message` or `error`, else
///   `request failed with status N`.
/// - 2xx with a `success` key: the body is already an envelope and is
///   unwrapped (`success: false` becomes a failure).
/// - 2xx object whose only payload key is `data`: the inner value is the
///   payload. With siblings (e.g. `pagination`) the object stays whole.
/// - Anything else is the payload as-is; an empty body decodes as `null`.
pub(crate) fn normalize<T: DeserializeOwned>(status: StatusCode, is_json: bool, bytes: &[u8]) -> Envelope<T> {
	let body = match decode_body(is_json, bytes) {
		Ok(body) => body,
		Err(err) if status.is_success() => return Envelope::failure(format!("malformed response: {err}")),
		Err(_) => Value::Null,
	};

	if !status.is_success() {
		let message = failure_text(&body)
			.unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
		return Envelope::failure(message);
	}

	let (payload, message) = match body {
		Value::Object(mut map) => {
			let reported = map.remove("success").map(|flag| flag.as_bool().unwrap_or(false));
			let message = take_string(&mut map, "message");
			let error = take_string(&mut map, "error");
			if reported == Some(false) {
				let error = error.or(message).unwrap_or_else(|| GENERIC_ERROR.to_string());
				return Envelope::failure(error);
			}
			(unwrap_data(map, reported.is_some() || message.is_some()), message)
		}
		other => (other, None),
	};

	match serde_json::from_value::<T>(payload) {
		Ok(data) => Envelope::ok(data).with_message(message),
		Err(err) => Envelope::failure(format!("malformed response: {err}")),
	}
}

fn decode_body(is_json: bool, bytes: &[u8]) -> serde_json::Result<Value> {
	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Ok(Value::Null);
	}
	if is_json {
		serde_json::from_slice(bytes)
	} else {
		Ok(Value::String(String::from_utf8_lossy(bytes).trim().to_string()))
	}
}

/// Payload of a successful object body. A lone `data` key is unwrapped; when
/// siblings such as `pagination` sit beside it the object is kept whole.
fn unwrap_data(mut map: Map<String, Value>, stripped_envelope: bool) -> Value {
	if map.len() == 1 && map.contains_key("data") {
		return map.remove("data").unwrap_or(Value::Null);
	}
	if map.is_empty() && stripped_envelope {
		return Value::Null;
	}
	Value::Object(map)
}

fn failure_text(body: &Value) -> Option<String> {
	match body {
		Value::Object(map) => ["message", "error"]
			.iter()
			.find_map(|key| map.get(*key).and_then(Value::as_str))
			.filter(|text| !text.trim().is_empty())
			.map(str::to_string),
		Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
		_ => None,
	}
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
	match map.remove(key) {
		Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
		_ => None,
	}
}
