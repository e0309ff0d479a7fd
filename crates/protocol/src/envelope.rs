//! Normalized result of every transport call.

use serde::Serialize;

/// Fallback text used when a failure carries no message of its own.
pub const GENERIC_ERROR: &str = "An error occurred";

/// Uniform success/error wrapper returned by the transport client.
///
/// Exactly one of `data` and `error` is populated: a successful envelope
/// always carries data (JSON `null` decodes to `()` for unit results) and a
/// failed one always carries an error message. Fields are private so the
/// invariant cannot be broken after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
	success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	message: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

impl<T> Envelope<T> {
	/// Successful envelope carrying `data`.
	pub fn ok(data: T) -> Self {
		Self {
			success: true,
			data: Some(data),
			message: None,
			error: None,
		}
	}

	/// Failed envelope; an empty message is replaced by [`GENERIC_ERROR`].
	pub fn failure(error: impl Into<String>) -> Self {
		let error = error.into();
		Self {
			success: false,
			data: None,
			message: None,
			error: Some(if error.trim().is_empty() { GENERIC_ERROR.to_string() } else { error }),
		}
	}

	/// Attaches the informational server message.
	pub fn with_message(mut self, message: Option<String>) -> Self {
		self.message = message;
		self
	}

	pub fn is_success(&self) -> bool {
		self.success
	}

	pub fn data(&self) -> Option<&T> {
		self.data.as_ref()
	}

	pub fn message(&self) -> Option<&str> {
		self.message.as_deref()
	}

	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// Converts into a `Result`, yielding the error message on failure.
	pub fn into_result(self) -> Result<T, String> {
		match (self.data, self.error) {
			(Some(data), None) => Ok(data),
			(_, Some(error)) => Err(error),
			(None, None) => Err(GENERIC_ERROR.to_string()),
		}
	}

	pub fn into_data(self) -> Option<T> {
		self.data
	}

	/// Maps the success payload, keeping message and error untouched.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
		Envelope {
			success: self.success,
			data: self.data.map(f),
			message: self.message,
			error: self.error,
		}
	}
}

impl<T> From<Result<T, String>> for Envelope<T> {
	fn from(result: Result<T, String>) -> Self {
		match result {
			Ok(data) => Self::ok(data),
			Err(error) => Self::failure(error),
		}
	}
}
