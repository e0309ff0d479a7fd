//! Error types for the client core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// A request completed with a failed envelope; carries the server's
	/// message or the generic fallback.
	#[error("{0}")]
	Api(String),

	/// Configuration or credential storage failed.
	#[error(transparent)]
	Runtime(#[from] skillswap_runtime::Error),

	#[error("invalid URL: {0}")]
	Url(#[from] url::ParseError),

	#[error("HTTP client error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("WebSocket error: {0}")]
	WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error("channel error: {0}")]
	Channel(String),
}

impl Error {
	/// Server-reported failure message, if this is an API failure.
	pub fn api_message(&self) -> Option<&str> {
		match self {
			Self::Api(message) => Some(message),
			_ => None,
		}
	}
}
