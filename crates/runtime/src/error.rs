//! Error types for configuration and storage.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// The API base URL was not configured. Fatal at startup.
	#[error("SKILLSWAP_API_BASE_URL is required")]
	MissingBaseUrl,

	#[error("invalid API base URL {url:?}: {source}")]
	InvalidBaseUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},

	#[error("invalid value for {key}: {value:?}")]
	InvalidValue { key: &'static str, value: String },

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
