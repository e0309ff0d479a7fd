//! Client configuration sourced from the build/runtime environment.
//!
//! The only required value is the API base URL; everything else has a
//! default matching the production client. A missing base URL aborts
//! initialization rather than degrading.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

pub const ENV_API_BASE_URL: &str = "SKILLSWAP_API_BASE_URL";
pub const ENV_APP_NAME: &str = "SKILLSWAP_APP_NAME";
pub const ENV_APP_VERSION: &str = "SKILLSWAP_APP_VERSION";
pub const ENV_ENVIRONMENT: &str = "SKILLSWAP_ENV";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "SKILLSWAP_REQUEST_TIMEOUT_MS";
pub const ENV_ADMIN_EMAILS: &str = "SKILLSWAP_ADMIN_EMAILS";

const DEFAULT_APP_NAME: &str = "SkillSwap";
const DEFAULT_APP_VERSION: &str = "1.0.0";
const DEFAULT_ADMIN_EMAIL: &str = "admin@skillswap.com";
const DEFAULT_CHANNEL_PATH: &str = "/ws";

/// Build flavour of the running client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
	#[default]
	Development,
	Production,
}

impl Environment {
	fn parse(value: &str) -> Option<Self> {
		match value.trim().to_ascii_lowercase().as_str() {
			"development" | "dev" => Some(Self::Development),
			"production" | "prod" => Some(Self::Production),
			_ => None,
		}
	}
}

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct Config {
	/// Base of every HTTP call, e.g. `http://127.0.0.1:8000/api`.
	pub api_base_url: Url,
	pub app_name: String,
	pub app_version: String,
	pub environment: Environment,
	/// Per-request timeout applied by the HTTP client.
	pub request_timeout: Duration,
	/// Path of the realtime channel relative to the base URL.
	pub channel_path: String,
	/// Reconnect attempts before the channel gives up.
	pub reconnect_max_attempts: u32,
	/// Reconnect delay unit; attempt `n` waits `n` times this.
	pub reconnect_base_delay: Duration,
	/// Settle time for debounced queries.
	pub debounce_delay: Duration,
	/// Default page size for list resources.
	pub pagination_limit: u32,
	/// Fallback admin identities, consulted only when the server payload
	/// carries no role.
	pub admin_emails: Vec<String>,
}

impl Config {
	/// Builds a configuration with defaults around `api_base_url`.
	pub fn new(api_base_url: &str) -> Result<Self> {
		Ok(Self {
			api_base_url: parse_base_url(api_base_url)?,
			app_name: DEFAULT_APP_NAME.to_string(),
			app_version: DEFAULT_APP_VERSION.to_string(),
			environment: Environment::default(),
			request_timeout: Duration::from_secs(30),
			channel_path: DEFAULT_CHANNEL_PATH.to_string(),
			reconnect_max_attempts: 5,
			reconnect_base_delay: Duration::from_millis(1000),
			debounce_delay: Duration::from_millis(300),
			pagination_limit: 20,
			admin_emails: vec![DEFAULT_ADMIN_EMAIL.to_string()],
		})
	}

	/// Reads configuration from process environment variables.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads configuration through `lookup`, which maps variable names to values.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

		let base = get(ENV_API_BASE_URL).ok_or(Error::MissingBaseUrl)?;
		let mut config = Self::new(&base)?;

		if let Some(name) = get(ENV_APP_NAME) {
			config.app_name = name;
		}
		if let Some(version) = get(ENV_APP_VERSION) {
			config.app_version = version;
		}
		if let Some(env) = get(ENV_ENVIRONMENT) {
			config.environment = Environment::parse(&env).ok_or(Error::InvalidValue {
				key: ENV_ENVIRONMENT,
				value: env,
			})?;
		}
		if let Some(timeout) = get(ENV_REQUEST_TIMEOUT_MS) {
			let millis = timeout.parse::<u64>().map_err(|_| Error::InvalidValue {
				key: ENV_REQUEST_TIMEOUT_MS,
				value: timeout.clone(),
			})?;
			config.request_timeout = Duration::from_millis(millis);
		}
		if let Some(emails) = get(ENV_ADMIN_EMAILS) {
			config.admin_emails = emails
				.split(',')
				.map(str::trim)
				.filter(|e| !e.is_empty())
				.map(str::to_string)
				.collect();
		}

		debug!(
			target = "skillswap.config",
			base = %config.api_base_url,
			env = ?config.environment,
			"configuration loaded"
		);
		Ok(config)
	}

	pub fn is_development(&self) -> bool {
		self.environment == Environment::Development
	}

	pub fn is_production(&self) -> bool {
		self.environment == Environment::Production
	}

	/// Absolute URL for a relative endpoint.
	///
	/// The endpoint is appended to the base path, so a base of
	/// `http://host/api` and endpoint `/users` yields `http://host/api/users`.
	pub fn resolve(&self, endpoint: &str) -> std::result::Result<Url, url::ParseError> {
		let base = self.api_base_url.as_str().trim_end_matches('/');
		if endpoint.starts_with('/') {
			Url::parse(&format!("{base}{endpoint}"))
		} else {
			Url::parse(&format!("{base}/{endpoint}"))
		}
	}

	/// URL of the realtime channel: the base URL with its scheme swapped for
	/// the WebSocket equivalent, plus the channel path.
	pub fn channel_url(&self) -> std::result::Result<Url, url::ParseError> {
		let mut url = self.resolve(&self.channel_path)?;
		let scheme = match url.scheme() {
			"https" => "wss",
			_ => "ws",
		};
		// http(s) -> ws(s) stays within the special schemes, which `url` permits.
		let _ = url.set_scheme(scheme);
		Ok(url)
	}

	/// Whether `email` belongs to the configured admin fallback list.
	pub fn is_admin_email(&self, email: &str) -> bool {
		self.admin_emails.iter().any(|admin| admin.eq_ignore_ascii_case(email))
	}
}

fn parse_base_url(raw: &str) -> Result<Url> {
	let raw = raw.trim();
	if raw.is_empty() {
		return Err(Error::MissingBaseUrl);
	}
	let url = Url::parse(raw).map_err(|source| Error::InvalidBaseUrl {
		url: raw.to_string(),
		source,
	})?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(Error::InvalidValue {
			key: ENV_API_BASE_URL,
			value: raw.to_string(),
		});
	}
	Ok(url)
}
