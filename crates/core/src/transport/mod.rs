//! HTTP request layer.
//!
//! [`ApiClient`] resolves endpoints against the configured base URL, attaches
//! the stored bearer credential and folds every outcome (success, server
//! error, network failure, malformed body) into an [`Envelope`]. Callers
//! never see a transport-level `Err`.

mod response;

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use skillswap_protocol::Envelope;
use skillswap_runtime::{Config, CredentialStore, StorageKey};
use tracing::{debug, warn};

use crate::Result;
use crate::api::{AuthApi, NotificationsApi, ReviewsApi, SwapRequestsApi, UploadApi, UsersApi};

pub(crate) use response::normalize;

/// Request payload.
#[derive(Debug, Default)]
pub enum Body {
	#[default]
	Empty,
	/// Serialized as JSON with an `application/json` content type.
	Json(Value),
	/// Sent as `multipart/form-data`; the boundary header is left to the
	/// HTTP client.
	Multipart(Form),
}

impl Body {
	/// JSON body from any serializable value; `null` becomes [`Body::Empty`].
	pub fn json<B: Serialize>(value: B) -> serde_json::Result<Self> {
		Ok(match serde_json::to_value(value)? {
			Value::Null => Self::Empty,
			other => Self::Json(other),
		})
	}
}

/// Per-call options for [`ApiClient::request`].
#[derive(Debug)]
pub struct RequestOptions {
	pub method: Method,
	pub body: Body,
	/// Extra headers; a caller-supplied `Authorization` suppresses the
	/// stored credential.
	pub headers: HeaderMap,
	/// Query pairs, appended in order. Repeat a key for list filters.
	pub query: Vec<(String, String)>,
}

impl Default for RequestOptions {
	fn default() -> Self {
		Self::new(Method::GET)
	}
}

impl RequestOptions {
	pub fn new(method: Method) -> Self {
		Self {
			method,
			body: Body::Empty,
			headers: HeaderMap::new(),
			query: Vec::new(),
		}
	}

	pub fn body(mut self, body: Body) -> Self {
		self.body = body;
		self
	}

	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.query
			.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
		self
	}
}

/// Cheaply cloneable handle to the shared HTTP client.
#[derive(Debug, Clone)]
pub struct ApiClient {
	inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
	http: reqwest::Client,
	config: Config,
	store: Arc<dyn CredentialStore>,
}

impl ApiClient {
	/// Builds the client with the configured timeout and a user agent of
	/// `{app_name}/{app_version}`.
	pub fn new(config: Config, store: Arc<dyn CredentialStore>) -> Result<Self> {
		let mut headers = HeaderMap::new();
		if let Ok(agent) = HeaderValue::from_str(&format!("{}/{}", config.app_name, config.app_version)) {
			headers.insert(USER_AGENT, agent);
		}
		let http = reqwest::Client::builder()
			.timeout(config.request_timeout)
			.default_headers(headers)
			.build()?;
		Ok(Self {
			inner: Arc::new(ClientInner { http, config, store }),
		})
	}

	pub fn config(&self) -> &Config {
		&self.inner.config
	}

	pub fn store(&self) -> &Arc<dyn CredentialStore> {
		&self.inner.store
	}

	/// Currently stored bearer credential.
	pub fn credential(&self) -> Option<String> {
		self.inner.store.get(StorageKey::AuthToken)
	}

	/// Drops every stored credential. Storage failures are logged, not raised,
	/// so sign-out always completes.
	pub fn clear_credentials(&self) {
		if let Err(err) = self.inner.store.clear() {
			warn!(target = "skillswap.storage", error = %err, "failed to clear stored credentials");
		}
	}

	/// Performs one request and normalizes the outcome.
	pub async fn request<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Envelope<T> {
		let RequestOptions {
			method,
			body,
			mut headers,
			query,
		} = options;

		let url = match self.inner.config.resolve(endpoint) {
			Ok(url) => url,
			Err(err) => {
				warn!(target = "skillswap.transport", endpoint, error = %err, "cannot resolve endpoint");
				return Envelope::failure(format!("invalid endpoint {endpoint}: {err}"));
			}
		};

		if !headers.contains_key(AUTHORIZATION) {
			if let Some(token) = self.credential() {
				match HeaderValue::from_str(&format!("Bearer {token}")) {
					Ok(value) => {
						headers.insert(AUTHORIZATION, value);
					}
					Err(_) => warn!(target = "skillswap.transport", "stored credential is not a valid header value; sending unauthenticated"),
				}
			}
		}

		debug!(target = "skillswap.transport", %method, %url, "sending request");

		let mut builder = self.inner.http.request(method.clone(), url.clone());
		if !query.is_empty() {
			builder = builder.query(&query);
		}
		builder = match body {
			Body::Empty => builder.headers(headers),
			Body::Json(value) => builder.headers(headers).json(&value),
			Body::Multipart(form) => {
				headers.remove(CONTENT_TYPE);
				builder.headers(headers).multipart(form)
			}
		};

		let response = match builder.send().await {
			Ok(response) => response,
			Err(err) => {
				warn!(target = "skillswap.transport", %method, %url, error = %err, "request failed");
				return Envelope::failure(describe_transport_error(&err));
			}
		};

		let status = response.status();
		let is_json = response
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.is_some_and(|value| value.contains("json"));

		let bytes = match response.bytes().await {
			Ok(bytes) => bytes,
			Err(err) => {
				warn!(target = "skillswap.transport", %method, %url, error = %err, "failed to read response body");
				return Envelope::failure(describe_transport_error(&err));
			}
		};

		let envelope = normalize(status, is_json, &bytes);
		if envelope.is_success() {
			debug!(target = "skillswap.transport", %method, %url, status = status.as_u16(), "request succeeded");
		} else {
			warn!(
				target = "skillswap.transport",
				%method,
				%url,
				status = status.as_u16(),
				error = envelope.error().unwrap_or_default(),
				"request returned failure"
			);
		}
		envelope
	}

	pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Envelope<T> {
		self.request(endpoint, RequestOptions::new(Method::GET)).await
	}

	pub async fn get_with_query<T: DeserializeOwned>(
		&self,
		endpoint: &str,
		query: Vec<(String, String)>,
	) -> Envelope<T> {
		self.request(endpoint, RequestOptions::new(Method::GET).query(query))
			.await
	}

	/// POST with a JSON body; pass `()` for an empty body.
	pub async fn post<T: DeserializeOwned>(&self, endpoint: &str, body: impl Serialize) -> Envelope<T> {
		self.send_json(Method::POST, endpoint, body).await
	}

	pub async fn put<T: DeserializeOwned>(&self, endpoint: &str, body: impl Serialize) -> Envelope<T> {
		self.send_json(Method::PUT, endpoint, body).await
	}

	pub async fn patch<T: DeserializeOwned>(&self, endpoint: &str, body: impl Serialize) -> Envelope<T> {
		self.send_json(Method::PATCH, endpoint, body).await
	}

	pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Envelope<T> {
		self.request(endpoint, RequestOptions::new(Method::DELETE)).await
	}

	/// POST a multipart form.
	pub async fn upload<T: DeserializeOwned>(&self, endpoint: &str, form: Form) -> Envelope<T> {
		self.request(endpoint, RequestOptions::new(Method::POST).body(Body::Multipart(form)))
			.await
	}

	pub fn auth(&self) -> AuthApi<'_> {
		AuthApi::new(self)
	}

	pub fn users(&self) -> UsersApi<'_> {
		UsersApi::new(self)
	}

	pub fn swap_requests(&self) -> SwapRequestsApi<'_> {
		SwapRequestsApi::new(self)
	}

	pub fn reviews(&self) -> ReviewsApi<'_> {
		ReviewsApi::new(self)
	}

	pub fn notifications(&self) -> NotificationsApi<'_> {
		NotificationsApi::new(self)
	}

	pub fn uploads(&self) -> UploadApi<'_> {
		UploadApi::new(self)
	}

	async fn send_json<T: DeserializeOwned>(&self, method: Method, endpoint: &str, body: impl Serialize) -> Envelope<T> {
		let body = match Body::json(body) {
			Ok(body) => body,
			Err(err) => return Envelope::failure(format!("failed to encode request body: {err}")),
		};
		self.request(endpoint, RequestOptions::new(method).body(body)).await
	}
}

fn describe_transport_error(err: &reqwest::Error) -> String {
	if err.is_timeout() {
		"request timed out".to_string()
	} else if err.is_connect() {
		format!("could not reach server: {err}")
	} else {
		err.to_string()
	}
}
