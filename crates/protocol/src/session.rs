//! Authentication payloads and the derived session identity.

use serde::{Deserialize, Serialize};

use crate::ids::string_or_number;

/// Current-user identity held by the client.
///
/// Derived from the login or profile payload; the server stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
	pub id: String,
	pub name: String,
	pub email: String,
	pub is_admin: bool,
}

/// Identity subset of the user payload returned by login and profile calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
	#[serde(deserialize_with = "string_or_number")]
	pub id: String,
	pub name: String,
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_admin: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
}

impl AccountSummary {
	/// Role as reported by the server, if the payload carried one.
	pub fn reported_admin(&self) -> Option<bool> {
		self.is_admin
			.or_else(|| self.role.as_deref().map(|role| role.eq_ignore_ascii_case("admin")))
	}
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
	pub email: String,
	pub password: String,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
	pub name: String,
	pub email: String,
	pub password: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
	pub access_token: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<String>,
	pub user: AccountSummary,
}
