use serde_json::{Value, json};
use skillswap_protocol::endpoints::{
	FORGOT_PASSWORD, LOGIN, LOGOUT, REFRESH_TOKEN, RESET_PASSWORD, SIGNUP, USER_PROFILE, VERIFY_EMAIL,
};
use skillswap_protocol::{AccountSummary, Credentials, Envelope, LoginResponse, SignupRequest};

use crate::ApiClient;

/// `/auth/*` endpoints plus the current-account profile lookup.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
	client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
	pub(crate) fn new(client: &'a ApiClient) -> Self {
		Self { client }
	}

	pub async fn login(&self, credentials: &Credentials) -> Envelope<LoginResponse> {
		self.client.post(LOGIN, credentials).await
	}

	pub async fn signup(&self, request: &SignupRequest) -> Envelope<Value> {
		self.client.post(SIGNUP, request).await
	}

	pub async fn logout(&self) -> Envelope<Value> {
		self.client.post(LOGOUT, ()).await
	}

	pub async fn refresh_token(&self) -> Envelope<LoginResponse> {
		self.client.post(REFRESH_TOKEN, ()).await
	}

	pub async fn forgot_password(&self, email: &str) -> Envelope<Value> {
		self.client.post(FORGOT_PASSWORD, json!({ "email": email })).await
	}

	pub async fn reset_password(&self, token: &str, password: &str) -> Envelope<Value> {
		self.client
			.post(RESET_PASSWORD, json!({ "token": token, "password": password }))
			.await
	}

	pub async fn verify_email(&self, token: &str) -> Envelope<Value> {
		self.client.post(VERIFY_EMAIL, json!({ "token": token })).await
	}

	/// Account behind the stored credential.
	pub async fn profile(&self) -> Envelope<AccountSummary> {
		self.client.get(USER_PROFILE).await
	}
}
