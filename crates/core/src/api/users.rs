use serde::Serialize;
use serde_json::Value;
use skillswap_protocol::endpoints::{USER_PROFILE, USER_SEARCH, USERS};
use skillswap_protocol::{Envelope, Page, SearchParams, User};

use super::path;
use crate::ApiClient;

#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a> {
	client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
	pub(crate) fn new(client: &'a ApiClient) -> Self {
		Self { client }
	}

	/// Own profile, or another user's public profile when `user_id` is given.
	pub async fn profile(&self, user_id: Option<&str>) -> Envelope<User> {
		match user_id {
			Some(id) => self.client.get(&path(USER_PROFILE, &[id])).await,
			None => self.client.get(USER_PROFILE).await,
		}
	}

	/// Partial update; only the fields present in `changes` are sent.
	pub async fn update_profile(&self, changes: impl Serialize) -> Envelope<User> {
		self.client.put(USER_PROFILE, changes).await
	}

	pub async fn search(&self, params: &SearchParams) -> Envelope<Page<User>> {
		self.client
			.get_with_query(USER_SEARCH, params.to_query_pairs())
			.await
	}

	pub async fn stats(&self, user_id: &str) -> Envelope<Value> {
		self.client.get(&path(USERS, &[user_id, "stats"])).await
	}
}
