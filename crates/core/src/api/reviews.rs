use serde_json::Value;
use skillswap_protocol::endpoints::{REVIEW_STATS, REVIEWS};
use skillswap_protocol::{Envelope, NewReview, Review, ReviewDirection, ReviewUpdate};

use super::path;
use crate::ApiClient;

#[derive(Debug, Clone, Copy)]
pub struct ReviewsApi<'a> {
	client: &'a ApiClient,
}

impl<'a> ReviewsApi<'a> {
	pub(crate) fn new(client: &'a ApiClient) -> Self {
		Self { client }
	}

	/// Reviews received or given, for `user_id` or the current user.
	pub async fn list(&self, direction: ReviewDirection, user_id: Option<&str>) -> Envelope<Vec<Review>> {
		let mut query = vec![("type".to_string(), direction.as_str().to_string())];
		if let Some(user_id) = user_id {
			query.push(("userId".to_string(), user_id.to_string()));
		}
		self.client.get_with_query(REVIEWS, query).await
	}

	pub async fn create(&self, review: &NewReview) -> Envelope<Review> {
		self.client.post(REVIEWS, review).await
	}

	pub async fn update(&self, review_id: &str, update: &ReviewUpdate) -> Envelope<Review> {
		self.client.put(&path(REVIEWS, &[review_id]), update).await
	}

	pub async fn delete(&self, review_id: &str) -> Envelope<Value> {
		self.client.delete(&path(REVIEWS, &[review_id])).await
	}

	pub async fn stats(&self, user_id: &str) -> Envelope<Value> {
		self.client.get(&path(REVIEW_STATS, &[user_id])).await
	}
}
