use serde_json::Value;
use skillswap_protocol::endpoints::{NOTIFICATIONS, NOTIFICATIONS_READ_ALL};
use skillswap_protocol::{Envelope, Notification, Page};

use super::path;
use crate::ApiClient;

#[derive(Debug, Clone, Copy)]
pub struct NotificationsApi<'a> {
	client: &'a ApiClient,
}

impl<'a> NotificationsApi<'a> {
	pub(crate) fn new(client: &'a ApiClient) -> Self {
		Self { client }
	}

	pub async fn list(&self, page: u32, limit: u32) -> Envelope<Page<Notification>> {
		let query = vec![
			("page".to_string(), page.max(1).to_string()),
			("limit".to_string(), limit.to_string()),
		];
		self.client.get_with_query(NOTIFICATIONS, query).await
	}

	pub async fn mark_read(&self, notification_id: &str) -> Envelope<Value> {
		self.client
			.patch(&path(NOTIFICATIONS, &[notification_id, "read"]), ())
			.await
	}

	pub async fn mark_all_read(&self) -> Envelope<Value> {
		self.client.patch(NOTIFICATIONS_READ_ALL, ()).await
	}

	pub async fn delete(&self, notification_id: &str) -> Envelope<Value> {
		self.client.delete(&path(NOTIFICATIONS, &[notification_id])).await
	}
}
