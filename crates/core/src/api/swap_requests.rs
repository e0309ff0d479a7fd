use serde_json::{Value, json};
use skillswap_protocol::endpoints::SWAP_REQUESTS;
use skillswap_protocol::{Envelope, NewSwapRequest, RequestDirection, SwapDecision, SwapRequest, SwapStatus};

use super::path;
use crate::ApiClient;

#[derive(Debug, Clone, Copy)]
pub struct SwapRequestsApi<'a> {
	client: &'a ApiClient,
}

impl<'a> SwapRequestsApi<'a> {
	pub(crate) fn new(client: &'a ApiClient) -> Self {
		Self { client }
	}

	/// Requests the current user sent or received, optionally by status.
	pub async fn list(&self, direction: RequestDirection, status: Option<SwapStatus>) -> Envelope<Vec<SwapRequest>> {
		let mut query = vec![("type".to_string(), direction.as_str().to_string())];
		if let Some(status) = status {
			query.push(("status".to_string(), status.as_str().to_string()));
		}
		self.client.get_with_query(SWAP_REQUESTS, query).await
	}

	pub async fn create(&self, request: &NewSwapRequest) -> Envelope<SwapRequest> {
		self.client.post(SWAP_REQUESTS, request).await
	}

	pub async fn update_status(&self, request_id: &str, decision: SwapDecision) -> Envelope<SwapRequest> {
		self.client
			.patch(&path(SWAP_REQUESTS, &[request_id, "status"]), json!({ "status": decision }))
			.await
	}

	pub async fn get(&self, request_id: &str) -> Envelope<SwapRequest> {
		self.client.get(&path(SWAP_REQUESTS, &[request_id])).await
	}

	pub async fn delete(&self, request_id: &str) -> Envelope<Value> {
		self.client.delete(&path(SWAP_REQUESTS, &[request_id])).await
	}
}
