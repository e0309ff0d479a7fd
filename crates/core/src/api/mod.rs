//! Typed wrappers over the backend resource endpoints.
//!
//! Each wrapper borrows the [`ApiClient`](crate::ApiClient) and returns an
//! [`Envelope`](skillswap_protocol::Envelope); none of them raise.
//! Obtain them through the client: `client.users().search(&params)`.

mod auth;
mod notifications;
mod reviews;
mod swap_requests;
mod upload;
mod users;

pub use auth::AuthApi;
pub use notifications::NotificationsApi;
pub use reviews::ReviewsApi;
pub use swap_requests::SwapRequestsApi;
pub use upload::{UploadApi, UploadFile};
pub use users::UsersApi;

/// Joins path segments under a resource root, e.g. `/reviews` + `42`.
pub(crate) fn path(root: &str, segments: &[&str]) -> String {
	let mut path = root.to_string();
	for segment in segments {
		path.push('/');
		path.push_str(segment);
	}
	path
}
