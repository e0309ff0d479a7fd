//! Observable data-loading handles.
//!
//! Each handle owns its state in a [`tokio::sync::watch`] channel: read a
//! snapshot with `state()` or `subscribe()` to be woken on every change.
//! Requests are tagged with a monotonically increasing id and a response
//! is applied only if no newer request was issued since, so a slow stale
//! response can never overwrite fresher data.
//!
//! Handles that fetch on their own (`Query`, `PaginatedQuery`,
//! `DebouncedQuery`) spawn onto the current Tokio runtime.

mod debounced;
mod lazy;
mod optimistic;
mod paginated;
mod query;

use std::future::Future;
use std::pin::Pin;

use skillswap_protocol::Envelope;

pub use debounced::{DEFAULT_DEBOUNCE, DebouncedQuery, DebouncedState};
pub use lazy::LazyQuery;
pub use optimistic::{Optimistic, OptimisticState};
pub use paginated::{PageState, PaginatedQuery};
pub use query::Query;

/// Boxed request future stored by handles that re-issue calls.
pub type CallFuture<T> = Pin<Box<dyn Future<Output = Envelope<T>> + Send>>;

/// Snapshot of a single-value request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
	pub data: Option<T>,
	pub loading: bool,
	pub error: Option<String>,
}

impl<T> Default for QueryState<T> {
	fn default() -> Self {
		Self {
			data: None,
			loading: false,
			error: None,
		}
	}
}

impl<T> QueryState<T> {
	pub(crate) fn loading() -> Self {
		Self {
			loading: true,
			..Self::default()
		}
	}

	/// Records a settled response: data replaces data, an error replaces
	/// the error and leaves the previous data in place.
	pub(crate) fn settle(&mut self, envelope: Envelope<T>) {
		self.loading = false;
		match envelope.into_result() {
			Ok(data) => {
				self.data = Some(data);
				self.error = None;
			}
			Err(error) => self.error = Some(error),
		}
	}
}
