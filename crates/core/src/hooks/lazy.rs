use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use skillswap_protocol::Envelope;
use tokio::sync::watch;

use super::QueryState;
use crate::{Error, Result};

/// Request that runs only when [`execute`](Self::execute) is called.
///
/// Unlike the other handles, `execute` also returns the outcome so callers
/// can react to it directly; a failure comes back as [`Error::Api`].
pub struct LazyQuery<T> {
	state: watch::Sender<QueryState<T>>,
	latest: AtomicU64,
}

impl<T> Default for LazyQuery<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> LazyQuery<T> {
	pub fn new() -> Self {
		Self {
			state: watch::Sender::new(QueryState::default()),
			latest: AtomicU64::new(0),
		}
	}

	pub async fn execute<F>(&self, call: F) -> Result<T>
	where
		F: Future<Output = Envelope<T>>,
		T: Clone,
	{
		let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
		self.state.send_modify(|state| {
			state.loading = true;
			state.error = None;
		});

		let result = call.await.into_result();
		self.state.send_if_modified(|state| {
			if self.latest.load(Ordering::SeqCst) != id {
				return false;
			}
			state.loading = false;
			match &result {
				Ok(data) => state.data = Some(data.clone()),
				Err(error) => state.error = Some(error.clone()),
			}
			true
		});
		result.map_err(Error::Api)
	}

	/// Back to the idle state; any call in flight becomes stale.
	pub fn reset(&self) {
		self.latest.fetch_add(1, Ordering::SeqCst);
		self.state.send_replace(QueryState::default());
	}

	pub fn state(&self) -> QueryState<T>
	where
		T: Clone,
	{
		self.state.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
		self.state.subscribe()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn idle_until_executed() {
		let lazy: LazyQuery<u8> = LazyQuery::new();
		assert_eq!(lazy.state(), QueryState::default());

		assert_eq!(lazy.execute(async { Envelope::ok(9) }).await.unwrap(), 9);
		assert_eq!(lazy.state().data, Some(9));
	}

	#[tokio::test]
	async fn failure_raises_and_is_recorded() {
		let lazy: LazyQuery<u8> = LazyQuery::new();
		let err = lazy
			.execute(async { Envelope::failure("Invalid credentials") })
			.await
			.unwrap_err();
		assert_eq!(err.api_message(), Some("Invalid credentials"));
		let state = lazy.state();
		assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
		assert!(!state.loading);
	}

	#[tokio::test]
	async fn reset_clears_state() {
		let lazy: LazyQuery<u8> = LazyQuery::new();
		lazy.execute(async { Envelope::ok(1) }).await.unwrap();
		lazy.reset();
		assert_eq!(lazy.state(), QueryState::default());
	}
}
