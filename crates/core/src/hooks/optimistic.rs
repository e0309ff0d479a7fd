use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use skillswap_protocol::Envelope;
use tokio::sync::watch;

/// Value shown ahead of server confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticState<T> {
	pub value: Option<T>,
	/// True only while the confirming call is in flight.
	pub is_optimistic: bool,
}

impl<T> Default for OptimisticState<T> {
	fn default() -> Self {
		Self {
			value: None,
			is_optimistic: false,
		}
	}
}

/// Applies a value immediately, then confirms or rolls it back.
pub struct Optimistic<T> {
	state: watch::Sender<OptimisticState<T>>,
	latest: AtomicU64,
}

impl<T> Default for Optimistic<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Optimistic<T> {
	pub fn new() -> Self {
		Self {
			state: watch::Sender::new(OptimisticState::default()),
			latest: AtomicU64::new(0),
		}
	}

	/// Shows `value` at once and runs `call`. On success the value is kept
	/// and `on_success` receives the response; on failure the value is
	/// rolled back to absent and `on_error` receives the message. A newer
	/// `perform` supersedes this one's effect on the state, but callbacks
	/// always run.
	pub async fn perform<R, F, S, E>(&self, value: T, call: F, on_success: S, on_error: E)
	where
		F: Future<Output = Envelope<R>>,
		S: FnOnce(R),
		E: FnOnce(String),
	{
		let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
		self.state.send_replace(OptimisticState {
			value: Some(value),
			is_optimistic: true,
		});

		let result = call.await.into_result();
		let failed = result.is_err();
		self.state.send_if_modified(|state| {
			if self.latest.load(Ordering::SeqCst) != id {
				return false;
			}
			state.is_optimistic = false;
			if failed {
				state.value = None;
			}
			true
		});

		match result {
			Ok(response) => on_success(response),
			Err(error) => on_error(error),
		}
	}

	/// Drops the displayed value.
	pub fn clear(&self) {
		self.latest.fetch_add(1, Ordering::SeqCst);
		self.state.send_replace(OptimisticState::default());
	}

	pub fn state(&self) -> OptimisticState<T>
	where
		T: Clone,
	{
		self.state.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<OptimisticState<T>> {
		self.state.subscribe()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use parking_lot::Mutex;
	use tokio::sync::oneshot;

	use super::*;

	#[tokio::test]
	async fn value_is_visible_while_in_flight_and_kept_on_success() {
		let optimistic = Arc::new(Optimistic::new());
		let (release, gate) = oneshot::channel::<()>();
		let confirmed = Arc::new(Mutex::new(None));

		let task = tokio::spawn({
			let optimistic = Arc::clone(&optimistic);
			let confirmed = Arc::clone(&confirmed);
			async move {
				optimistic
					.perform(
						"X",
						async move {
							let _ = gate.await;
							Envelope::ok(42)
						},
						move |n| *confirmed.lock() = Some(n),
						|_| panic!("unexpected failure"),
					)
					.await;
			}
		});

		let mut rx = optimistic.subscribe();
		rx.wait_for(|s| s.is_optimistic).await.unwrap();
		assert_eq!(optimistic.state().value, Some("X"));

		release.send(()).unwrap();
		task.await.unwrap();
		assert_eq!(optimistic.state(), OptimisticState { value: Some("X"), is_optimistic: false });
		assert_eq!(*confirmed.lock(), Some(42));
	}

	#[tokio::test]
	async fn failure_rolls_back_and_reports() {
		let optimistic = Optimistic::new();
		let mut reported = None;
		optimistic
			.perform(
				"X",
				async { Envelope::<()>::failure("conflict") },
				|_| panic!("unexpected success"),
				|error| reported = Some(error),
			)
			.await;

		assert_eq!(reported.as_deref(), Some("conflict"));
		assert_eq!(optimistic.state(), OptimisticState { value: None, is_optimistic: false });
	}
}
