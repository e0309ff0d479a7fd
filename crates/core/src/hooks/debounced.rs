use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use skillswap_protocol::Envelope;
use skillswap_runtime::Config;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use super::CallFuture;

/// Settle time used by [`DebouncedQuery::new`].
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Snapshot of a debounced search.
#[derive(Debug, Clone, PartialEq)]
pub struct DebouncedState<T> {
	/// Latest query text, applied immediately.
	pub query: String,
	pub data: Option<T>,
	pub loading: bool,
	pub error: Option<String>,
}

impl<T> Default for DebouncedState<T> {
	fn default() -> Self {
		Self {
			query: String::new(),
			data: None,
			loading: false,
			error: None,
		}
	}
}

type SearchFetch<T> = Arc<dyn Fn(String) -> CallFuture<T> + Send + Sync>;

struct Inner<T> {
	fetch: SearchFetch<T>,
	delay: Duration,
	state: watch::Sender<DebouncedState<T>>,
	latest: AtomicU64,
}

/// Search that fires once the query text has been stable for the debounce
/// delay. Each new query cancels the pending one; an empty (or all
/// whitespace) query clears results without calling the server.
pub struct DebouncedQuery<T> {
	inner: Arc<Inner<T>>,
	pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T> DebouncedQuery<T>
where
	T: Send + Sync + 'static,
{
	pub fn new<F, Fut>(fetch: F) -> Self
	where
		F: Fn(String) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Envelope<T>> + Send + 'static,
	{
		Self::with_delay(DEFAULT_DEBOUNCE, fetch)
	}

	/// Uses the configured debounce delay.
	pub fn from_config<F, Fut>(config: &Config, fetch: F) -> Self
	where
		F: Fn(String) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Envelope<T>> + Send + 'static,
	{
		Self::with_delay(config.debounce_delay, fetch)
	}

	pub fn with_delay<F, Fut>(delay: Duration, fetch: F) -> Self
	where
		F: Fn(String) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Envelope<T>> + Send + 'static,
	{
		let fetch: SearchFetch<T> = Arc::new(move |query| -> CallFuture<T> { Box::pin(fetch(query)) });
		Self {
			inner: Arc::new(Inner {
				fetch,
				delay,
				state: watch::Sender::new(DebouncedState::default()),
				latest: AtomicU64::new(0),
			}),
			pending: Mutex::new(None),
		}
	}

	pub fn set_query(&self, query: impl Into<String>) {
		let query = query.into();
		let id = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;
		let mut pending = self.pending.lock();
		if let Some(task) = pending.take() {
			task.abort();
		}

		if query.trim().is_empty() {
			self.inner.state.send_modify(|state| {
				state.query = query;
				state.data = None;
				state.loading = false;
				state.error = None;
			});
			return;
		}

		self.inner.state.send_modify(|state| state.query.clone_from(&query));
		let inner = Arc::clone(&self.inner);
		*pending = Some(tokio::spawn(async move {
			tokio::time::sleep(inner.delay).await;
			inner.state.send_modify(|state| {
				state.loading = true;
				state.error = None;
			});
			trace!(target = "skillswap.hooks", id, "debounced query fired");

			let envelope = (inner.fetch)(query).await;
			inner.state.send_if_modified(|state| {
				if inner.latest.load(Ordering::SeqCst) != id {
					return false;
				}
				state.loading = false;
				match envelope.into_result() {
					Ok(data) => state.data = Some(data),
					Err(error) => state.error = Some(error),
				}
				true
			});
		}));
	}

	pub fn state(&self) -> DebouncedState<T>
	where
		T: Clone,
	{
		self.inner.state.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<DebouncedState<T>> {
		self.inner.state.subscribe()
	}
}

impl<T> Drop for DebouncedQuery<T> {
	fn drop(&mut self) {
		if let Some(task) = self.pending.lock().take() {
			task.abort();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn recording() -> (Arc<Mutex<Vec<String>>>, DebouncedQuery<String>) {
		let calls = Arc::new(Mutex::new(Vec::new()));
		let log = Arc::clone(&calls);
		let query = DebouncedQuery::new(move |q: String| {
			log.lock().push(q.clone());
			async move { Envelope::ok(format!("results for {q}")) }
		});
		(calls, query)
	}

	#[tokio::test(start_paused = true)]
	async fn only_the_settled_query_is_sent() {
		let (calls, query) = recording();
		query.set_query("a");
		tokio::time::sleep(Duration::from_millis(100)).await;
		query.set_query("ab");
		tokio::time::sleep(Duration::from_millis(400)).await;

		assert_eq!(*calls.lock(), vec!["ab".to_string()]);
		let state = query.state();
		assert_eq!(state.query, "ab");
		assert_eq!(state.data.as_deref(), Some("results for ab"));
		assert!(!state.loading);
	}

	#[tokio::test(start_paused = true)]
	async fn blank_query_clears_without_calling() {
		let (calls, query) = recording();
		query.set_query("rust");
		tokio::time::sleep(Duration::from_millis(400)).await;
		assert!(query.state().data.is_some());

		query.set_query("   ");
		tokio::time::sleep(Duration::from_millis(400)).await;
		assert_eq!(calls.lock().len(), 1);
		let state = query.state();
		assert_eq!(state.data, None);
		assert!(!state.loading);
	}

	#[tokio::test(start_paused = true)]
	async fn configured_delay_drives_the_timer() {
		let mut config = Config::new("http://127.0.0.1:8000/api").unwrap();
		config.debounce_delay = Duration::from_millis(1000);
		let calls = Arc::new(Mutex::new(Vec::new()));
		let log = Arc::clone(&calls);
		let query = DebouncedQuery::from_config(&config, move |q: String| {
			log.lock().push(q.clone());
			async move { Envelope::ok(q) }
		});

		query.set_query("slow");
		tokio::time::sleep(Duration::from_millis(500)).await;
		assert!(calls.lock().is_empty());
		tokio::time::sleep(Duration::from_millis(600)).await;
		assert_eq!(*calls.lock(), vec!["slow".to_string()]);
	}

	#[tokio::test(start_paused = true)]
	async fn dropping_cancels_pending_call() {
		let (calls, query) = recording();
		query.set_query("gone");
		drop(query);
		tokio::time::sleep(Duration::from_secs(1)).await;
		assert!(calls.lock().is_empty());
	}
}
