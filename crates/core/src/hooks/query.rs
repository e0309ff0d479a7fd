use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use skillswap_protocol::Envelope;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use super::{CallFuture, QueryState};

type Fetch<T, D> = Arc<dyn Fn(&D) -> CallFuture<T> + Send + Sync>;

struct Inner<T, D> {
	fetch: Fetch<T, D>,
	deps: Mutex<D>,
	state: watch::Sender<QueryState<T>>,
	latest: AtomicU64,
}

/// Request that runs on creation and again whenever its dependencies
/// change.
///
/// ```ignore
/// let client = client.clone();
/// let profile = Query::new(user_id, move |id: &String| {
///     let client = client.clone();
///     let id = id.clone();
///     async move { client.users().profile(Some(&id)).await }
/// });
/// ```
pub struct Query<T, D = ()> {
	inner: Arc<Inner<T, D>>,
}

impl<T, D> Query<T, D>
where
	T: Send + Sync + 'static,
	D: Clone + PartialEq + Send + 'static,
{
	/// Creates the handle in the loading state and issues the first fetch.
	pub fn new<F, Fut>(deps: D, fetch: F) -> Self
	where
		F: Fn(&D) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Envelope<T>> + Send + 'static,
	{
		let fetch: Fetch<T, D> = Arc::new(move |deps: &D| -> CallFuture<T> { Box::pin(fetch(deps)) });
		let query = Self {
			inner: Arc::new(Inner {
				fetch,
				deps: Mutex::new(deps),
				state: watch::Sender::new(QueryState::loading()),
				latest: AtomicU64::new(0),
			}),
		};
		query.refetch();
		query
	}

	/// Re-issues the request with the current dependencies. Any response
	/// still in flight becomes stale.
	pub fn refetch(&self) -> JoinHandle<()> {
		let inner = Arc::clone(&self.inner);
		let id = inner.latest.fetch_add(1, Ordering::SeqCst) + 1;
		let call = {
			let deps = inner.deps.lock();
			(inner.fetch)(&deps)
		};
		inner.state.send_modify(|state| {
			state.loading = true;
			state.error = None;
		});

		tokio::spawn(async move {
			let envelope = call.await;
			let applied = inner.state.send_if_modified(|state| {
				if inner.latest.load(Ordering::SeqCst) != id {
					return false;
				}
				state.settle(envelope);
				true
			});
			if !applied {
				trace!(target = "skillswap.hooks", id, "stale query response discarded");
			}
		})
	}

	/// Replaces the dependencies, refetching only if they changed.
	pub fn set_deps(&self, deps: D) -> Option<JoinHandle<()>> {
		{
			let mut current = self.inner.deps.lock();
			if *current == deps {
				return None;
			}
			*current = deps;
		}
		Some(self.refetch())
	}

	pub fn state(&self) -> QueryState<T>
	where
		T: Clone,
	{
		self.inner.state.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
		self.inner.state.subscribe()
	}
}
