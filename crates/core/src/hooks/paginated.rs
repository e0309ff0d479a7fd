use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use skillswap_protocol::{Envelope, Page, Pagination};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use super::CallFuture;

/// Accumulated pages of a list resource.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
	pub data: Vec<T>,
	pub pagination: Pagination,
	/// First page (initial load or refresh) in flight.
	pub loading: bool,
	/// Follow-up page in flight.
	pub loading_more: bool,
	pub error: Option<String>,
}

impl<T> PageState<T> {
	pub fn has_more(&self) -> bool {
		self.pagination.has_more()
	}
}

type PageFetch<T> = Arc<dyn Fn(u32, u32) -> CallFuture<Page<T>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Load {
	Replace,
	Append,
}

struct Inner<T> {
	fetch: PageFetch<T>,
	limit: u32,
	state: watch::Sender<PageState<T>>,
	/// Bumped by every first-page load; appends from an older generation
	/// are discarded.
	generation: AtomicU64,
}

/// Page-by-page list loader.
pub struct PaginatedQuery<T> {
	inner: Arc<Inner<T>>,
}

impl<T> PaginatedQuery<T>
where
	T: Send + Sync + 'static,
{
	/// Creates the handle and loads page 1. `fetch` receives `(page, limit)`.
	pub fn new<F, Fut>(limit: u32, fetch: F) -> Self
	where
		F: Fn(u32, u32) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Envelope<Page<T>>> + Send + 'static,
	{
		let fetch: PageFetch<T> = Arc::new(move |page, limit| -> CallFuture<Page<T>> { Box::pin(fetch(page, limit)) });
		let query = Self {
			inner: Arc::new(Inner {
				fetch,
				limit,
				state: watch::Sender::new(PageState {
					data: Vec::new(),
					pagination: Pagination::initial(limit),
					loading: true,
					loading_more: false,
					error: None,
				}),
				generation: AtomicU64::new(0),
			}),
		};
		query.refresh();
		query
	}

	/// Fetches the next page and appends it. Returns `None` without
	/// fetching while any load is in flight or when the last page is
	/// already loaded.
	pub fn load_more(&self) -> Option<JoinHandle<()>> {
		let mut next = None;
		self.inner.state.send_if_modified(|state| {
			if state.loading || state.loading_more || !state.has_more() {
				return false;
			}
			state.loading_more = true;
			state.error = None;
			next = Some(state.pagination.page + 1);
			true
		});
		next.map(|page| self.spawn(page, Load::Append))
	}

	/// Reloads page 1, replacing everything accumulated so far.
	pub fn refresh(&self) -> JoinHandle<()> {
		self.spawn(1, Load::Replace)
	}

	pub fn has_more(&self) -> bool {
		self.inner.state.borrow().has_more()
	}

	pub fn state(&self) -> PageState<T>
	where
		T: Clone,
	{
		self.inner.state.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<PageState<T>> {
		self.inner.state.subscribe()
	}

	fn spawn(&self, page: u32, load: Load) -> JoinHandle<()> {
		let inner = Arc::clone(&self.inner);
		let generation = match load {
			Load::Replace => {
				let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
				inner.state.send_modify(|state| {
					state.loading = true;
					state.error = None;
				});
				generation
			}
			Load::Append => inner.generation.load(Ordering::SeqCst),
		};
		let call = (inner.fetch)(page, inner.limit);

		tokio::spawn(async move {
			let envelope = call.await;
			let applied = inner.state.send_if_modified(|state| {
				if inner.generation.load(Ordering::SeqCst) != generation {
					return false;
				}
				if load == Load::Replace {
					state.loading = false;
				}
				state.loading_more = false;
				match envelope.into_result() {
					Ok(Page { data, pagination }) => {
						match load {
							Load::Replace => state.data = data,
							Load::Append => state.data.extend(data),
						}
						state.pagination = pagination.normalized();
					}
					Err(error) => state.error = Some(error),
				}
				true
			});
			if !applied {
				trace!(target = "skillswap.hooks", page, "stale page discarded");
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Serves `total` integers in pages, like a list endpoint would.
	fn numbers(total: u64) -> impl Fn(u32, u32) -> std::future::Ready<Envelope<Page<u64>>> + Send + Sync + 'static {
		move |page, limit| {
			let start = u64::from(page - 1) * u64::from(limit);
			let end = (start + u64::from(limit)).min(total);
			std::future::ready(Envelope::ok(Page {
				data: (start..end).collect(),
				pagination: Pagination {
					page,
					limit,
					total,
					total_pages: 0,
				},
			}))
		}
	}

	async fn settled(query: &PaginatedQuery<u64>) {
		query
			.subscribe()
			.wait_for(|s| !s.loading && !s.loading_more)
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn accumulates_pages_until_exhausted() {
		let query = PaginatedQuery::new(10, numbers(25));
		settled(&query).await;
		assert_eq!(query.state().data.len(), 10);
		assert!(query.has_more());

		query.load_more().unwrap().await.unwrap();
		query.load_more().unwrap().await.unwrap();

		let state = query.state();
		assert_eq!(state.data, (0..25).collect::<Vec<_>>());
		assert_eq!(state.pagination.page, 3);
		assert_eq!(state.pagination.total_pages, 3);
		assert!(!state.has_more());
		assert!(query.load_more().is_none());
	}

	#[tokio::test]
	async fn load_more_is_ignored_while_loading() {
		let query = PaginatedQuery::new(10, numbers(25));
		// Initial page still in flight.
		assert!(query.load_more().is_none());
		settled(&query).await;

		let handle = query.load_more().unwrap();
		assert!(query.load_more().is_none());
		handle.await.unwrap();
	}

	#[tokio::test]
	async fn refresh_replaces_accumulated_data() {
		let query = PaginatedQuery::new(10, numbers(25));
		settled(&query).await;
		query.load_more().unwrap().await.unwrap();
		assert_eq!(query.state().data.len(), 20);

		query.refresh().await.unwrap();
		let state = query.state();
		assert_eq!(state.data.len(), 10);
		assert_eq!(state.pagination.page, 1);
	}

	#[tokio::test]
	async fn failed_page_keeps_data_and_records_error() {
		let query: PaginatedQuery<u64> = PaginatedQuery::new(10, |page, limit| {
			let result = if page == 1 {
				numbers(25)(page, limit).into_inner()
			} else {
				Envelope::failure("server down")
			};
			std::future::ready(result)
		});
		settled(&query).await;
		query.load_more().unwrap().await.unwrap();

		let state = query.state();
		assert_eq!(state.data.len(), 10);
		assert_eq!(state.error.as_deref(), Some("server down"));
		assert!(state.has_more());
	}
}
