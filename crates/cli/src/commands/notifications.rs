use anyhow::{Context, Result};
use skillswap::hooks::{PageState, PaginatedQuery};
use skillswap_protocol::Notification;
use tracing::{debug, warn};

use crate::context::CommandContext;
use crate::output::{CommandResult, ErrorCode, ResultBuilder};

/// Lists notifications page by page; with `all`, keeps loading until the
/// server reports no further pages.
pub async fn notifications(
	ctx: &CommandContext,
	limit: Option<u32>,
	all: bool,
	mark_read: bool,
) -> Result<CommandResult<Vec<Notification>>> {
	let limit = limit.unwrap_or(ctx.config().pagination_limit);
	let client = ctx.client.clone();
	let query = PaginatedQuery::new(limit, move |page, limit| {
		let client = client.clone();
		async move { client.notifications().list(page, limit).await }
	});

	let state = if all { load_all(&query).await? } else { settled(&query).await? };

	if let Some(error) = state.error {
		return Ok(ResultBuilder::new("notifications").error(ErrorCode::ApiError, error).build());
	}

	let mut builder = ResultBuilder::new("notifications");
	if mark_read {
		match ctx.client.notifications().mark_all_read().await.into_result() {
			Ok(_) => builder = builder.message("All notifications marked read"),
			Err(error) => warn!(target = "skillswap", %error, "failed to mark notifications read"),
		}
	}
	Ok(builder.data(state.data).build())
}

/// Loads pages until none remain, an error occurs, or the server stops
/// advancing the page number.
async fn load_all(query: &PaginatedQuery<Notification>) -> Result<PageState<Notification>> {
	let mut state = settled(query).await?;
	while state.error.is_none() {
		let previous = state.pagination.page;
		let Some(next) = query.load_more() else {
			break;
		};
		next.await.context("page loader task failed")?;
		state = query.state();
		debug!(target = "skillswap", loaded = state.data.len(), page = state.pagination.page, "page loaded");
		if state.pagination.page <= previous {
			warn!(target = "skillswap", page = state.pagination.page, "server repeated a page; stopping");
			break;
		}
	}
	Ok(state)
}

async fn settled(query: &PaginatedQuery<Notification>) -> Result<PageState<Notification>> {
	let mut rx = query.subscribe();
	let state = rx.wait_for(|s| !s.loading).await.context("page loader stopped")?;
	Ok(state.clone())
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicU32, Ordering};

	use skillswap::{Envelope, Page, Pagination};

	use super::*;

	fn note(id: u32) -> Notification {
		Notification {
			id: id.to_string(),
			kind: "swap".into(),
			title: None,
			message: format!("note {id}"),
			read: false,
			created_at: None,
		}
	}

	#[tokio::test]
	async fn load_all_stops_when_the_page_does_not_advance() {
		let calls = Arc::new(AtomicU32::new(0));
		let counter = Arc::clone(&calls);
		// Ignores the requested page and always answers page 1 of 3.
		let query = PaginatedQuery::new(2, move |_page, limit| {
			let call = counter.fetch_add(1, Ordering::SeqCst);
			async move {
				Envelope::ok(Page {
					data: vec![note(call)],
					pagination: Pagination {
						page: 1,
						limit,
						total: 6,
						total_pages: 3,
					},
				})
			}
		});

		let state = load_all(&query).await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 2);
		assert_eq!(state.data.len(), 2);
	}

	#[tokio::test]
	async fn load_all_walks_to_the_last_page() {
		let query = PaginatedQuery::new(2, |page, limit| async move {
			Envelope::ok(Page {
				data: vec![note(page)],
				pagination: Pagination {
					page,
					limit,
					total: 6,
					total_pages: 3,
				},
			})
		});

		let state = load_all(&query).await.unwrap();
		let ids: Vec<_> = state.data.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["1", "2", "3"]);
		assert!(!state.has_more());
	}
}
