//! Page-oriented list responses.

use serde::{Deserialize, Serialize};

/// Server-reported pagination cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
	pub page: u32,
	pub limit: u32,
	#[serde(default)]
	pub total: u64,
	#[serde(default)]
	pub total_pages: u32,
}

impl Pagination {
	/// State before any page has loaded.
	pub fn initial(limit: u32) -> Self {
		Self {
			page: 1,
			limit,
			total: 0,
			total_pages: 0,
		}
	}

	/// Fills `total_pages` from the server's `total`/`limit` when the server
	/// omitted it. A reported value is kept as-is.
	pub fn normalized(mut self) -> Self {
		if self.total_pages == 0 && self.total > 0 && self.limit > 0 {
			let pages = self.total.div_ceil(u64::from(self.limit));
			self.total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
		}
		self
	}

	pub fn has_more(&self) -> bool {
		self.page < self.total_pages
	}

	pub fn next_page(&self) -> Option<u32> {
		self.has_more().then(|| self.page + 1)
	}
}

/// One page of a list resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
	pub data: Vec<T>,
	pub pagination: Pagination,
}
