//! Marketplace resources and request bodies.

use serde::{Deserialize, Serialize};

use crate::ids::string_or_number;

/// Public user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	#[serde(deserialize_with = "string_or_number")]
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub location: Option<String>,
	#[serde(default)]
	pub profile_photo: Option<String>,
	#[serde(default)]
	pub skills_offered: Vec<String>,
	#[serde(default)]
	pub skills_wanted: Vec<String>,
	#[serde(default)]
	pub availability: Vec<String>,
	#[serde(default = "default_true")]
	pub is_public: bool,
	#[serde(default)]
	pub rating: f64,
	#[serde(default)]
	pub total_swaps: u32,
}

fn default_true() -> bool {
	true
}

/// Lifecycle of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
	Pending,
	Accepted,
	Rejected,
	Completed,
	Cancelled,
}

impl SwapStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Accepted => "accepted",
			Self::Rejected => "rejected",
			Self::Completed => "completed",
			Self::Cancelled => "cancelled",
		}
	}
}

impl std::fmt::Display for SwapStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
	#[serde(deserialize_with = "string_or_number")]
	pub id: String,
	#[serde(deserialize_with = "string_or_number")]
	pub from_user_id: String,
	#[serde(deserialize_with = "string_or_number")]
	pub to_user_id: String,
	pub skill_offered: String,
	pub skill_wanted: String,
	pub status: SwapStatus,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
	#[serde(deserialize_with = "string_or_number")]
	pub id: String,
	#[serde(deserialize_with = "string_or_number")]
	pub swap_id: String,
	#[serde(deserialize_with = "string_or_number")]
	pub reviewer_id: String,
	#[serde(deserialize_with = "string_or_number")]
	pub reviewee_id: String,
	pub rating: u8,
	#[serde(default)]
	pub comment: String,
	#[serde(default)]
	pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
	#[serde(deserialize_with = "string_or_number")]
	pub id: String,
	#[serde(rename = "type", default)]
	pub kind: String,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub read: bool,
	#[serde(default)]
	pub created_at: Option<String>,
}

/// Which side of a swap request list to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDirection {
	Sent,
	Received,
}

impl RequestDirection {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Sent => "sent",
			Self::Received => "received",
		}
	}
}

/// Which side of a review list to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDirection {
	Received,
	Given,
}

impl ReviewDirection {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Received => "received",
			Self::Given => "given",
		}
	}
}

/// Body of `POST /swap-requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSwapRequest {
	pub to_user_id: String,
	pub skill_offered: String,
	pub skill_wanted: String,
	pub message: String,
}

/// Decision sent to `PATCH /swap-requests/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapDecision {
	Accepted,
	Rejected,
}

/// Body of `POST /reviews`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
	pub swap_id: String,
	pub reviewee_id: String,
	pub rating: u8,
	pub comment: String,
}

/// Body of `PUT /reviews/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewUpdate {
	pub rating: u8,
	pub comment: String,
}

/// Filters for `GET /users/search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
	pub query: Option<String>,
	pub skills_offered: Vec<String>,
	pub skills_wanted: Vec<String>,
	pub location: Option<String>,
	pub availability: Vec<String>,
	pub min_rating: Option<f32>,
	pub page: Option<u32>,
	pub limit: Option<u32>,
}

impl SearchParams {
	/// Query string pairs; list filters repeat their key once per value.
	pub fn to_query_pairs(&self) -> Vec<(String, String)> {
		let mut pairs = Vec::new();
		if let Some(query) = &self.query {
			pairs.push(("query".to_string(), query.clone()));
		}
		for skill in &self.skills_offered {
			pairs.push(("skillsOffered".to_string(), skill.clone()));
		}
		for skill in &self.skills_wanted {
			pairs.push(("skillsWanted".to_string(), skill.clone()));
		}
		if let Some(location) = &self.location {
			pairs.push(("location".to_string(), location.clone()));
		}
		for slot in &self.availability {
			pairs.push(("availability".to_string(), slot.clone()));
		}
		if let Some(rating) = self.min_rating {
			pairs.push(("minRating".to_string(), rating.to_string()));
		}
		if let Some(page) = self.page {
			pairs.push(("page".to_string(), page.to_string()));
		}
		if let Some(limit) = self.limit {
			pairs.push(("limit".to_string(), limit.to_string()));
		}
		pairs
	}
}
