//! In-process mock of the SkillSwap backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, Query, RawQuery};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use skillswap::ApiClient;
use skillswap_runtime::{Config, CredentialStore, MemoryStore};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const VALID_TOKEN: &str = "tok1";
pub const EXPIRED_TOKEN: &str = "tok-expired";

pub struct TestServer {
	addr: SocketAddr,
	handle: JoinHandle<()>,
}

impl TestServer {
	pub async fn start() -> Self {
		Self::with_router(backend()).await
	}

	pub async fn with_router(router: Router) -> Self {
		init_tracing();
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let handle = tokio::spawn(async move {
			axum::serve(listener, router).await.unwrap();
		});
		Self { addr, handle }
	}

	/// Base URL including the `/api` prefix.
	pub fn url(&self) -> String {
		format!("http://{}/api", self.addr)
	}

	pub fn config(&self) -> Config {
		Config::new(&self.url()).unwrap()
	}

	pub fn client(&self, store: Arc<dyn CredentialStore>) -> ApiClient {
		ApiClient::new(self.config(), store).unwrap()
	}

	pub fn anonymous_client(&self) -> ApiClient {
		self.client(Arc::new(MemoryStore::new()))
	}

	pub fn shutdown(self) {
		self.handle.abort();
	}
}

/// Routes client logs through the test harness's captured output.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
		.try_init();
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
	headers
		.get(header::AUTHORIZATION)?
		.to_str()
		.ok()?
		.strip_prefix("Bearer ")
}

fn account(id: Value, name: &str, email: &str) -> Value {
	json!({ "id": id, "name": name, "email": email })
}

fn backend() -> Router {
	Router::new()
		.route("/api/auth/login", post(login))
		.route("/api/auth/signup", post(signup))
		.route("/api/auth/refresh", post(refresh))
		.route("/api/users/profile", get(profile))
		.route("/api/users/search", get(search))
		.route("/api/swap-requests/{id}/status", patch(update_status))
		.route("/api/notifications", get(notifications))
		.route("/api/notifications/read-all", patch(|| async { StatusCode::NO_CONTENT }))
		.route("/api/upload/profile-photo", post(upload))
		.route("/api/echo/auth", get(echo_auth))
		.route("/api/slow", get(slow))
		.route("/api/text", get(|| async { "plain text" }))
		.route("/api/text/number", get(|| async { "42" }))
		.route("/api/broken", get(broken))
		.route("/api/teapot", get(|| async { StatusCode::IM_A_TEAPOT }))
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
	match (body["email"].as_str(), body["password"].as_str()) {
		(Some("a@b.com"), Some("secret")) => (
			StatusCode::OK,
			Json(json!({
				"access_token": VALID_TOKEN,
				"refresh_token": "refresh1",
				"user": account(json!(1), "A", "a@b.com"),
			})),
		),
		(Some("boss@b.com"), Some("secret")) => (
			StatusCode::OK,
			Json(json!({
				"access_token": "tok-boss",
				"user": { "id": "9", "name": "Boss", "email": "boss@b.com", "role": "admin" },
			})),
		),
		_ => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" }))),
	}
}

async fn signup(Json(body): Json<Value>) -> impl IntoResponse {
	if body["email"] == "taken@b.com" {
		return (
			StatusCode::OK,
			Json(json!({ "success": false, "error": "Email already registered" })),
		);
	}
	(
		StatusCode::OK,
		Json(json!({ "success": true, "data": account(json!("2"), "New", "new@b.com"), "message": "created" })),
	)
}

async fn refresh(headers: HeaderMap) -> impl IntoResponse {
	match bearer(&headers) {
		Some(VALID_TOKEN) => (
			StatusCode::OK,
			Json(json!({ "access_token": "tok2", "user": account(json!(1), "A", "a@b.com") })),
		),
		_ => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Not authenticated" }))),
	}
}

async fn profile(headers: HeaderMap) -> impl IntoResponse {
	match bearer(&headers) {
		Some(VALID_TOKEN) => (
			StatusCode::OK,
			Json(json!({ "success": true, "data": account(json!("1"), "A", "a@b.com") })),
		),
		Some(EXPIRED_TOKEN) => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token expired" }))),
		_ => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Not authenticated" }))),
	}
}

/// Echoes the raw query string back as the first user's name.
async fn search(RawQuery(query): RawQuery) -> Json<Value> {
	Json(json!({
		"success": true,
		"data": [{ "id": 5, "name": query.unwrap_or_default(), "email": "x@b.com" }],
		"pagination": { "page": 1, "limit": 20, "total": 1, "totalPages": 1 },
	}))
}

pub const NOTIFICATION_COUNT: u64 = 25;

/// Pages over `NOTIFICATION_COUNT` generated notifications.
async fn notifications(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
	let page: u64 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
	let limit: u64 = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(20);
	let start = (page - 1) * limit;
	let end = (start + limit).min(NOTIFICATION_COUNT);
	let data: Vec<Value> = (start..end)
		.map(|n| json!({ "id": n.to_string(), "type": "info", "message": format!("note {n}"), "read": false }))
		.collect();
	Json(json!({
		"success": true,
		"data": data,
		"pagination": {
			"page": page,
			"limit": limit,
			"total": NOTIFICATION_COUNT,
			"totalPages": NOTIFICATION_COUNT.div_ceil(limit),
		},
	}))
}

async fn update_status(Path(id): Path<String>, Json(body): Json<Value>) -> Json<Value> {
	Json(json!({
		"data": {
			"id": id,
			"fromUserId": "1",
			"toUserId": "2",
			"skillOffered": "Rust",
			"skillWanted": "Go",
			"status": body["status"],
		}
	}))
}

async fn upload(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
	let content_type = headers
		.get(header::CONTENT_TYPE)
		.and_then(|v| v.to_str().ok())
		.unwrap_or_default()
		.to_string();
	let text = String::from_utf8_lossy(&body);
	if content_type.starts_with("multipart/form-data") && text.contains("name=\"photo\"") {
		(StatusCode::OK, Json(json!({ "url": "/uploads/a.png" })))
	} else {
		(StatusCode::BAD_REQUEST, Json(json!({ "error": "expected photo field" })))
	}
}

async fn echo_auth(headers: HeaderMap) -> Json<Value> {
	Json(json!({ "authorization": bearer(&headers) }))
}

async fn slow() -> Json<Value> {
	tokio::time::sleep(Duration::from_secs(5)).await;
	Json(json!({}))
}

async fn broken() -> impl IntoResponse {
	([(header::CONTENT_TYPE, "application/json")], "{not json")
}
