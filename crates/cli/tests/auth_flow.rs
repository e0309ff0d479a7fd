use std::path::{Path, PathBuf};
use std::process::Command;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

const TOTAL_NOTIFICATIONS: u32 = 5;

fn skillswap_binary() -> PathBuf {
	PathBuf::from(env!("CARGO_BIN_EXE_skillswap"))
}

async fn start_backend() -> String {
	let router = Router::new()
		.route("/api/auth/login", post(login))
		.route("/api/users/profile", get(profile))
		.route("/api/notifications", get(notifications))
		.route("/api/notifications/read-all", patch(|| async { StatusCode::NO_CONTENT }));
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, router).await.unwrap();
	});
	format!("http://{addr}/api")
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
	if body["email"] == "a@b.com" && body["password"] == "secret" {
		(
			StatusCode::OK,
			Json(json!({
				"success": true,
				"data": {
					"access_token": "tok1",
					"refresh_token": "refresh1",
					"user": { "id": 1, "name": "A", "email": "a@b.com" }
				}
			})),
		)
	} else {
		(StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" })))
	}
}

async fn profile(headers: HeaderMap) -> impl IntoResponse {
	match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
		Some("Bearer tok1") => (
			StatusCode::OK,
			Json(json!({ "success": true, "data": { "id": "1", "name": "A", "email": "a@b.com" } })),
		),
		_ => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Not authenticated" }))),
	}
}

async fn notifications(Query(params): Query<std::collections::HashMap<String, u32>>) -> Json<Value> {
	let page = params.get("page").copied().unwrap_or(1);
	let limit = params.get("limit").copied().unwrap_or(20);
	let start = (page - 1) * limit;
	let end = (start + limit).min(TOTAL_NOTIFICATIONS);
	let items: Vec<Value> = (start..end)
		.map(|i| json!({ "id": i + 1, "type": "swap", "message": format!("note {}", i + 1) }))
		.collect();
	Json(json!({
		"success": true,
		"data": items,
		"pagination": {
			"page": page,
			"limit": limit,
			"total": TOTAL_NOTIFICATIONS,
			"totalPages": TOTAL_NOTIFICATIONS.div_ceil(limit)
		}
	}))
}

async fn run(base: &str, credentials: &Path, args: &[&str]) -> (bool, Value, String) {
	let mut cmd = Command::new(skillswap_binary());
	cmd.args(["--format", "json", "--api-url", base, "--credentials"])
		.arg(credentials)
		.args(args)
		.env_remove("SKILLSWAP_API_BASE_URL");
	let output = tokio::task::spawn_blocking(move || cmd.output())
		.await
		.unwrap()
		.expect("failed to execute skillswap");
	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let stderr = String::from_utf8_lossy(&output.stderr).to_string();
	let parsed = serde_json::from_str(&stdout).unwrap_or_else(|_| json!({ "raw": stdout }));
	(output.status.success(), parsed, stderr)
}

#[tokio::test(flavor = "multi_thread")]
async fn login_persists_credentials_and_whoami_reads_them() {
	let base = start_backend().await;
	let tmp = TempDir::new().unwrap();
	let credentials = tmp.path().join("credentials.json");

	let (ok, json, stderr) = run(&base, &credentials, &["login", "a@b.com", "--password", "secret"]).await;
	assert!(ok, "login failed: {stderr}");
	assert_eq!(json["ok"], true);
	assert_eq!(json["data"]["id"], "1");
	assert_eq!(json["data"]["isAdmin"], false);

	let stored: Value = serde_json::from_str(&std::fs::read_to_string(&credentials).unwrap()).unwrap();
	assert_eq!(stored["authToken"], "tok1");
	assert_eq!(stored["refreshToken"], "refresh1");

	let (ok, json, stderr) = run(&base, &credentials, &["whoami"]).await;
	assert!(ok, "whoami failed: {stderr}");
	assert_eq!(json["data"]["email"], "a@b.com");

	let (ok, json, _) = run(&base, &credentials, &["logout"]).await;
	assert!(ok);
	assert_eq!(json["data"], true);
	assert!(!credentials.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_login_exits_nonzero_and_stores_nothing() {
	let base = start_backend().await;
	let tmp = TempDir::new().unwrap();
	let credentials = tmp.path().join("credentials.json");

	let (ok, json, _) = run(&base, &credentials, &["login", "a@b.com", "--password", "wrong"]).await;
	assert!(!ok);
	assert_eq!(json["ok"], false);
	assert_eq!(json["error"]["code"], "AUTH_ERROR");
	assert_eq!(json["error"]["message"], "Invalid credentials");
	assert!(!credentials.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn whoami_without_credentials_reports_auth_error() {
	let base = start_backend().await;
	let tmp = TempDir::new().unwrap();

	let (ok, json, _) = run(&base, &tmp.path().join("none.json"), &["whoami"]).await;
	assert!(!ok);
	assert_eq!(json["error"]["code"], "AUTH_ERROR");
}

#[tokio::test(flavor = "multi_thread")]
async fn notifications_all_walks_every_page() {
	let base = start_backend().await;
	let tmp = TempDir::new().unwrap();
	let credentials = tmp.path().join("credentials.json");

	let (ok, json, stderr) = run(&base, &credentials, &["notifications", "--limit", "2", "--all", "--mark-read"]).await;
	assert!(ok, "notifications failed: {stderr}");
	let items = json["data"].as_array().unwrap();
	assert_eq!(items.len(), TOTAL_NOTIFICATIONS as usize);
	assert_eq!(items[4]["message"], "note 5");
	assert_eq!(json["message"], "All notifications marked read");
}
