//! Data-loading handles driven by the real client.

mod test_server;

use std::sync::Arc;

use parking_lot::Mutex;
use skillswap::hooks::{DebouncedQuery, LazyQuery, PaginatedQuery};
use skillswap_protocol::{Notification, SearchParams};
use test_server::{NOTIFICATION_COUNT, TestServer};

#[tokio::test]
async fn paginated_notifications_accumulate_to_the_total() {
	let server = TestServer::start().await;
	let client = server.anonymous_client();

	let query: PaginatedQuery<Notification> = PaginatedQuery::new(10, move |page, limit| {
		let client = client.clone();
		async move { client.notifications().list(page, limit).await }
	});
	query
		.subscribe()
		.wait_for(|s| !s.loading)
		.await
		.unwrap();

	query.load_more().unwrap().await.unwrap();
	query.load_more().unwrap().await.unwrap();

	let state = query.state();
	assert_eq!(state.data.len() as u64, NOTIFICATION_COUNT);
	assert_eq!(state.data.first().map(|n| n.id.as_str()), Some("0"));
	assert_eq!(state.data.last().map(|n| n.id.as_str()), Some("24"));
	assert!(!query.has_more());
	assert!(query.load_more().is_none());
	assert_eq!(state.error, None);
	server.shutdown();
}

#[tokio::test]
async fn lazy_login_surfaces_server_message() {
	let server = TestServer::start().await;
	let client = server.anonymous_client();
	let lazy = LazyQuery::new();

	let credentials = skillswap_protocol::Credentials {
		email: "a@b.com".into(),
		password: "nope".into(),
	};
	let err = lazy.execute(client.auth().login(&credentials)).await.unwrap_err();
	assert_eq!(err.to_string(), "Invalid credentials");
	assert_eq!(lazy.state().error.as_deref(), Some("Invalid credentials"));
	server.shutdown();
}

#[tokio::test]
async fn debounced_search_queries_the_server_once() {
	let server = TestServer::start().await;
	let client = server.anonymous_client();
	let sent = Arc::new(Mutex::new(Vec::new()));

	let log = Arc::clone(&sent);
	let mut config = client.config().clone();
	config.debounce_delay = std::time::Duration::from_millis(50);
	let search = DebouncedQuery::from_config(&config, move |text: String| {
		log.lock().push(text.clone());
		let client = client.clone();
		async move {
			let params = SearchParams {
				query: Some(text),
				..SearchParams::default()
			};
			client.users().search(&params).await
		}
	});

	search.set_query("g");
	search.set_query("gu");
	search.set_query("guitar");
	let mut updates = search.subscribe();
	updates.wait_for(|s| s.data.is_some()).await.unwrap();

	assert_eq!(*sent.lock(), vec!["guitar".to_string()]);
	let page = search.state().data.unwrap();
	assert_eq!(page.data[0].name, "query=guitar");
	server.shutdown();
}
