//! EventChannel over a real WebSocket server.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use skillswap::{ChannelState, EventBus, EventChannel, ReconnectPolicy};
use skillswap_protocol::EventKind;
use skillswap_runtime::{Config, MemoryStore};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

/// Accepts `connections` sockets in turn. Each one records its request
/// URI, pushes `frames`, then closes.
async fn serve(listener: TcpListener, connections: usize, frames: Vec<String>, uris: Arc<Mutex<Vec<String>>>) {
	for _ in 0..connections {
		let (stream, _) = listener.accept().await.unwrap();
		let uris = Arc::clone(&uris);
		let ws = tokio_tungstenite::accept_hdr_async(stream, move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
			uris.lock().push(req.uri().to_string());
			Ok(resp)
		})
		.await
		.unwrap();
		let (mut tx, _rx) = ws.split();
		for frame in &frames {
			tx.send(Message::Text(frame.clone())).await.unwrap();
		}
		// Give the client a moment to read before hanging up.
		tokio::time::sleep(Duration::from_millis(50)).await;
		let _ = tx.close().await;
	}
}

fn channel(addr: std::net::SocketAddr, bus: EventBus) -> EventChannel {
	let config = Config::new(&format!("http://{addr}")).unwrap();
	EventChannel::new(config, Arc::new(MemoryStore::with_token("tok1")), bus).with_policy(ReconnectPolicy {
		max_attempts: 5,
		base_delay: Duration::from_millis(20),
	})
}

#[tokio::test]
async fn delivers_frames_and_reconnects_after_server_close() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let uris = Arc::new(Mutex::new(Vec::new()));
	let frames = vec![
		r#"{"type":"notification","payload":{"id":"n1"}}"#.to_string(),
		r#"{"type":"presence","payload":{}}"#.to_string(),
		r#"{"type":"swap_request","payload":{"id":"s1","status":"accepted"}}"#.to_string(),
	];
	let server = tokio::spawn(serve(listener, 2, frames, Arc::clone(&uris)));

	let bus = EventBus::new();
	let (_, mut notifications) = bus.subscribe_channel(EventKind::Notification);
	let (_, mut swaps) = bus.subscribe_channel(EventKind::SwapRequestUpdate);
	let channel = channel(addr, bus);
	channel.connect("42");

	// One delivery per connection: the server closes, the channel reconnects.
	for _ in 0..2 {
		let n = tokio::time::timeout(Duration::from_secs(5), notifications.recv()).await.unwrap().unwrap();
		assert_eq!(n["id"], "n1");
		let s = tokio::time::timeout(Duration::from_secs(5), swaps.recv()).await.unwrap().unwrap();
		assert_eq!(s["status"], "accepted");
	}

	server.await.unwrap();
	let uris = uris.lock().clone();
	assert_eq!(uris.len(), 2);
	assert!(uris.iter().all(|uri| uri == "/ws?token=tok1&userId=42"));

	channel.disconnect();
	assert_eq!(channel.state(), ChannelState::Closed);
}

#[tokio::test]
async fn client_frames_reach_the_server() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let server = tokio::spawn(async move {
		let (stream, _) = listener.accept().await.unwrap();
		let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
		ws.next().await.unwrap().unwrap()
	});

	let channel = channel(addr, EventBus::new());
	channel.connect("42");
	let mut state = channel.subscribe();
	tokio::time::timeout(Duration::from_secs(5), state.wait_for(ChannelState::is_connected))
		.await
		.unwrap()
		.unwrap();

	assert!(channel.send(&serde_json::json!({"type": "ping"})));
	let received = server.await.unwrap();
	assert_eq!(received, Message::Text(r#"{"type":"ping"}"#.into()));
	channel.disconnect();
}
