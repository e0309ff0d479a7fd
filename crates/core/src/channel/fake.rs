//! In-memory connector for testing the channel without a server.
//!
//! # Example
//!
//! ```ignore
//! let (connector, controller) = FakeConnector::pair();
//! let channel = EventChannel::new(config, store, bus).with_connector(connector);
//! channel.connect("42");
//!
//! controller.wait_for_attempts(1).await;
//! controller.inject_event("notification", json!({"id": "n1"}));
//! controller.drop_link(); // triggers reconnect
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::time::Instant;
use url::Url;

use super::connector::{Connector, LinkParts};
use crate::{Error, Result};

/// One connection attempt seen by the fake.
#[derive(Debug, Clone)]
pub struct ConnectAttempt {
	pub url: Url,
	pub at: Instant,
	pub accepted: bool,
}

#[derive(Default)]
struct Shared {
	refusing: bool,
	attempts: Vec<ConnectAttempt>,
	inbound_tx: Option<mpsc::UnboundedSender<String>>,
	outbound_rx: Option<mpsc::UnboundedReceiver<String>>,
}

/// [`Connector`] whose links are driven by a [`FakeConnectorController`].
pub struct FakeConnector {
	shared: Arc<Mutex<Shared>>,
}

impl FakeConnector {
	/// Creates the connector and the controller that drives it.
	pub fn pair() -> (Self, FakeConnectorController) {
		let shared = Arc::new(Mutex::new(Shared::default()));
		(
			Self {
				shared: Arc::clone(&shared),
			},
			FakeConnectorController { shared },
		)
	}
}

impl Connector for FakeConnector {
	fn connect(&self, url: Url) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<LinkParts>> + Send + '_>> {
		Box::pin(async move {
			let mut shared = self.shared.lock();
			let accepted = !shared.refusing;
			shared.attempts.push(ConnectAttempt {
				url,
				at: Instant::now(),
				accepted,
			});
			if !accepted {
				return Err(Error::Channel("connection refused".into()));
			}

			let (outbound, outbound_rx) = mpsc::unbounded_channel();
			let (inbound_tx, inbound) = mpsc::unbounded_channel();
			shared.inbound_tx = Some(inbound_tx);
			shared.outbound_rx = Some(outbound_rx);
			Ok(LinkParts { outbound, inbound })
		})
	}
}

/// Drives the fake: refuse connections, inject frames, drop the live link
/// and inspect what the client sent.
#[derive(Clone)]
pub struct FakeConnectorController {
	shared: Arc<Mutex<Shared>>,
}

impl FakeConnectorController {
	/// Subsequent attempts fail until [`accept_connections`](Self::accept_connections).
	pub fn refuse_connections(&self) {
		self.shared.lock().refusing = true;
	}

	pub fn accept_connections(&self) {
		self.shared.lock().refusing = false;
	}

	pub fn attempts(&self) -> Vec<ConnectAttempt> {
		self.shared.lock().attempts.clone()
	}

	pub fn attempt_count(&self) -> usize {
		self.shared.lock().attempts.len()
	}

	/// Polls until at least `count` attempts were made. Under a paused test
	/// clock the polling sleeps let pending timers fire.
	pub async fn wait_for_attempts(&self, count: usize) {
		while self.attempt_count() < count {
			tokio::time::sleep(Duration::from_millis(10)).await;
		}
	}

	/// Pushes a raw text frame down the live link. Returns `false` when no
	/// link is open.
	pub fn inject_raw(&self, text: impl Into<String>) -> bool {
		match &self.shared.lock().inbound_tx {
			Some(tx) => tx.send(text.into()).is_ok(),
			None => false,
		}
	}

	pub fn inject(&self, frame: Value) -> bool {
		self.inject_raw(frame.to_string())
	}

	pub fn inject_event(&self, frame_type: &str, payload: Value) -> bool {
		self.inject(json!({ "type": frame_type, "payload": payload }))
	}

	/// Simulates the server dropping the live link.
	pub fn drop_link(&self) {
		let mut shared = self.shared.lock();
		shared.inbound_tx = None;
	}

	/// Drains the frames the client has sent on the live link.
	pub fn take_sent(&self) -> Vec<String> {
		let mut shared = self.shared.lock();
		let mut sent = Vec::new();
		if let Some(rx) = shared.outbound_rx.as_mut() {
			while let Ok(text) = rx.try_recv() {
				sent.push(text);
			}
		}
		sent
	}

	/// Whether the client still holds the live link's sending half.
	pub fn link_open(&self) -> bool {
		self.shared
			.lock()
			.outbound_rx
			.as_ref()
			.is_some_and(|rx| !rx.is_closed())
	}
}
