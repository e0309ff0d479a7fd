//! Realtime event channel.
//!
//! [`EventChannel`] keeps one push link open to the server, tagged with the
//! current credential and user id. Inbound frames are parsed into
//! [`ChannelEvent`]s and published on an [`EventBus`]. When a link fails
//! to open or drops, the supervisor retries with linear backoff: attempt
//! `n` waits `n * base_delay`, up to `max_attempts`, after which the
//! channel stays disconnected until the next [`EventChannel::connect`].
//!
//! A successful open resets the attempt counter. [`EventChannel::disconnect`]
//! (or dropping the channel) cancels the supervisor, including any pending
//! reconnect timer.

mod bus;
mod connector;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use skillswap_protocol::{ChannelEvent, ChannelFrame};
use skillswap_runtime::{Config, CredentialStore, StorageKey};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

pub use bus::{EventBus, SubscriptionId};
pub use connector::{Connector, LinkParts, WebSocketConnector};

use crate::{ApiClient, Result};

/// Linear reconnect schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
	pub max_attempts: u32,
	pub base_delay: Duration,
}

impl Default for ReconnectPolicy {
	fn default() -> Self {
		Self {
			max_attempts: 5,
			base_delay: Duration::from_secs(1),
		}
	}
}

impl ReconnectPolicy {
	pub fn from_config(config: &Config) -> Self {
		Self {
			max_attempts: config.reconnect_max_attempts,
			base_delay: config.reconnect_base_delay,
		}
	}

	/// Wait before reconnect `attempt` (1-based); `None` past the limit.
	pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
		(1..=self.max_attempts)
			.contains(&attempt)
			.then(|| self.base_delay * attempt)
	}

	/// Sum of every reconnect delay, i.e. how long the channel keeps trying.
	pub fn total_delay(&self) -> Duration {
		(1..=self.max_attempts).filter_map(|n| self.delay_for(n)).sum()
	}
}

/// Connection state as observed through [`EventChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
	/// Never connected, or gave up reconnecting.
	#[default]
	Disconnected,
	Connecting,
	Connected,
	/// Waiting out the backoff before reconnect `attempt`.
	Reconnecting { attempt: u32 },
	/// Closed on request; no reconnect is pending.
	Closed,
}

impl ChannelState {
	pub fn is_connected(&self) -> bool {
		matches!(self, Self::Connected)
	}
}

struct Shared {
	config: Config,
	store: Arc<dyn CredentialStore>,
	bus: EventBus,
	state: watch::Sender<ChannelState>,
	link: Mutex<LinkSlot>,
}

/// Bumping `epoch` orphans the running supervisor: its later state writes
/// and link installs are ignored.
#[derive(Default)]
struct LinkSlot {
	epoch: u64,
	outbound: Option<mpsc::UnboundedSender<String>>,
	supervisor: Option<JoinHandle<()>>,
}

impl LinkSlot {
	fn retire(&mut self) {
		self.epoch += 1;
		self.outbound = None;
		if let Some(task) = self.supervisor.take() {
			task.abort();
		}
	}
}

/// Self-healing push channel.
pub struct EventChannel {
	shared: Arc<Shared>,
	connector: Arc<dyn Connector>,
	policy: ReconnectPolicy,
}

impl std::fmt::Debug for EventChannel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventChannel")
			.field("state", &self.state())
			.field("policy", &self.policy)
			.finish_non_exhaustive()
	}
}

impl EventChannel {
	/// WebSocket-backed channel with the configured reconnect policy.
	pub fn new(config: Config, store: Arc<dyn CredentialStore>, bus: EventBus) -> Self {
		let policy = ReconnectPolicy::from_config(&config);
		Self {
			shared: Arc::new(Shared {
				config,
				store,
				bus,
				state: watch::Sender::new(ChannelState::Disconnected),
				link: Mutex::new(LinkSlot::default()),
			}),
			connector: Arc::new(WebSocketConnector),
			policy,
		}
	}

	/// Channel sharing the client's configuration and credential store.
	pub fn from_client(client: &ApiClient, bus: EventBus) -> Self {
		Self::new(client.config().clone(), Arc::clone(client.store()), bus)
	}

	pub fn with_connector(mut self, connector: impl Connector) -> Self {
		self.connector = Arc::new(connector);
		self
	}

	pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn bus(&self) -> &EventBus {
		&self.shared.bus
	}

	pub fn state(&self) -> ChannelState {
		*self.shared.state.borrow()
	}

	pub fn is_connected(&self) -> bool {
		self.state().is_connected()
	}

	pub fn subscribe(&self) -> watch::Receiver<ChannelState> {
		self.shared.state.subscribe()
	}

	/// Opens the channel for `user_id`, replacing any running link. Must be
	/// called inside a Tokio runtime.
	pub fn connect(&self, user_id: &str) {
		let mut slot = self.shared.link.lock();
		slot.retire();
		let supervisor = Supervisor {
			shared: Arc::clone(&self.shared),
			connector: Arc::clone(&self.connector),
			policy: self.policy,
			user_id: user_id.to_string(),
			epoch: slot.epoch,
		};
		slot.supervisor = Some(tokio::spawn(supervisor.run()));
		debug!(target = "skillswap.channel", user_id, "channel supervisor started");
	}

	/// Closes the link and cancels any pending reconnect.
	pub fn disconnect(&self) {
		let mut slot = self.shared.link.lock();
		slot.retire();
		self.shared.state.send_replace(ChannelState::Closed);
		info!(target = "skillswap.channel", "channel closed");
	}

	/// Sends `message` as JSON if the link is open. Returns `false` (after
	/// logging) when it was dropped; nothing is queued for later.
	pub fn send<M: Serialize + ?Sized>(&self, message: &M) -> bool {
		let text = match serde_json::to_string(message) {
			Ok(text) => text,
			Err(err) => {
				warn!(target = "skillswap.channel", error = %err, "message not serializable; dropped");
				return false;
			}
		};
		let slot = self.shared.link.lock();
		match &slot.outbound {
			Some(tx) if tx.send(text).is_ok() => true,
			_ => {
				warn!(target = "skillswap.channel", "channel not open; message dropped");
				false
			}
		}
	}
}

impl Drop for EventChannel {
	fn drop(&mut self) {
		self.shared.link.lock().retire();
	}
}

impl Shared {
	fn dispatch(&self, text: &str) {
		let frame: ChannelFrame = match serde_json::from_str(text) {
			Ok(frame) => frame,
			Err(err) => {
				warn!(target = "skillswap.channel", error = %err, "malformed frame dropped");
				return;
			}
		};
		match ChannelEvent::try_from(frame) {
			Ok(event) => {
				let delivered = self.bus.publish(&event);
				debug!(target = "skillswap.channel", event = %event.kind, delivered, "event dispatched");
			}
			Err(frame) => {
				debug!(target = "skillswap.channel", frame_type = %frame.kind, "unknown frame type dropped");
			}
		}
	}
}

/// Connect/reconnect loop for one [`EventChannel::connect`] call.
struct Supervisor {
	shared: Arc<Shared>,
	connector: Arc<dyn Connector>,
	policy: ReconnectPolicy,
	user_id: String,
	epoch: u64,
}

impl Supervisor {
	async fn run(self) {
		let mut attempt: u32 = 0;
		loop {
			if !self.transition(ChannelState::Connecting, false) {
				return;
			}
			match self.open().await {
				Ok(link) => {
					attempt = 0;
					self.pump(link).await;
					info!(target = "skillswap.channel", "channel link closed");
				}
				Err(err) => warn!(target = "skillswap.channel", error = %err, "channel failed to open"),
			}
			if !self.transition(ChannelState::Disconnected, true) {
				return;
			}

			attempt += 1;
			let Some(delay) = self.policy.delay_for(attempt) else {
				warn!(
					target = "skillswap.channel",
					attempts = attempt - 1,
					"reconnect attempts exhausted; channel stays disconnected"
				);
				return;
			};
			if !self.transition(ChannelState::Reconnecting { attempt }, false) {
				return;
			}
			info!(
				target = "skillswap.channel",
				attempt,
				max = self.policy.max_attempts,
				delay_ms = delay.as_millis() as u64,
				"reconnecting"
			);
			tokio::time::sleep(delay).await;
		}
	}

	async fn open(&self) -> Result<LinkParts> {
		let url = self.url()?;
		debug!(target = "skillswap.channel", url = %redacted(&url), "opening channel");
		self.connector.connect(url).await
	}

	/// Channel URL carrying the current credential and user id.
	fn url(&self) -> Result<Url> {
		let mut url = self.shared.config.channel_url()?;
		{
			let mut query = url.query_pairs_mut();
			if let Some(token) = self.shared.store.get(StorageKey::AuthToken) {
				query.append_pair("token", &token);
			}
			query.append_pair("userId", &self.user_id);
		}
		Ok(url)
	}

	async fn pump(&self, link: LinkParts) {
		let LinkParts { outbound, mut inbound } = link;
		{
			let mut slot = self.shared.link.lock();
			if slot.epoch != self.epoch {
				return;
			}
			slot.outbound = Some(outbound);
			self.shared.state.send_replace(ChannelState::Connected);
		}
		info!(target = "skillswap.channel", user_id = %self.user_id, "channel connected");

		while let Some(text) = inbound.recv().await {
			self.shared.dispatch(&text);
		}
	}

	/// Applies `state` unless this supervisor was retired. `detach` also
	/// drops the outbound half of the current link.
	fn transition(&self, state: ChannelState, detach: bool) -> bool {
		let mut slot = self.shared.link.lock();
		if slot.epoch != self.epoch {
			return false;
		}
		if detach {
			slot.outbound = None;
		}
		self.shared.state.send_replace(state);
		true
	}
}

fn redacted(url: &Url) -> Url {
	let mut clean = url.clone();
	let pairs: Vec<(String, String)> = url
		.query_pairs()
		.map(|(k, v)| {
			let v = if k == "token" { "***".to_string() } else { v.into_owned() };
			(k.into_owned(), v)
		})
		.collect();
	clean.query_pairs_mut().clear().extend_pairs(pairs);
	clean
}
