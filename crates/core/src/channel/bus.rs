//! Per-instance publish/subscribe registry for channel events.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use skillswap_protocol::{ChannelEvent, EventKind};
use tokio::sync::mpsc;
use tracing::trace;

/// Handle returned by [`EventBus::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

#[derive(Default)]
struct Registry {
	next_id: u64,
	listeners: HashMap<EventKind, Vec<(SubscriptionId, Listener)>>,
}

/// Routes channel events to listeners registered per [`EventKind`].
///
/// Clones share the same registry. Listeners run synchronously on the
/// publishing task, after the registry lock has been released, so a
/// listener may subscribe or unsubscribe without deadlocking.
#[derive(Clone, Default)]
pub struct EventBus {
	registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for EventBus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let registry = self.registry.lock();
		let counts: HashMap<_, _> = registry
			.listeners
			.iter()
			.map(|(kind, listeners)| (kind.event_name(), listeners.len()))
			.collect();
		f.debug_struct("EventBus").field("listeners", &counts).finish()
	}
}

impl EventBus {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> SubscriptionId
	where
		F: Fn(&Value) + Send + Sync + 'static,
	{
		let mut registry = self.registry.lock();
		registry.next_id += 1;
		let id = SubscriptionId(registry.next_id);
		registry
			.listeners
			.entry(kind)
			.or_default()
			.push((id, Arc::new(listener)));
		id
	}

	/// Subscribes and forwards payloads into a channel. The subscription
	/// stays registered until unsubscribed; sends to a dropped receiver are
	/// ignored.
	pub fn subscribe_channel(&self, kind: EventKind) -> (SubscriptionId, mpsc::UnboundedReceiver<Value>) {
		let (tx, rx) = mpsc::unbounded_channel();
		let id = self.subscribe(kind, move |payload| {
			let _ = tx.send(payload.clone());
		});
		(id, rx)
	}

	/// Returns `false` when `id` was not registered.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut registry = self.registry.lock();
		for listeners in registry.listeners.values_mut() {
			if let Some(pos) = listeners.iter().position(|(sub, _)| *sub == id) {
				listeners.remove(pos);
				return true;
			}
		}
		false
	}

	/// Drops every listener.
	pub fn clear(&self) {
		self.registry.lock().listeners.clear();
	}

	pub fn listener_count(&self, kind: EventKind) -> usize {
		self.registry
			.lock()
			.listeners
			.get(&kind)
			.map_or(0, Vec::len)
	}

	/// Delivers `event` to every listener of its kind, in subscription
	/// order. Returns the number of listeners invoked.
	pub fn publish(&self, event: &ChannelEvent) -> usize {
		let listeners: Vec<Listener> = self
			.registry
			.lock()
			.listeners
			.get(&event.kind)
			.map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
			.unwrap_or_default();

		for listener in &listeners {
			listener(&event.payload);
		}
		trace!(target = "skillswap.channel", event = %event.kind, listeners = listeners.len(), "event published");
		listeners.len()
	}
}
