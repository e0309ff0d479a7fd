//! Frames pushed by the server over the realtime channel.
//!
//! Inbound frames are JSON objects `{"type": ..., "payload": ...}`. Three
//! frame types are recognized; each maps to one application-level
//! [`EventKind`]. Anything else is left to the caller to log and drop.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw inbound frame as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFrame {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub payload: Value,
}

/// Application-level event raised for a recognized frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// `notification` frames.
	Notification,
	/// `swap_request` frames.
	SwapRequestUpdate,
	/// `message` frames.
	NewMessage,
}

impl EventKind {
	pub const ALL: [EventKind; 3] = [EventKind::Notification, EventKind::SwapRequestUpdate, EventKind::NewMessage];

	/// Resolves the wire `type` tag.
	pub fn from_frame_type(kind: &str) -> Option<Self> {
		match kind {
			"notification" => Some(Self::Notification),
			"swap_request" => Some(Self::SwapRequestUpdate),
			"message" => Some(Self::NewMessage),
			_ => None,
		}
	}

	/// Wire `type` tag for this kind.
	pub fn frame_type(&self) -> &'static str {
		match self {
			Self::Notification => "notification",
			Self::SwapRequestUpdate => "swap_request",
			Self::NewMessage => "message",
		}
	}

	/// Name of the event dispatched to subscribers.
	pub fn event_name(&self) -> &'static str {
		match self {
			Self::Notification => "notification",
			Self::SwapRequestUpdate => "swapRequestUpdate",
			Self::NewMessage => "newMessage",
		}
	}
}

impl std::fmt::Display for EventKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.event_name())
	}
}

/// Typed event carrying the frame payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelEvent {
	pub kind: EventKind,
	pub payload: Value,
}

impl TryFrom<ChannelFrame> for ChannelEvent {
	type Error = ChannelFrame;

	/// Fails with the original frame when its type is not recognized.
	fn try_from(frame: ChannelFrame) -> Result<Self, Self::Error> {
		match EventKind::from_frame_type(&frame.kind) {
			Some(kind) => Ok(Self {
				kind,
				payload: frame.payload,
			}),
			None => Err(frame),
		}
	}
}
