//! Link establishment for the realtime channel.
//!
//! A [`Connector`] opens one link and hands back a pair of text pipes. The
//! channel supervisor owns reconnection; connectors never retry.

use std::future::Future;
use std::pin::Pin;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace};
use url::Url;

use crate::Result;

/// Both directions of an open link.
///
/// Dropping `outbound` closes the link; `inbound` yields `None` once the
/// remote side is gone.
#[derive(Debug)]
pub struct LinkParts {
	pub outbound: mpsc::UnboundedSender<String>,
	pub inbound: mpsc::UnboundedReceiver<String>,
}

/// Opens links for the channel supervisor.
pub trait Connector: Send + Sync + 'static {
	fn connect(&self, url: Url) -> Pin<Box<dyn Future<Output = Result<LinkParts>> + Send + '_>>;
}

/// WebSocket links over `tokio-tungstenite`.
///
/// Each link runs a writer and a reader task that pump text frames between
/// the socket and the [`LinkParts`] channels.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
	fn connect(&self, url: Url) -> Pin<Box<dyn Future<Output = Result<LinkParts>> + Send + '_>> {
		Box::pin(async move {
			let (stream, _response) = tokio_tungstenite::connect_async(url.as_str()).await?;
			let (mut ws_tx, mut ws_rx) = stream.split();
			let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();
			let (inbound_tx, inbound) = mpsc::unbounded_channel::<String>();

			tokio::spawn(async move {
				while let Some(text) = outbound_rx.recv().await {
					if let Err(err) = ws_tx.send(Message::Text(text)).await {
						debug!(target = "skillswap.channel", error = %err, "socket write failed");
						return;
					}
				}
				let _ = ws_tx.close().await;
				trace!(target = "skillswap.channel", "writer finished");
			});

			tokio::spawn(async move {
				while let Some(message) = ws_rx.next().await {
					let text = match message {
						Ok(Message::Text(text)) => text,
						Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
							Ok(text) => text,
							Err(_) => {
								debug!(target = "skillswap.channel", "non-UTF-8 binary frame dropped");
								continue;
							}
						},
						Ok(Message::Close(frame)) => {
							debug!(target = "skillswap.channel", ?frame, "server closed the socket");
							break;
						}
						Ok(_) => continue,
						Err(err) => {
							debug!(target = "skillswap.channel", error = %err, "socket read failed");
							break;
						}
					};
					if inbound_tx.send(text).is_err() {
						break;
					}
				}
				trace!(target = "skillswap.channel", "reader finished");
			});

			Ok(LinkParts { outbound, inbound })
		})
	}
}
