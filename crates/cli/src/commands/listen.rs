use std::time::Duration;

use anyhow::{Result, bail};
use serde::Serialize;
use serde_json::Value;
use skillswap::{EventBus, EventChannel};
use skillswap_protocol::EventKind;
use tokio::sync::mpsc;
use tracing::info;

use crate::context::CommandContext;
use crate::output::{ErrorCode, OutputFormat, ResultBuilder, print_result};

#[derive(Debug, Serialize)]
struct EventLine {
	event: &'static str,
	payload: Value,
}

/// Streams channel events for the signed-in user, one result per event,
/// until Ctrl-C or `duration` elapses.
pub async fn listen(ctx: &CommandContext, duration: Option<Duration>) -> Result<()> {
	let Some(user) = ctx.session().initialize().await else {
		let result = ResultBuilder::<()>::new("listen").error(ErrorCode::AuthError, "not signed in").build();
		print_result(&result, ctx.format);
		bail!("not signed in");
	};

	let bus = EventBus::new();
	let (tx, mut events) = mpsc::unbounded_channel();
	for kind in EventKind::ALL {
		let tx = tx.clone();
		bus.subscribe(kind, move |payload| {
			let _ = tx.send(EventLine {
				event: kind.event_name(),
				payload: payload.clone(),
			});
		});
	}
	drop(tx);

	let channel = EventChannel::from_client(&ctx.client, bus);
	channel.connect(&user.id);
	info!(target = "skillswap", user_id = %user.id, "listening for events");

	let deadline = async {
		match duration {
			Some(duration) => tokio::time::sleep(duration).await,
			None => std::future::pending().await,
		}
	};
	tokio::pin!(deadline);

	let format = match ctx.format {
		OutputFormat::Json => OutputFormat::Ndjson,
		other => other,
	};
	loop {
		tokio::select! {
			Some(line) = events.recv() => {
				print_result(&ResultBuilder::new(line.event).data(&line).build(), format);
			}
			_ = tokio::signal::ctrl_c() => break,
			_ = &mut deadline => break,
		}
	}

	channel.disconnect();
	channel.bus().clear();
	Ok(())
}
