use anyhow::Result;
use skillswap_protocol::{RequestDirection, SwapDecision, SwapRequest, SwapStatus};

use crate::context::CommandContext;
use crate::output::{CommandResult, ResultBuilder};

pub async fn requests(
	ctx: &CommandContext,
	direction: RequestDirection,
	status: Option<SwapStatus>,
) -> Result<CommandResult<Vec<SwapRequest>>> {
	let envelope = ctx.client.swap_requests().list(direction, status).await;
	Ok(ResultBuilder::new("requests").envelope(envelope).build())
}

pub async fn respond(ctx: &CommandContext, request_id: &str, decision: SwapDecision) -> Result<CommandResult<SwapRequest>> {
	let envelope = ctx.client.swap_requests().update_status(request_id, decision).await;
	Ok(ResultBuilder::new("respond").envelope(envelope).build())
}
