use anyhow::Result;
use skillswap::Page;
use skillswap_protocol::{SearchParams, User};

use crate::context::CommandContext;
use crate::output::{CommandResult, ResultBuilder};

pub async fn search(ctx: &CommandContext, params: &SearchParams) -> Result<CommandResult<Page<User>>> {
	let envelope = ctx.client.users().search(params).await;
	Ok(ResultBuilder::new("search").envelope(envelope).build())
}
