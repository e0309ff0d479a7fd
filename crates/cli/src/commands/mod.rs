mod auth;
mod listen;
mod notifications;
mod requests;
mod search;

use anyhow::Result;
use serde::Serialize;

use crate::cli::{Cli, Commands};
use crate::context::CommandContext;
use crate::output::{CommandResult, ErrorCode, ResultBuilder, print_result};

pub use auth::{login, logout, signup, whoami};
pub use listen::listen;
pub use notifications::notifications;
pub use requests::{requests, respond};
pub use search::search;

/// Runs the parsed command and prints its result.
pub async fn run(cli: Cli) -> Result<()> {
	let ctx = match CommandContext::from_cli(&cli) {
		Ok(ctx) => ctx,
		Err(err) => {
			let result = ResultBuilder::<()>::new("config")
				.error(ErrorCode::ConfigError, format!("{err:#}"))
				.build();
			print_result(&result, cli.format);
			return Err(err);
		}
	};
	dispatch(cli.command, &ctx).await
}

pub async fn dispatch(command: Commands, ctx: &CommandContext) -> Result<()> {
	match command {
		Commands::Login { email, password } => emit(ctx, login(ctx, &email, &password).await),
		Commands::Signup {
			name,
			email,
			password,
			location,
		} => emit(ctx, signup(ctx, name, email, password, location).await),
		Commands::Logout { remote } => emit(ctx, logout(ctx, remote).await),
		Commands::Whoami => emit(ctx, whoami(ctx).await),
		Commands::Search {
			query,
			skills_offered,
			skills_wanted,
			location,
			min_rating,
			page,
			limit,
		} => {
			let params = skillswap_protocol::SearchParams {
				query,
				skills_offered,
				skills_wanted,
				location,
				availability: Vec::new(),
				min_rating,
				page,
				limit,
			};
			emit(ctx, search(ctx, &params).await)
		}
		Commands::Requests { direction, status } => emit(ctx, requests(ctx, direction.into(), status.map(Into::into)).await),
		Commands::Respond { request_id, decision } => emit(ctx, respond(ctx, &request_id, decision.into()).await),
		Commands::Notifications { limit, all, mark_read } => emit(ctx, notifications(ctx, limit, all, mark_read).await),
		Commands::Listen { duration } => listen(ctx, duration.map(std::time::Duration::from_secs)).await,
	}
}

/// Prints `result` and turns a failed result into a non-zero exit.
fn emit<T: Serialize>(ctx: &CommandContext, result: Result<CommandResult<T>>) -> Result<()> {
	let result = result?;
	print_result(&result, ctx.format);
	match &result.error {
		Some(error) => anyhow::bail!("{}: {}", error.code, error.message),
		None => Ok(()),
	}
}
