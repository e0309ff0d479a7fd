use anyhow::Result;
use serde_json::Value;
use skillswap::Session;
use skillswap_protocol::SignupRequest;
use tracing::info;

use crate::context::CommandContext;
use crate::output::{CommandResult, ErrorCode, ResultBuilder};

pub async fn login(ctx: &CommandContext, email: &str, password: &str) -> Result<CommandResult<Session>> {
	info!(target = "skillswap", email, "signing in");
	let session = ctx.session();
	let result = match session.login(email, password).await {
		Ok(user) => ResultBuilder::new("login")
			.data(user)
			.message(format!("Signed in as {email}")),
		Err(skillswap::Error::Api(message)) => ResultBuilder::new("login").error(ErrorCode::AuthError, message),
		Err(err) => return Err(err.into()),
	};
	Ok(result.build())
}

pub async fn signup(
	ctx: &CommandContext,
	name: String,
	email: String,
	password: String,
	location: Option<String>,
) -> Result<CommandResult<Value>> {
	let request = SignupRequest {
		name,
		email,
		password,
		location,
	};
	let result = match ctx.session().signup(&request).await {
		Ok(created) => ResultBuilder::new("signup")
			.data(created)
			.message("Account created; sign in with `skillswap login`"),
		Err(skillswap::Error::Api(message)) => ResultBuilder::new("signup").error(ErrorCode::ApiError, message),
		Err(err) => return Err(err.into()),
	};
	Ok(result.build())
}

/// Clears stored credentials; with `remote`, tells the server first. A
/// failed server call does not prevent the local sign-out.
pub async fn logout(ctx: &CommandContext, remote: bool) -> Result<CommandResult<bool>> {
	let mut builder = ResultBuilder::new("logout");
	if remote && ctx.client.credential().is_some() {
		let envelope = ctx.client.auth().logout().await;
		if let Some(error) = envelope.error() {
			builder = builder.message(format!("server sign-out failed: {error}"));
		}
	}
	ctx.session().logout();
	Ok(builder.data(true).build())
}

pub async fn whoami(ctx: &CommandContext) -> Result<CommandResult<Session>> {
	let session = ctx.session();
	let result = match session.initialize().await {
		Some(user) => ResultBuilder::new("whoami").data(user),
		None => ResultBuilder::new("whoami").error(ErrorCode::AuthError, "not signed in"),
	};
	Ok(result.build())
}
