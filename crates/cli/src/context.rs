use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use skillswap::{ApiClient, SessionContext};
use skillswap_runtime::{Config, FileStore};
use tracing::debug;

use crate::cli::Cli;
use crate::output::OutputFormat;

/// Everything a command needs: resolved config, credential file and client.
pub struct CommandContext {
	pub client: ApiClient,
	pub store: Arc<FileStore>,
	pub format: OutputFormat,
}

impl CommandContext {
	pub fn new(config: Config, credentials: PathBuf, format: OutputFormat) -> Result<Self> {
		let store = Arc::new(FileStore::open(credentials));
		debug!(target = "skillswap.storage", path = %store.path().display(), "using credential file");
		let client = ApiClient::new(config, store.clone()).context("failed to build HTTP client")?;
		Ok(Self { client, store, format })
	}

	/// Resolves configuration from flags and environment.
	pub fn from_cli(cli: &Cli) -> Result<Self> {
		let config = match &cli.api_url {
			Some(url) => Config::new(url),
			None => Config::from_env(),
		}
		.context("invalid configuration")?;

		let credentials = match &cli.credentials {
			Some(path) => path.clone(),
			None => FileStore::default_path().context("no config directory for the credential file; pass --credentials")?,
		};
		Self::new(config, credentials, cli.format)
	}

	pub fn config(&self) -> &Config {
		self.client.config()
	}

	pub fn session(&self) -> SessionContext {
		SessionContext::new(self.client.clone())
	}
}
