use clap::Parser;
use skillswap_cli::cli::Cli;
use skillswap_cli::{commands, logging};
use tracing::error;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = commands::run(cli).await {
		error!(target = "skillswap", error = %format!("{err:#}"), "command failed");
		std::process::exit(1);
	}
}
