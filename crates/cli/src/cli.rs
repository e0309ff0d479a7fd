use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use skillswap_protocol::{RequestDirection, SwapDecision, SwapStatus};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "skillswap")]
#[command(about = "SkillSwap marketplace client")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// API base URL (overrides SKILLSWAP_API_BASE_URL)
	#[arg(long, global = true, value_name = "URL")]
	pub api_url: Option<String>,

	/// Credential file (defaults to the user config directory)
	#[arg(long, global = true, value_name = "FILE")]
	pub credentials: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Sign in and store the credential
	Login {
		email: String,
		#[arg(long)]
		password: String,
	},

	/// Create an account (does not sign in)
	Signup {
		name: String,
		email: String,
		#[arg(long)]
		password: String,
		#[arg(long)]
		location: Option<String>,
	},

	/// Forget the stored credential
	Logout {
		/// Also notify the server
		#[arg(long)]
		remote: bool,
	},

	/// Show the signed-in user
	Whoami,

	/// Search users by skill, location or availability
	Search {
		query: Option<String>,
		/// Skill the user offers (repeatable)
		#[arg(long = "offers", value_name = "SKILL")]
		skills_offered: Vec<String>,
		/// Skill the user wants (repeatable)
		#[arg(long = "wants", value_name = "SKILL")]
		skills_wanted: Vec<String>,
		#[arg(long)]
		location: Option<String>,
		#[arg(long)]
		min_rating: Option<f32>,
		#[arg(long)]
		page: Option<u32>,
		#[arg(long)]
		limit: Option<u32>,
	},

	/// List swap requests
	#[command(alias = "reqs")]
	Requests {
		#[arg(value_enum, default_value_t = Direction::Received)]
		direction: Direction,
		#[arg(long, value_enum)]
		status: Option<StatusFilter>,
	},

	/// Accept or reject a received swap request
	Respond {
		request_id: String,
		#[arg(value_enum)]
		decision: Decision,
	},

	/// List notifications
	#[command(alias = "notes")]
	Notifications {
		/// Page size (defaults to the configured pagination limit)
		#[arg(long)]
		limit: Option<u32>,
		/// Keep loading pages until none are left
		#[arg(long)]
		all: bool,
		/// Mark everything read after listing
		#[arg(long)]
		mark_read: bool,
	},

	/// Stream realtime events until interrupted
	Listen {
		/// Stop after this many seconds
		#[arg(long, value_name = "SECS")]
		duration: Option<u64>,
	},
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Direction {
	Sent,
	Received,
}

impl From<Direction> for RequestDirection {
	fn from(direction: Direction) -> Self {
		match direction {
			Direction::Sent => RequestDirection::Sent,
			Direction::Received => RequestDirection::Received,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
	Pending,
	Accepted,
	Rejected,
	Completed,
	Cancelled,
}

impl From<StatusFilter> for SwapStatus {
	fn from(status: StatusFilter) -> Self {
		match status {
			StatusFilter::Pending => SwapStatus::Pending,
			StatusFilter::Accepted => SwapStatus::Accepted,
			StatusFilter::Rejected => SwapStatus::Rejected,
			StatusFilter::Completed => SwapStatus::Completed,
			StatusFilter::Cancelled => SwapStatus::Cancelled,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Decision {
	Accept,
	Reject,
}

impl From<Decision> for SwapDecision {
	fn from(decision: Decision) -> Self {
		match decision {
			Decision::Accept => SwapDecision::Accepted,
			Decision::Reject => SwapDecision::Rejected,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verbosity_counts_and_globals_apply_after_subcommand() {
		let cli = Cli::try_parse_from(["skillswap", "whoami", "-vv", "--format", "json"]).unwrap();
		assert_eq!(cli.verbose, 2);
		assert_eq!(cli.format, OutputFormat::Json);
		assert!(matches!(cli.command, Commands::Whoami));
	}

	#[test]
	fn search_collects_repeated_skills() {
		let cli = Cli::try_parse_from(["skillswap", "search", "guitar", "--offers", "Rust", "--offers", "Go", "--wants", "Piano"]).unwrap();
		match cli.command {
			Commands::Search {
				query,
				skills_offered,
				skills_wanted,
				..
			} => {
				assert_eq!(query.as_deref(), Some("guitar"));
				assert_eq!(skills_offered, vec!["Rust", "Go"]);
				assert_eq!(skills_wanted, vec!["Piano"]);
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn requests_default_to_received() {
		let cli = Cli::try_parse_from(["skillswap", "reqs", "--status", "pending"]).unwrap();
		match cli.command {
			Commands::Requests { direction, status } => {
				assert_eq!(RequestDirection::from(direction), RequestDirection::Received);
				assert_eq!(status.map(SwapStatus::from), Some(SwapStatus::Pending));
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn login_requires_password() {
		assert!(Cli::try_parse_from(["skillswap", "login", "a@b.com"]).is_err());
	}
}
