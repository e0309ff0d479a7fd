//! Command-line client for the SkillSwap marketplace.

pub mod cli;
pub mod commands;
pub mod context;
pub mod logging;
pub mod output;
