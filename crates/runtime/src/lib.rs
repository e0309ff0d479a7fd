//! Process-level environment for the SkillSwap client: configuration and
//! durable credential storage.

pub mod config;
pub mod error;
pub mod storage;

pub use config::{Config, Environment};
pub use error::{Error, Result};
pub use storage::{CredentialStore, FileStore, MemoryStore, StorageKey};
