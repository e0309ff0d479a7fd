//! Durable credential storage.
//!
//! Holds the bearer credential and the optional refresh credential as plain
//! strings under stable key names. The store is a single global slot per key:
//! concurrent writers are not excluded and the last write wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::Result;

/// Keys understood by the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
	/// Bearer credential attached to every request.
	AuthToken,
	/// Optional credential used to mint a new bearer credential.
	RefreshToken,
}

impl StorageKey {
	pub const ALL: [StorageKey; 2] = [StorageKey::AuthToken, StorageKey::RefreshToken];

	/// Stable on-disk name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::AuthToken => "authToken",
			Self::RefreshToken => "refreshToken",
		}
	}
}

/// Durable client-side key/value slot for credentials.
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
	fn get(&self, key: StorageKey) -> Option<String>;

	fn set(&self, key: StorageKey, value: &str) -> Result<()>;

	/// Removes `key`; removing an absent key is not an error.
	fn remove(&self, key: StorageKey) -> Result<()>;

	/// Removes every known key.
	fn clear(&self) -> Result<()> {
		for key in StorageKey::ALL {
			self.remove(key)?;
		}
		Ok(())
	}
}

/// Process-local store, used for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
	values: Mutex<BTreeMap<StorageKey, String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store pre-seeded with a bearer credential.
	pub fn with_token(token: &str) -> Self {
		let store = Self::new();
		store.values.lock().insert(StorageKey::AuthToken, token.to_string());
		store
	}
}

impl CredentialStore for MemoryStore {
	fn get(&self, key: StorageKey) -> Option<String> {
		self.values.lock().get(&key).cloned()
	}

	fn set(&self, key: StorageKey, value: &str) -> Result<()> {
		self.values.lock().insert(key, value.to_string());
		Ok(())
	}

	fn remove(&self, key: StorageKey) -> Result<()> {
		self.values.lock().remove(&key);
		Ok(())
	}
}

/// JSON file-backed store.
///
/// The file is read once at open and rewritten on every change. A missing or
/// unreadable file opens as an empty store; the file is deleted once the last
/// key is removed.
#[derive(Debug)]
pub struct FileStore {
	path: PathBuf,
	values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
	pub fn open(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		let values = match fs::read_to_string(&path) {
			Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
				warn!(target = "skillswap.storage", path = %path.display(), error = %err, "credential file unreadable; starting empty");
				BTreeMap::new()
			}),
			Err(_) => BTreeMap::new(),
		};
		Self {
			path,
			values: Mutex::new(values),
		}
	}

	/// `<config dir>/skillswap/credentials.json`, when the platform has a config dir.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("skillswap").join("credentials.json"))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
		if values.is_empty() {
			return match fs::remove_file(&self.path) {
				Ok(()) => Ok(()),
				Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
				Err(err) => Err(err.into()),
			};
		}

		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}
		let json = serde_json::to_string_pretty(values)?;
		fs::write(&self.path, json)?;
		restrict_permissions(&self.path)?;
		debug!(target = "skillswap.storage", path = %self.path.display(), "credential file written");
		Ok(())
	}
}

impl CredentialStore for FileStore {
	fn get(&self, key: StorageKey) -> Option<String> {
		self.values.lock().get(key.as_str()).cloned()
	}

	fn set(&self, key: StorageKey, value: &str) -> Result<()> {
		let mut values = self.values.lock();
		let mut next = values.clone();
		next.insert(key.as_str().to_string(), value.to_string());
		self.persist(&next)?;
		*values = next;
		Ok(())
	}

	fn remove(&self, key: StorageKey) -> Result<()> {
		let mut values = self.values.lock();
		if !values.contains_key(key.as_str()) {
			return Ok(());
		}
		let mut next = values.clone();
		next.remove(key.as_str());
		self.persist(&next)?;
		*values = next;
		Ok(())
	}
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
	use std::os::unix::fs::PermissionsExt;
	fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
	Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
	Ok(())
}
