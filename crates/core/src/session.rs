//! Authenticated-session cache.
//!
//! [`SessionContext`] derives "who is signed in" from the stored bearer
//! credential and keeps it observable through a watch channel. The server
//! stays authoritative: a credential the server no longer accepts is
//! discarded the first time it is used to load the profile.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;
use skillswap_protocol::{AccountSummary, Credentials, LoginResponse, Session, SignupRequest};
use skillswap_runtime::StorageKey;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{ApiClient, Error, Result};

/// Current-user state shared by the application.
#[derive(Debug)]
pub struct SessionContext {
	client: ApiClient,
	session: watch::Sender<Option<Session>>,
	in_flight: AtomicUsize,
}

/// Keeps [`SessionContext::is_loading`] true for its lifetime.
struct Loading<'a>(&'a AtomicUsize);

/// Which stored credentials a token response supersedes.
#[derive(Debug, Clone, Copy)]
enum Replace {
	All,
	AccessOnly,
}

impl<'a> Loading<'a> {
	fn start(counter: &'a AtomicUsize) -> Self {
		counter.fetch_add(1, Ordering::SeqCst);
		Self(counter)
	}
}

impl Drop for Loading<'_> {
	fn drop(&mut self) {
		self.0.fetch_sub(1, Ordering::SeqCst);
	}
}

impl SessionContext {
	/// Starts signed out; call [`initialize`](Self::initialize) to resume a
	/// stored credential.
	pub fn new(client: ApiClient) -> Self {
		Self {
			client,
			session: watch::Sender::new(None),
			in_flight: AtomicUsize::new(0),
		}
	}

	pub fn client(&self) -> &ApiClient {
		&self.client
	}

	/// Resumes the session behind the stored credential, if any.
	///
	/// Never fails: a credential the server rejects (or a profile call that
	/// fails for any reason) is cleared and the context stays signed out.
	pub async fn initialize(&self) -> Option<Session> {
		if self.client.credential().is_none() {
			debug!(target = "skillswap.session", "no stored credential");
			return None;
		}
		self.load_profile().await
	}

	/// Reloads the profile for the stored credential, with the same failure
	/// handling as [`initialize`](Self::initialize).
	pub async fn refresh(&self) -> Option<Session> {
		self.load_profile().await
	}

	/// Authenticates and persists the returned credential.
	///
	/// On failure nothing is stored and the previous state is untouched.
	pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
		let _loading = Loading::start(&self.in_flight);
		let credentials = Credentials {
			email: email.to_string(),
			password: password.to_string(),
		};
		let response = self
			.client
			.auth()
			.login(&credentials)
			.await
			.into_result()
			.map_err(|message| {
				warn!(target = "skillswap.session", error = %message, "login rejected");
				Error::Api(message)
			})?;

		self.store_credentials(&response, Replace::All)?;
		let session = self.session_for(&response.user);
		self.session.send_replace(Some(session.clone()));
		info!(target = "skillswap.session", user_id = %session.id, "signed in");
		Ok(session)
	}

	/// Registers an account. Does not sign in.
	pub async fn signup(&self, request: &SignupRequest) -> Result<Value> {
		let _loading = Loading::start(&self.in_flight);
		let created = self
			.client
			.auth()
			.signup(request)
			.await
			.into_result()
			.map_err(Error::Api)?;
		info!(target = "skillswap.session", email = %request.email, "account registered");
		Ok(created)
	}

	/// Exchanges the stored credential for a fresh one via the refresh
	/// endpoint. The session identity is updated from the response.
	pub async fn renew(&self) -> Result<Session> {
		let response = self
			.client
			.auth()
			.refresh_token()
			.await
			.into_result()
			.map_err(Error::Api)?;
		self.store_credentials(&response, Replace::AccessOnly)?;
		let session = self.session_for(&response.user);
		self.session.send_replace(Some(session.clone()));
		debug!(target = "skillswap.session", user_id = %session.id, "credential renewed");
		Ok(session)
	}

	/// Signs out locally: clears the session and every stored credential.
	/// Idempotent; no server call.
	pub fn logout(&self) {
		let previous = self.session.send_replace(None);
		self.client.clear_credentials();
		if let Some(session) = previous {
			info!(target = "skillswap.session", user_id = %session.id, "signed out");
		}
	}

	pub fn current(&self) -> Option<Session> {
		self.session.borrow().clone()
	}

	pub fn is_authenticated(&self) -> bool {
		self.session.borrow().is_some()
	}

	pub fn is_admin(&self) -> bool {
		self.session.borrow().as_ref().is_some_and(|s| s.is_admin)
	}

	/// True while initialization, login or signup is in flight.
	pub fn is_loading(&self) -> bool {
		self.in_flight.load(Ordering::SeqCst) > 0
	}

	pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
		self.session.subscribe()
	}

	async fn load_profile(&self) -> Option<Session> {
		let _loading = Loading::start(&self.in_flight);
		match self.client.auth().profile().await.into_result() {
			Ok(account) => {
				let session = self.session_for(&account);
				self.session.send_replace(Some(session.clone()));
				debug!(target = "skillswap.session", user_id = %session.id, "session resumed");
				Some(session)
			}
			Err(message) => {
				warn!(target = "skillswap.session", error = %message, "stored credential rejected; clearing");
				self.session.send_replace(None);
				self.client.clear_credentials();
				None
			}
		}
	}

	/// Writes the access credential, then the refresh credential. A login
	/// replaces the whole set, so a response without a refresh credential
	/// removes the stored one; a renewal keeps it. A failed second write
	/// restores the previous access credential.
	fn store_credentials(&self, response: &LoginResponse, replace: Replace) -> Result<()> {
		let store = self.client.store();
		let previous = store.get(StorageKey::AuthToken);
		store.set(StorageKey::AuthToken, &response.access_token)?;

		let written = match (response.refresh_token.as_deref(), replace) {
			(Some(refresh), _) => store.set(StorageKey::RefreshToken, refresh),
			(None, Replace::All) => store.remove(StorageKey::RefreshToken),
			(None, Replace::AccessOnly) => Ok(()),
		};
		if let Err(err) = written {
			let restored = match previous {
				Some(token) => store.set(StorageKey::AuthToken, &token),
				None => store.remove(StorageKey::AuthToken),
			};
			if let Err(restore_err) = restored {
				warn!(target = "skillswap.storage", error = %restore_err, "failed to restore previous credential");
			}
			return Err(err.into());
		}
		Ok(())
	}

	fn session_for(&self, account: &AccountSummary) -> Session {
		let is_admin = account
			.reported_admin()
			.unwrap_or_else(|| self.client.config().is_admin_email(&account.email));
		Session {
			id: account.id.clone(),
			name: account.name.clone(),
			email: account.email.clone(),
			is_admin,
		}
	}
}
