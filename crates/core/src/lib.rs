//! SkillSwap client core
//!
//! Client-side infrastructure for the SkillSwap skill-exchange marketplace:
//! a request layer that turns every HTTP call into an [`Envelope`], a
//! self-healing realtime event channel, async data-loading handles and an
//! authenticated session context.
//!
//! # Architecture
//!
//! - [`transport`]: the [`ApiClient`] that injects the stored bearer
//!   credential and normalizes every response or failure into an envelope.
//! - [`api`]: typed wrappers for the auth, user, swap-request, review,
//!   notification and upload endpoints.
//! - [`channel`]: the persistent push channel with linear-backoff
//!   reconnect and an [`EventBus`] for typed subscriptions.
//! - [`hooks`]: observable query handles (immediate, lazy, paginated,
//!   optimistic and debounced) built on `tokio::sync::watch`.
//! - [`session`]: the [`SessionContext`] tracking who is signed in.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use skillswap::{ApiClient, SessionContext};
//! use skillswap_runtime::{Config, FileStore};
//!
//! let config = Config::from_env()?;
//! let store = Arc::new(FileStore::open(FileStore::default_path().unwrap_or_default()));
//! let client = ApiClient::new(config, store)?;
//! let session = SessionContext::new(client.clone());
//! session.login("a@b.com", "secret").await?;
//! ```

pub mod api;
pub mod channel;
pub mod error;
pub mod hooks;
pub mod session;
pub mod transport;

pub use channel::{ChannelState, EventBus, EventChannel, ReconnectPolicy, SubscriptionId};
pub use error::{Error, Result};
pub use session::SessionContext;
pub use skillswap_protocol::{self as protocol, Envelope, Page, Pagination, Session};
pub use transport::{ApiClient, Body, RequestOptions};
