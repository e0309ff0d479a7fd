//! Wire types for the SkillSwap HTTP and realtime surfaces.
//!
//! This crate contains the serde-serializable types exchanged with the
//! SkillSwap backend. These types represent the "protocol layer": the shapes
//! of data as they appear on the wire, plus the normalized [`Envelope`] every
//! transport call resolves to.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization and small
//!   derived accessors
//! * Lenient on input: optional server fields default instead of failing
//! * Stable: Changes only when the backend contract changes
//!
//! The transport, channel and state containers built on top of these types
//! live in `skillswap-rs`.

pub mod channel;
pub mod endpoints;
pub mod envelope;
pub mod limits;
pub mod pagination;
pub mod resources;
pub mod session;

mod ids;

pub use channel::*;
pub use envelope::*;
pub use limits::*;
pub use pagination::*;
pub use resources::*;
pub use session::*;
