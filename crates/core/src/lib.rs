//! # Consequences Core
//!
//! Domain types, collaborator traits, and error definitions for the
//! Consequences party game engine. This crate has **no I/O** of its own; it
//! defines the model that the engine, stores, and notifiers are written
//! against.
//!
//! ## Collaborators
//!
//! The game reads two tables and writes messages. Each of those boundaries is
//! a trait here, with implementations in their own crates:
//! - [`ResponseStore`] — the append-only response log
//! - [`RosterStore`] — participants and their per-session opt-in flags
//! - [`Notifier`] — delivery of one message to one address

pub mod assignment;
pub mod error;
pub mod notifier;
pub mod participant;
pub mod response;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use assignment::Assignment;
pub use error::{DeliveryError, Error, GameError, Result, StoreError};
pub use notifier::{Notifier, OutboundMessage};
pub use participant::Participant;
pub use response::ResponseRow;
pub use store::{ResponseStore, RosterStore};
