//! The Consequences game engine.
//!
//! One session run flows through five stages:
//!
//! 1. [`ResponseWindowExtractor`] — find the trailing rows of the response
//!    log that belong to this session
//! 2. [`QuotaReconciler`] — check that count against the roster size
//! 3. [`cross_assign`] — rotate each category so every consequence mixes
//!    several respondents' answers
//! 4. [`DeficitPadder`] — top up with filler when players outnumber answers
//! 5. [`ConsequenceRenderer`] — format one consequence as a message body
//!
//! [`SessionRunner`] wires the stages to the injected stores and notifier.

pub mod assign;
pub mod invite;
pub mod padding;
pub mod quota;
pub mod render;
pub mod session;
pub mod window;

pub use assign::{cross_assign, regroup, rotate_right, transpose};
pub use invite::{send_invitations, InvitationReport};
pub use padding::DeficitPadder;
pub use quota::{Quota, QuotaReconciler};
pub use render::ConsequenceRenderer;
pub use session::{Delivery, FailedDelivery, SessionPlan, SessionReport, SessionRunner};
pub use window::{ResponseWindowExtractor, SessionWindow, TimestampParser, WindowStop};
