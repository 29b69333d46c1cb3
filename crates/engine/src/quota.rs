//! Reconciles the session window against the roster size.

use consequences_config::WindowConfig;
use consequences_core::GameError;
use serde::Serialize;
use tracing::warn;

/// The outcome of a successful reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quota {
    /// Rows in the session window
    pub usable: usize,

    /// Participants opted in to the session
    pub participants: usize,

    /// Rows the cross-assignment will consume
    pub consumed: usize,

    /// Whether the window held more rows than participants
    pub clamped: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct QuotaReconciler {
    max_ok_missing: usize,
}

impl QuotaReconciler {
    pub fn new(max_ok_missing: usize) -> Self {
        Self { max_ok_missing }
    }

    pub fn from_config(config: &WindowConfig) -> Self {
        Self::new(config.max_ok_missing)
    }

    /// Decide how many window rows to consume.
    ///
    /// Fails when more than `max_ok_missing` participants have not answered.
    /// A window larger than the roster is clamped to the roster size with a
    /// warning.
    pub fn reconcile(&self, usable: usize, participants: usize) -> Result<Quota, GameError> {
        if usable + self.max_ok_missing < participants {
            return Err(GameError::InsufficientResponses {
                usable,
                participants,
                max_missing: self.max_ok_missing,
            });
        }

        if usable > participants {
            warn!(
                usable,
                participants,
                "More responses than participants in this session; using the most recent"
            );
            return Ok(Quota {
                usable,
                participants,
                consumed: participants,
                clamped: true,
            });
        }

        Ok(Quota {
            usable,
            participants,
            consumed: usable,
            clamped: false,
        })
    }
}
