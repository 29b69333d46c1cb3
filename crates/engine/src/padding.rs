//! Filler for participants who outnumber the generated consequences.

use consequences_config::RenderConfig;
use consequences_core::Assignment;

#[derive(Debug, Clone)]
pub struct DeficitPadder {
    dummy: Assignment,
}

impl DeficitPadder {
    pub fn new(dummy: Assignment) -> Self {
        Self { dummy }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.dummy.iter().cloned().collect())
    }

    pub fn dummy(&self) -> &Assignment {
        &self.dummy
    }

    /// Append copies of the filler until there is one assignment per
    /// participant. Never removes anything. Returns how many were appended.
    pub fn pad(&self, assignments: &mut Vec<Assignment>, participants: usize) -> usize {
        let deficit = participants.saturating_sub(assignments.len());
        assignments.extend(std::iter::repeat_n(self.dummy.clone(), deficit));
        deficit
    }
}
