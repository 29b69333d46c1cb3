//! Formats one consequence as a plain-text message body.

use consequences_config::{RenderConfig, CATEGORY_COUNT};
use consequences_core::{Assignment, GameError};

#[derive(Debug, Clone)]
pub struct ConsequenceRenderer {
    divider: String,
    outcome_intro: String,
}

impl ConsequenceRenderer {
    pub fn new(divider: impl Into<String>, outcome_intro: impl Into<String>) -> Self {
        Self {
            divider: divider.into(),
            outcome_intro: outcome_intro.into(),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.divider.clone(), config.outcome_intro.clone())
    }

    /// Render an assignment laid out as subject, object, location, subject
    /// utterance, object utterance, outcome.
    pub fn render(&self, assignment: &Assignment) -> Result<String, GameError> {
        let [subject, object, location, subject_said, object_said, outcome] = assignment.answers()
        else {
            return Err(GameError::CategoryLayoutMismatch {
                expected: CATEGORY_COUNT,
                found: assignment.len(),
            });
        };

        let divider = &self.divider;
        Ok([
            format!("'{subject}' met '{object}'"),
            "(at)".to_string(),
            location.clone(),
            divider.clone(),
            format!("{subject} said to {object}"),
            format!("\"{subject_said}\""),
            divider.clone(),
            format!("{object} said to {subject}"),
            format!("\"{object_said}\""),
            divider.clone(),
            self.outcome_intro.clone(),
            outcome.clone(),
        ]
        .join("\n"))
    }
}

impl Default for ConsequenceRenderer {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}
