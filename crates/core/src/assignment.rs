//! Assignments — the cross-wired answers handed to one participant.

use serde::{Deserialize, Serialize};

/// One answer per category, each possibly from a different respondent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    answers: Vec<String>,
}

impl Assignment {
    pub fn new(answers: Vec<String>) -> Self {
        Self { answers }
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn get(&self, category: usize) -> Option<&str> {
        self.answers.get(category).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Assignment {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
