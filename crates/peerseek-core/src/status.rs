//! Status records, the unit of output shown to the operator.

use serde::{Deserialize, Serialize};

/// How a status line should be presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Plain progress narration.
    #[default]
    Neutral,
    /// Something is happening that moves the lookup forward.
    Active,
    Success,
    Error,
}

/// One line of console output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub text: String,
    pub category: Category,
    /// Stable handle so a front end can replace the line later.
    pub id: Option<String>,
}

impl StatusRecord {
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
            id: None,
        }
    }

    pub fn neutral(text: impl Into<String>) -> Self {
        Self::new(text, Category::Neutral)
    }

    pub fn active(text: impl Into<String>) -> Self {
        Self::new(text, Category::Active)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, Category::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Category::Error)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
