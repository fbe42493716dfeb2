use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Free-text description of where and how something hurts.
///
/// Only emptiness is checked; the text is handed to the model as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PainDescription(String);

impl PainDescription {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::invalid_input("Pain description is required"));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PainDescription {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PainDescription> for String {
    fn from(value: PainDescription) -> Self {
        value.0
    }
}

impl fmt::Display for PainDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
