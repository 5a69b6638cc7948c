use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Operator-entered fields for one inventory label.
///
/// Category and title are required; subtitle and description may be blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub category: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

impl LabelSpec {
    pub fn new(
        category: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            description: description.into(),
        }
    }

    /// Trim surrounding whitespace from every field.
    pub fn normalized(self) -> Self {
        Self {
            category: self.category.trim().to_string(),
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("category must not be blank"));
        }
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title must not be blank"));
        }
        Ok(())
    }
}

/// Free-text content for a plain (non-inventory) label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlainLabel(String);

impl PlainLabel {
    pub fn new(text: impl AsRef<str>) -> DomainResult<Self> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(DomainError::validation("label must not be blank"));
        }
        Ok(Self(text.to_string()))
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PlainLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Name of a serialized label: the title suffixed with the zero-padded
/// serial (three digits minimum, wider serials are kept whole).
pub fn serial_name(title: &str, serial: u64) -> String {
    format!("{title}{serial:03}")
}
