use derive_more::{AsRef, Display};

/// Venue name as printed in headlines and file listings: one line, inner
/// whitespace runs collapsed to a single space.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }
        if trimmed_name.contains(['\n', '\r']) {
            return Err(NameError::Multiline(trimmed_name.to_string()));
        }

        Ok(Name(
            trimmed_name.split_whitespace().collect::<Vec<_>>().join(" "),
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Venue name must fit on one line: {0:?}")]
    Multiline(String),
}
