#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::collections::BTreeMap;

mod common;
mod html;
mod landing;
mod listing;
mod settings;
mod table;
mod text;

pub use common::{capitalise, format_weight, short_date, time_ampm, venue_icon, weekday};
pub use html::diary as html_diary;
pub use landing::{Entry, landing};
pub use listing::listing;
pub use settings::{DEFAULT_LIFT_ORDER, NoteStyle, Settings, WeightFormat};
pub use table::{database, summary, totals};
pub use text::diary as text_diary;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("missing \"{0}\"")]
    MissingField(&'static str),
    #[error("unknown exercise kind \"{0}\"")]
    UnknownKind(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Pictures referenced from a diary page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pictures {
    /// Shown at the end of the page, in place of the session's own picture.
    pub session: Option<String>,
    /// Shown after the exercise of the given kind on a lift page.
    pub kinds: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    pub mod data;
}
