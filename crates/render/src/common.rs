use chrono::{NaiveDate, NaiveTime, Timelike};
use logbook_domain::{Notes, Session, Stroke, Work, WorkSet};

use crate::{RenderError, WeightFormat};

/// Formats a time as `2pm`, `2.05pm` or `9.30am`.
#[must_use]
pub fn time_ampm(time: NaiveTime) -> String {
    let minutes = if time.minute() > 0 {
        time.format(".%M").to_string()
    } else {
        String::new()
    };
    format!("{}{minutes}{}", time.format("%-I"), time.format("%P"))
}

/// Upper-cases the first character only.
#[must_use]
pub fn capitalise(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[must_use]
pub fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

#[must_use]
pub fn weekday(date: NaiveDate) -> String {
    date.format("%a").to_string().chars().take(2).collect()
}

/// Lowercase ASCII name of a venue's icon, without extension.
#[must_use]
pub fn venue_icon(name: &str) -> String {
    deunicode::deunicode(name).to_lowercase()
}

/// Replaces non-ASCII characters by decimal XML character references.
#[must_use]
pub fn char_refs(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_string()
            } else {
                format!("&#{};", u32::from(c))
            }
        })
        .collect()
}

#[must_use]
pub fn format_weight(weight: f64, format: WeightFormat) -> String {
    match format {
        WeightFormat::Shortest => significant(weight, 6),
        WeightFormat::Significant => significant(weight, 4),
        WeightFormat::Integer => format!("{:.0}", weight.trunc()),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let formatted = format!("{value:.decimals$}");
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Landing page colour class and kind prefix, if all sets share one stroke.
#[must_use]
pub fn stroke_class(sets: &[WorkSet]) -> (String, String) {
    let mut strokes = sets
        .iter()
        .filter_map(|set| set.stroke.as_ref())
        .collect::<Vec<_>>();
    strokes.sort();
    strokes.dedup();
    match strokes.as_slice() {
        [stroke @ (Stroke::Fly | Stroke::Back | Stroke::Breast | Stroke::Free)] => {
            (format!("{stroke}200"), format!("{stroke} "))
        }
        [Stroke::Medley] => (String::from("im200"), String::from("IM ")),
        _ => (String::from("other"), String::new()),
    }
}

/// The `time, venue[, strokes], kind[, volume]` line of diary pages.
#[must_use]
pub fn headline(session: &Session) -> String {
    let mut parts = vec![
        time_ampm(session.start.time),
        session.venue.name.to_string(),
    ];
    let strokes = session
        .strokes()
        .iter()
        .map(|stroke| stroke.as_str())
        .collect::<Vec<_>>();
    if !strokes.is_empty() {
        parts.push(strokes.join("-"));
    }
    parts.push(session.kind.clone());
    if let Some(volume) = session.volume() {
        parts.push(format!("{volume}m"));
    }
    parts.join(", ")
}

pub fn swim(session: &Session) -> Result<(u32, &[WorkSet]), RenderError> {
    match &session.work {
        Work::Swim { volume, sets } => Ok((**volume, sets)),
        Work::Lift { .. } => Err(RenderError::MissingField("volume")),
    }
}

pub fn lifts(session: &Session) -> Result<&[logbook_domain::Exercise], RenderError> {
    session
        .exercises()
        .ok_or(RenderError::MissingField("weights"))
}

/// Joins note lines with `separator`, capitalising a single line.
#[must_use]
pub fn prose(notes: &Notes, separator: &str) -> String {
    match notes {
        Notes::Single(line) => capitalise(line),
        Notes::Many(lines) => capitalise(&lines.join(separator)),
    }
}
