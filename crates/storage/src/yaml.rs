use chrono::{NaiveDate, NaiveTime, Timelike};
use log::warn;
use logbook_domain::{self as domain, DEFAULT_ZONE};
use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// How note lists with a single line are written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NoteMode {
    /// Lists stay lists, so a reload gives back the same session.
    #[default]
    Preserve,
    /// Single-element lists are written as scalars.
    Collapse,
}

pub fn to_yaml(session: &domain::Session, mode: NoteMode) -> Result<String, Error> {
    let mut document = Session::from(session);
    if mode == NoteMode::Collapse {
        document.collapse();
    }
    Ok(quote_ambiguous_scalars(&serde_yaml::to_string(&vec![document])?))
}

pub fn from_yaml(input: &str) -> Result<Vec<domain::Session>, Error> {
    serde_yaml::from_str::<Vec<Session>>(input)?
        .into_iter()
        .map(domain::Session::try_from)
        .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Session {
    #[serde(rename = "type")]
    pub domain: Option<String>,
    pub start: Option<Start>,
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u32>,
    pub venue: Option<Venue>,
    #[serde(default, alias = "warm-up", skip_serializing_if = "Option::is_none")]
    pub warmup: Option<Section>,
    pub work: Option<Work>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Start {
    pub date: String,
    pub time: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Venue {
    pub name: String,
    #[serde(default, alias = "comments", skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub spacious: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Section {
    #[serde(default, alias = "comments", skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Work {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swimming: Option<Vec<Set>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<Lift>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Set {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<Note>,
    #[serde(default, alias = "comments", skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Note>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Lift {
    pub exercise: Option<String>,
    pub load: Option<Load>,
    pub preparation: Option<Note>,
    #[serde(default, alias = "warm-up", skip_serializing_if = "Option::is_none")]
    pub warmup: Option<Note>,
    #[serde(default, alias = "comments", skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Note>,
    pub next: Option<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Load {
    Number(f64),
    Text(String),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Note {
    Single(String),
    Many(Vec<String>),
}

impl Note {
    fn collapse(&mut self) {
        if let Note::Many(lines) = self {
            if lines.len() == 1 {
                *self = Note::Single(lines.remove(0));
            }
        }
    }
}

/// Hand-written files contain bare numbers and booleans as note lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNote {
    Single(Scalar),
    Many(Vec<Scalar>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(text) => text,
            Scalar::Integer(integer) => integer.to_string(),
            Scalar::Float(float) => float.to_string(),
            Scalar::Bool(boolean) => boolean.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawNote::deserialize(deserializer)? {
            RawNote::Single(scalar) => Note::Single(scalar.into()),
            RawNote::Many(scalars) => Note::Many(scalars.into_iter().map(String::from).collect()),
        })
    }
}

impl From<&domain::Notes> for Note {
    fn from(value: &domain::Notes) -> Self {
        match value {
            domain::Notes::Single(line) => Note::Single(line.clone()),
            domain::Notes::Many(lines) => Note::Many(lines.clone()),
        }
    }
}

impl From<Note> for domain::Notes {
    fn from(value: Note) -> Self {
        match value {
            Note::Single(line) => domain::Notes::Single(line),
            Note::Many(lines) => domain::Notes::Many(lines),
        }
    }
}

impl Session {
    fn collapse(&mut self) {
        let mut notes = vec![];
        if let Some(venue) = &mut self.venue {
            notes.extend(venue.note.as_mut());
        }
        for section in [&mut self.warmup, &mut self.cooldown].into_iter().flatten() {
            notes.extend(section.note.as_mut());
        }
        if let Some(work) = &mut self.work {
            notes.extend(work.preparation.as_mut());
            for set in work.swimming.iter_mut().flatten() {
                notes.extend(
                    [
                        set.preparation.as_mut(),
                        set.structure.as_mut(),
                        set.note.as_mut(),
                        set.times.as_mut(),
                        set.video.as_mut(),
                        set.next.as_mut(),
                    ]
                    .into_iter()
                    .flatten(),
                );
            }
            for lift in work.weights.iter_mut().flatten() {
                notes.extend(
                    [
                        lift.preparation.as_mut(),
                        lift.warmup.as_mut(),
                        lift.note.as_mut(),
                        lift.video.as_mut(),
                        lift.next.as_mut(),
                    ]
                    .into_iter()
                    .flatten(),
                );
            }
        }
        notes.extend(self.next.as_mut());
        for note in notes {
            note.collapse();
        }
    }
}

impl From<&domain::Session> for Session {
    fn from(value: &domain::Session) -> Self {
        let time = if value.start.time.second() == 0 {
            value.start.time.format("%H:%M")
        } else {
            value.start.time.format("%H:%M:%S")
        };
        Self {
            domain: Some(value.domain().to_string()),
            start: Some(Start {
                date: value.start.date.format("%Y-%m-%d").to_string(),
                time: format!("{time} {}", value.start.zone),
            }),
            kind: Some(value.kind.clone()),
            volume: value.volume().map(Into::into),
            venue: Some(Venue {
                name: value.venue.name.to_string(),
                note: value.venue.notes.as_ref().map(Note::from),
                spacious: value.venue.spacious,
            }),
            warmup: value.warmup.as_ref().map(|warmup| Section {
                note: Some(Note::from(warmup)),
            }),
            work: Some(match &value.work {
                domain::Work::Swim { sets, .. } => Work {
                    preparation: None,
                    swimming: Some(sets.iter().map(Set::from).collect()),
                    weights: None,
                },
                domain::Work::Lift { exercises } => Work {
                    preparation: None,
                    swimming: None,
                    weights: Some(exercises.iter().map(Lift::from).collect()),
                },
            }),
            cooldown: value.cooldown.as_ref().map(|cooldown| Section {
                note: Some(Note::from(cooldown)),
            }),
            next: value.next.as_ref().map(Note::from),
            picture: value.picture.clone(),
        }
    }
}

impl From<&domain::WorkSet> for Set {
    fn from(value: &domain::WorkSet) -> Self {
        Self {
            stroke: value.stroke.as_ref().map(ToString::to_string),
            summary: Some(value.summary.clone()),
            preparation: Some(Note::from(&value.preparation)),
            structure: value.structure.as_ref().map(Note::from),
            note: value.comments.as_ref().map(Note::from),
            times: value.times.as_ref().map(Note::from),
            video: value.video.as_ref().map(Note::from),
            next: None,
        }
    }
}

impl From<&domain::Exercise> for Lift {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            exercise: Some(value.kind.clone()),
            load: Some(Load::Number(*value.weight)),
            preparation: Some(Note::from(&value.preparation)),
            warmup: value.warmup.as_ref().map(Note::from),
            note: value.comments.as_ref().map(Note::from),
            video: value.video.as_ref().map(Note::from),
            next: Some(Note::from(&value.next)),
            thumbnail: value.thumbnail.clone(),
        }
    }
}

impl TryFrom<Session> for domain::Session {
    type Error = Error;

    fn try_from(value: Session) -> Result<Self, Self::Error> {
        let session_type = required(value.domain, "type")?
            .parse::<domain::Domain>()
            .map_err(|err| {
                Error::Domain(domain::Error::UnsupportedFormat(format!(
                    "unknown session type: {err}"
                )))
            })?;
        let start = required(value.start, "start")?;
        let venue = required(value.venue, "venue")?;
        let work = required(value.work, "work")?;
        let mut next = value.next.map(domain::Notes::from);

        let work = match (session_type, work.swimming, work.weights) {
            (domain::Domain::Swim, Some(swimming), None) => {
                let volume = value.volume.unwrap_or_else(|| {
                    warn!("swim session without volume");
                    0
                });
                let mut sets = vec![];
                for set in swimming {
                    let set_next = set.next.clone().map(domain::Notes::from);
                    sets.push(work_set(set, work.preparation.as_ref())?);
                    if next.is_none() {
                        next = set_next;
                    }
                }
                domain::Work::Swim {
                    volume: domain::Volume::from(volume),
                    sets,
                }
            }
            (domain::Domain::Lift, None, Some(weights)) => domain::Work::Lift {
                exercises: weights
                    .into_iter()
                    .map(domain::Exercise::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            },
            (domain::Domain::Swim, None, None) => return Err(missing("swimming")),
            (domain::Domain::Lift, None, None) => return Err(missing("weights")),
            (session_type, _, _) => {
                return Err(malformed(format!(
                    "{session_type} session with unexpected work"
                )));
            }
        };

        Ok(Self {
            start: start.try_into()?,
            kind: required(value.kind, "kind")?,
            venue: domain::Venue {
                name: domain::Name::new(&venue.name).map_err(domain::Error::from)?,
                notes: venue.note.map(domain::Notes::from),
                spacious: venue.spacious,
            },
            warmup: value
                .warmup
                .and_then(|warmup| warmup.note)
                .map(domain::Notes::from),
            work,
            cooldown: value
                .cooldown
                .and_then(|cooldown| cooldown.note)
                .map(domain::Notes::from),
            next,
            picture: value.picture,
        })
    }
}

impl TryFrom<Start> for domain::Start {
    type Error = Error;

    fn try_from(value: Start) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(value.date.trim(), "%Y-%m-%d")
            .map_err(|err| malformed(format!("invalid date \"{}\": {err}", value.date)))?;
        let (time, zone) = value
            .time
            .trim()
            .split_once(' ')
            .unwrap_or((value.time.trim(), DEFAULT_ZONE));
        let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .map_err(|err| malformed(format!("invalid time \"{}\": {err}", value.time)))?;
        Ok(Self {
            date,
            time,
            zone: zone.trim().to_string(),
        })
    }
}

fn work_set(value: Set, preparation: Option<&Note>) -> Result<domain::WorkSet, Error> {
    Ok(domain::WorkSet {
        stroke: value.stroke.as_deref().map(domain::Stroke::from),
        summary: required(value.summary, "summary")?,
        preparation: required(value.preparation.or_else(|| preparation.cloned()), "preparation")?
            .into(),
        structure: value.structure.map(domain::Notes::from),
        comments: value.note.map(domain::Notes::from),
        times: value.times.map(domain::Notes::from),
        video: value.video.map(domain::Notes::from),
    })
}

impl TryFrom<Lift> for domain::Exercise {
    type Error = Error;

    fn try_from(value: Lift) -> Result<Self, Self::Error> {
        let weight = match required(value.load, "load")? {
            Load::Number(number) => domain::Weight::new(number)
                .map_err(|err| malformed(format!("{err} ({number})")))?,
            Load::Text(text) => domain::Weight::try_from(text.as_str())
                .map_err(|err| malformed(format!("{err} (\"{text}\")")))?,
        };
        Ok(Self {
            kind: required(value.exercise, "exercise")?,
            weight,
            preparation: required(value.preparation, "preparation")?.into(),
            warmup: value.warmup.map(domain::Notes::from),
            comments: value.note.map(domain::Notes::from),
            video: value.video.map(domain::Notes::from),
            next: required(value.next, "next")?.into(),
            thumbnail: value.thumbnail,
        })
    }
}

/// Single-quotes plain scalars that YAML 1.1 readers would not load as
/// strings: timestamps, sexagesimal numbers and `yes`/`no`/`on`/`off`.
fn quote_ambiguous_scalars(yaml: &str) -> String {
    let mut out = String::with_capacity(yaml.len());
    let mut block_scalar_indent = None;
    for line in yaml.lines() {
        let indent = line.len() - line.trim_start().len();
        match block_scalar_indent {
            Some(parent) if line.trim().is_empty() || indent > parent => {
                out.push_str(line);
                out.push('\n');
                continue;
            }
            _ => block_scalar_indent = None,
        }

        let mut rest = line.trim_start();
        while let Some(item) = rest.strip_prefix("- ") {
            rest = item;
        }
        let value = if rest.starts_with(['\'', '"']) {
            None
        } else {
            match rest.split_once(": ") {
                Some((_, value)) => Some(value),
                None if rest.len() < line.trim_start().len() => Some(rest),
                None => None,
            }
        };
        match value {
            Some(value) if value.starts_with(['|', '>']) => {
                block_scalar_indent = Some(indent);
                out.push_str(line);
            }
            Some(value) if is_ambiguous(value) => {
                out.push_str(&line[..line.len() - value.len()]);
                out.push('\'');
                out.push_str(value);
                out.push('\'');
            }
            _ => out.push_str(line),
        }
        out.push('\n');
    }
    out
}

fn is_ambiguous(value: &str) -> bool {
    is_timestamp(value)
        || is_sexagesimal(value)
        || matches!(
            value.to_lowercase().as_str(),
            "y" | "n" | "yes" | "no" | "on" | "off"
        )
}

fn is_timestamp(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 8
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5].is_ascii_digit()
}

fn is_sexagesimal(value: &str) -> bool {
    let value = value.strip_prefix(['-', '+']).unwrap_or(value);
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let mut parts = whole.split(':');
    let first = parts.next().unwrap_or_default();
    let rest = parts.collect::<Vec<_>>();
    !rest.is_empty()
        && first.starts_with(|c: char| c.is_ascii_digit())
        && first.chars().all(|c| c.is_ascii_digit() || c == '_')
        && rest
            .iter()
            .all(|part| (1..=2).contains(&part.len()) && part.chars().all(|c| c.is_ascii_digit()))
        && fraction.chars().all(|c| c.is_ascii_digit() || c == '_')
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, Error> {
    value.ok_or_else(|| missing(name))
}

fn missing(name: &str) -> Error {
    Error::Domain(domain::Error::missing(name))
}

fn malformed(message: impl Into<String>) -> Error {
    Error::Domain(domain::Error::malformed(message))
}
