use std::{convert::Infallible, fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use derive_more::{Deref, Display, Into};

use crate::{Name, Notes};

pub const DEFAULT_ZONE: &str = "CEST";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Domain {
    Swim,
    Lift,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub start: Start,
    pub kind: String,
    pub venue: Venue,
    pub warmup: Option<Notes>,
    pub work: Work,
    pub cooldown: Option<Notes>,
    pub next: Option<Notes>,
    /// Image shown at the end of the diary page.
    pub picture: Option<String>,
}

impl Session {
    #[must_use]
    pub fn domain(&self) -> Domain {
        match self.work {
            Work::Swim { .. } => Domain::Swim,
            Work::Lift { .. } => Domain::Lift,
        }
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.start.date
    }

    #[must_use]
    pub fn volume(&self) -> Option<Volume> {
        match self.work {
            Work::Swim { volume, .. } => Some(volume),
            Work::Lift { .. } => None,
        }
    }

    #[must_use]
    pub fn sets(&self) -> Option<&[WorkSet]> {
        match &self.work {
            Work::Swim { sets, .. } => Some(sets),
            Work::Lift { .. } => None,
        }
    }

    #[must_use]
    pub fn exercises(&self) -> Option<&[Exercise]> {
        match &self.work {
            Work::Swim { .. } => None,
            Work::Lift { exercises } => Some(exercises),
        }
    }

    #[must_use]
    pub fn strokes(&self) -> Vec<&Stroke> {
        self.sets()
            .unwrap_or_default()
            .iter()
            .filter_map(|set| set.stroke.as_ref())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Start {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub zone: String,
}

impl Start {
    #[must_use]
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            time,
            zone: DEFAULT_ZONE.to_string(),
        }
    }

    #[must_use]
    pub fn datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    pub name: Name,
    pub notes: Option<Notes>,
    pub spacious: bool,
}

impl Venue {
    /// The spacious flag is derived from the notes by substring match.
    #[must_use]
    pub fn new(name: Name, notes: Option<Notes>) -> Self {
        let spacious = notes.as_ref().is_some_and(|n| n.contains("spacious"));
        Self {
            name,
            notes,
            spacious,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Work {
    Swim { volume: Volume, sets: Vec<WorkSet> },
    Lift { exercises: Vec<Exercise> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkSet {
    pub stroke: Option<Stroke>,
    pub summary: String,
    pub preparation: Notes,
    pub structure: Option<Notes>,
    pub comments: Option<Notes>,
    pub times: Option<Notes>,
    pub video: Option<Notes>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub kind: String,
    pub weight: Weight,
    pub preparation: Notes,
    pub warmup: Option<Notes>,
    pub comments: Option<Notes>,
    pub video: Option<Notes>,
    pub next: Notes,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stroke {
    Fly,
    Back,
    Breast,
    Free,
    Medley,
    Other(String),
}

impl Stroke {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Stroke::Fly => "fly",
            Stroke::Back => "back",
            Stroke::Breast => "breast",
            Stroke::Free => "free",
            Stroke::Medley => "IM",
            Stroke::Other(other) => other,
        }
    }
}

impl From<&str> for Stroke {
    fn from(value: &str) -> Self {
        match value {
            "fly" => Stroke::Fly,
            "back" => Stroke::Back,
            "breast" => Stroke::Breast,
            "free" => Stroke::Free,
            "IM" => Stroke::Medley,
            other => Stroke::Other(other.to_string()),
        }
    }
}

impl FromStr for Stroke {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Stroke::from(s))
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deref, Display, Into, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Volume(u32);

impl From<u32> for Volume {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl TryFrom<&str> for Volume {
    type Error = VolumeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        value
            .strip_suffix('m')
            .unwrap_or(value)
            .trim_end()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| VolumeError::ParseError(value.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum VolumeError {
    #[error("Volume must be a whole number of meters (\"{0}\")")]
    ParseError(String),
}

#[derive(Deref, Into, Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Weight(f64);

impl Weight {
    pub fn new(value: f64) -> Result<Self, WeightError> {
        if !value.is_finite() || value < 0.0 {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        match value.strip_suffix("kg").unwrap_or(value).trim_end().parse::<f64>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be a non-negative number of kg")]
    OutOfRange,
    #[error("Weight must be a decimal")]
    ParseError,
}
