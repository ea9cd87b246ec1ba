#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod builder;
mod error;
mod name;
mod notes;
mod outline;
mod session;

pub use builder::{EXERCISE_RULES, LIFT_RULES, Rule, SWIM_RULES, Shape, Slot, build};
pub use error::Error;
pub use name::{Name, NameError};
pub use notes::Notes;
pub use outline::{Field, Group, Node, Outline, split_label};
pub use session::{
    DEFAULT_ZONE, Domain, Exercise, Session, Start, Stroke, Venue, Volume, VolumeError, Weight,
    WeightError, Work, WorkSet,
};
