use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use log::{debug, warn};

use crate::{
    Domain, Error, Exercise, Field, Group, Name, Node, Notes, Outline, Session, Start, Stroke,
    Venue, Volume, Weight, Work, WorkSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    One,
    Notes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Slot {
    Time,
    Kind,
    Venue,
    #[strum(serialize = "warm-up")]
    Warmup,
    Next,
    Volume,
    Stroke,
    Summary,
    Preparation,
    Structure,
    Comments,
    Times,
    Video,
    Weight,
    Thumbnail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub label: &'static str,
    pub slot: Slot,
    pub shape: Shape,
    pub required: bool,
}

const fn rule(label: &'static str, slot: Slot, shape: Shape, required: bool) -> Rule {
    Rule {
        label,
        slot,
        shape,
        required,
    }
}

pub const SWIM_RULES: &[Rule] = &[
    rule("time", Slot::Time, Shape::One, true),
    rule("kind", Slot::Kind, Shape::One, true),
    rule("venue", Slot::Venue, Shape::Notes, true),
    rule("warm-up", Slot::Warmup, Shape::Notes, true),
    rule("preparation", Slot::Preparation, Shape::Notes, true),
    rule("summary", Slot::Summary, Shape::One, true),
    rule("next", Slot::Next, Shape::Notes, true),
    rule("volume", Slot::Volume, Shape::One, true),
    rule("stroke", Slot::Stroke, Shape::One, false),
    rule("structure", Slot::Structure, Shape::Notes, false),
    rule("comments", Slot::Comments, Shape::Notes, false),
    rule("note", Slot::Comments, Shape::Notes, false),
    rule("times", Slot::Times, Shape::Notes, false),
    rule("video", Slot::Video, Shape::Notes, false),
];

pub const LIFT_RULES: &[Rule] = &[
    rule("time", Slot::Time, Shape::One, true),
    rule("kind", Slot::Kind, Shape::One, true),
    rule("venue", Slot::Venue, Shape::Notes, true),
    rule("warm-up", Slot::Warmup, Shape::Notes, true),
    rule("next", Slot::Next, Shape::Notes, false),
];

pub const EXERCISE_RULES: &[Rule] = &[
    rule("preparation", Slot::Preparation, Shape::Notes, true),
    rule("next", Slot::Next, Shape::Notes, true),
    rule("weight", Slot::Weight, Shape::One, false),
    rule("warm-up", Slot::Warmup, Shape::Notes, false),
    rule("comments", Slot::Comments, Shape::Notes, false),
    rule("note", Slot::Comments, Shape::Notes, false),
    rule("video", Slot::Video, Shape::Notes, false),
    rule("thumbnail", Slot::Thumbnail, Shape::One, false),
];

const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M%p", "%I:%M %p"];

/// Builds a session from an outline and the date the outline was recorded on.
pub fn build(outline: &Outline, date: NaiveDate) -> Result<Session, Error> {
    let domain = outline.title.trim().parse::<Domain>().map_err(|_| {
        Error::UnsupportedFormat(format!("unknown session type \"{}\"", outline.title))
    })?;
    debug!("building {domain} session for {date}");
    match domain {
        Domain::Swim => build_swim(outline, date),
        Domain::Lift => build_lift(outline, date),
    }
}

fn build_swim(outline: &Outline, date: NaiveDate) -> Result<Session, Error> {
    let fields = outline
        .nodes
        .iter()
        .map(|node| match node {
            Node::Field(field) => Ok(field),
            Node::Group(group) => Err(Error::malformed(format!(
                "unexpected nested outline \"{}\" in swim session",
                group.label
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let mut slots = dispatch(SWIM_RULES, fields)?;

    let volume = Volume::try_from(slots.required_one(Slot::Volume)?.as_str())
        .map_err(|err| Error::malformed(err.to_string()))?;
    let set = WorkSet {
        stroke: slots
            .one(Slot::Stroke)
            .map(|stroke| Stroke::from(stroke.as_str())),
        summary: slots.required_one(Slot::Summary)?,
        preparation: slots.required_notes(Slot::Preparation)?,
        structure: slots.notes(Slot::Structure),
        comments: slots.notes(Slot::Comments),
        times: slots.notes(Slot::Times),
        video: slots.notes(Slot::Video),
    };

    Ok(Session {
        start: Start::new(date, parse_time(&slots.required_one(Slot::Time)?)?),
        kind: slots.required_one(Slot::Kind)?,
        venue: venue(slots.required_lines(Slot::Venue)?)?,
        warmup: slots.notes(Slot::Warmup),
        work: Work::Swim {
            volume,
            sets: vec![set],
        },
        cooldown: None,
        next: slots.notes(Slot::Next),
        picture: None,
    })
}

fn build_lift(outline: &Outline, date: NaiveDate) -> Result<Session, Error> {
    let mut fields = vec![];
    let mut groups = vec![];
    for node in &outline.nodes {
        match node {
            Node::Field(field) => fields.push(field),
            Node::Group(group) => groups.push(group),
        }
    }
    let mut slots = dispatch(LIFT_RULES, fields)?;
    let exercises = groups
        .into_iter()
        .map(build_exercise)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Session {
        start: Start::new(date, parse_time(&slots.required_one(Slot::Time)?)?),
        kind: slots.required_one(Slot::Kind)?,
        venue: venue(slots.required_lines(Slot::Venue)?)?,
        warmup: slots.notes(Slot::Warmup),
        work: Work::Lift { exercises },
        cooldown: None,
        next: slots.notes(Slot::Next),
        picture: None,
    })
}

fn build_exercise(group: &Group) -> Result<Exercise, Error> {
    let mut slots = dispatch(EXERCISE_RULES, &group.fields)?;

    let weight = match (group.weight.as_deref(), slots.one(Slot::Weight)) {
        (Some(_), Some(_)) => {
            return Err(Error::Shape {
                label: String::from("weight"),
                count: 2,
            });
        }
        (Some(weight), None) => parse_weight(weight)?,
        (None, Some(weight)) => parse_weight(&weight)?,
        (None, None) => return Err(Error::missing("weight")),
    };

    Ok(Exercise {
        kind: group.kind.clone(),
        weight,
        preparation: slots.required_notes(Slot::Preparation)?,
        warmup: slots.notes(Slot::Warmup),
        comments: slots.notes(Slot::Comments),
        video: slots.notes(Slot::Video),
        next: slots.required_notes(Slot::Next)?,
        thumbnail: slots.one(Slot::Thumbnail),
    })
}

/// Values gathered per slot after checking labels against a dispatch table.
struct Slots(BTreeMap<Slot, Vec<String>>);

impl Slots {
    fn lines(&mut self, slot: Slot) -> Option<Vec<String>> {
        self.0.remove(&slot)
    }

    fn one(&mut self, slot: Slot) -> Option<String> {
        self.lines(slot).and_then(|mut lines| lines.pop())
    }

    fn notes(&mut self, slot: Slot) -> Option<Notes> {
        self.lines(slot).and_then(Notes::from_lines)
    }

    fn required_lines(&mut self, slot: Slot) -> Result<Vec<String>, Error> {
        self.lines(slot)
            .ok_or_else(|| Error::missing(slot.as_ref()))
    }

    fn required_one(&mut self, slot: Slot) -> Result<String, Error> {
        self.one(slot).ok_or_else(|| Error::missing(slot.as_ref()))
    }

    fn required_notes(&mut self, slot: Slot) -> Result<Notes, Error> {
        self.notes(slot).ok_or_else(|| Error::missing(slot.as_ref()))
    }
}

fn dispatch<'a>(
    rules: &[Rule],
    fields: impl IntoIterator<Item = &'a Field>,
) -> Result<Slots, Error> {
    let mut slots = BTreeMap::new();

    for field in fields {
        let rule = rules
            .iter()
            .find(|rule| rule.label == field.label)
            .ok_or_else(|| Error::UnknownLabel(field.label.clone()))?;
        if field.lines.is_empty() {
            return Err(Error::malformed(format!(
                "outline \"{}\" has no lines",
                field.label
            )));
        }
        if rule.shape == Shape::One && field.lines.len() > 1 {
            return Err(Error::Shape {
                label: field.label.clone(),
                count: field.lines.len(),
            });
        }
        if field.lines.iter().any(String::is_empty) {
            warn!("empty note in \"{}\"", field.label);
        }
        if slots.insert(rule.slot, field.lines.clone()).is_some() {
            return Err(Error::malformed(format!(
                "\"{}\" given more than once",
                rule.slot.as_ref()
            )));
        }
    }

    if let Some(rule) = rules
        .iter()
        .find(|rule| rule.required && !slots.contains_key(&rule.slot))
    {
        return Err(Error::missing(rule.label));
    }

    Ok(Slots(slots))
}

/// Name in the first line, notes in the rest. Blank note lines are skipped.
fn venue(mut lines: Vec<String>) -> Result<Venue, Error> {
    let mut notes = lines.split_off(1.min(lines.len()));
    notes.retain(|line| !line.trim().is_empty());
    let name = lines.pop().ok_or_else(|| Error::missing("venue"))?;
    Ok(Venue::new(Name::new(&name)?, Notes::from_lines(notes)))
}

fn parse_time(value: &str) -> Result<NaiveTime, Error> {
    let value = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .or_else(|| parse_hour(value))
        .ok_or_else(|| Error::malformed(format!("invalid time \"{value}\"")))
}

/// Full hours like `7am` or `11 pm`.
fn parse_hour(value: &str) -> Option<NaiveTime> {
    let (hour, suffix) = value.split_at(value.find(|c: char| !c.is_ascii_digit())?);
    NaiveTime::parse_from_str(&format!("{hour}:00 {}", suffix.trim()), "%I:%M %p").ok()
}

fn parse_weight(value: &str) -> Result<Weight, Error> {
    Weight::try_from(value).map_err(|err| Error::malformed(format!("{err} (\"{value}\")")))
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn swim_fields() -> Vec<Field> {
        vec![
            Field::new("time", &["07:30"]),
            Field::new("kind", &["technique"]),
            Field::new("venue", &["Bondi", "lanes were spacious"]),
            Field::new("warm-up", &["easy 400"]),
            Field::new("preparation", &["slept well", "light breakfast"]),
            Field::new("stroke", &["free"]),
            Field::new("summary", &["8x100 on 1:50"]),
            Field::new("structure", &["25 drill, 75 swim"]),
            Field::new("times", &["1:35", "1:36"]),
            Field::new("next", &["same again"]),
            Field::new("volume", &["2400m"]),
        ]
    }

    fn swim_outline(fields: Vec<Field>) -> Outline {
        Outline {
            title: String::from("swim"),
            nodes: fields.into_iter().map(Node::Field).collect(),
        }
    }

    fn lift_outline() -> Outline {
        Outline {
            title: String::from("lift"),
            nodes: vec![
                Node::Field(Field::new("time", &["18:00"])),
                Node::Field(Field::new("kind", &["5x5"])),
                Node::Field(Field::new("venue", &["Gym"])),
                Node::Field(Field::new("warm-up", &["bike"])),
                Node::Group(Group::new(
                    "squat 100",
                    vec![
                        Field::new("preparation", &["bar only", "60", "80"]),
                        Field::new("next", &["102.5"]),
                    ],
                )),
                Node::Group(Group::new(
                    "pull-up",
                    vec![
                        Field::new("weight", &["0"]),
                        Field::new("preparation", &["hang"]),
                        Field::new("note", &["grip slipped"]),
                        Field::new("next", &["add 2.5"]),
                    ],
                )),
            ],
        }
    }

    #[test]
    fn test_build_swim() {
        let session = build(&swim_outline(swim_fields()), date()).unwrap();
        assert_eq!(
            session,
            Session {
                start: Start::new(date(), NaiveTime::from_hms_opt(7, 30, 0).unwrap()),
                kind: String::from("technique"),
                venue: Venue {
                    name: Name::new("Bondi").unwrap(),
                    notes: Some(Notes::from("lanes were spacious")),
                    spacious: true,
                },
                warmup: Some(Notes::from("easy 400")),
                work: Work::Swim {
                    volume: Volume::from(2400),
                    sets: vec![WorkSet {
                        stroke: Some(Stroke::Free),
                        summary: String::from("8x100 on 1:50"),
                        preparation: Notes::from(vec!["slept well", "light breakfast"]),
                        structure: Some(Notes::from("25 drill, 75 swim")),
                        comments: None,
                        times: Some(Notes::from(vec!["1:35", "1:36"])),
                        video: None,
                    }],
                },
                cooldown: None,
                next: Some(Notes::from("same again")),
                picture: None,
            }
        );
    }

    #[test]
    fn test_build_swim_note_alias() {
        let mut fields = swim_fields();
        fields.push(Field::new("note", &["felt strong"]));
        let session = build(&swim_outline(fields), date()).unwrap();
        assert_eq!(
            session.sets().unwrap()[0].comments,
            Some(Notes::from("felt strong"))
        );
    }

    #[test]
    fn test_build_empty_lines() {
        let mut fields = swim_fields();
        fields[2] = Field::new("venue", &["Bondi", ""]);
        fields[3] = Field::new("warm-up", &[""]);
        let session = build(&swim_outline(fields), date()).unwrap();
        assert_eq!(session.venue.notes, None);
        assert_eq!(session.warmup, Some(Notes::from("")));
    }

    #[test]
    fn test_build_lift() {
        let session = build(&lift_outline(), date()).unwrap();
        assert_eq!(session.start.time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(session.next, None);
        assert!(!session.venue.spacious);
        let exercises = session.exercises().unwrap();
        assert_eq!(
            exercises.iter().map(|e| e.kind.as_str()).collect::<Vec<_>>(),
            vec!["squat", "pull-up"]
        );
        assert_approx_eq!(*exercises[0].weight, 100.0);
        assert_approx_eq!(*exercises[1].weight, 0.0);
        assert_eq!(
            exercises[0].preparation,
            Notes::from(vec!["bar only", "60", "80"])
        );
        assert_eq!(exercises[1].comments, Some(Notes::from("grip slipped")));
        assert_eq!(exercises[1].next, Notes::from("add 2.5"));
    }

    #[rstest]
    #[case("07:30", NaiveTime::from_hms_opt(7, 30, 0))]
    #[case("14:05:30", NaiveTime::from_hms_opt(14, 5, 30))]
    #[case("2:05pm", NaiveTime::from_hms_opt(14, 5, 0))]
    #[case("9:30 AM", NaiveTime::from_hms_opt(9, 30, 0))]
    #[case("7am", NaiveTime::from_hms_opt(7, 0, 0))]
    #[case("11 pm", NaiveTime::from_hms_opt(23, 0, 0))]
    #[case("noon", None)]
    fn test_parse_time(#[case] value: &str, #[case] expected: Option<NaiveTime>) {
        assert_eq!(parse_time(value).ok(), expected);
    }

    #[test]
    fn test_build_unknown_domain() {
        let outline = Outline {
            title: String::from("run"),
            nodes: vec![],
        };
        assert!(matches!(
            build(&outline, date()),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_build_stroke_with_many_values() {
        let mut fields = swim_fields();
        fields[5] = Field::new("stroke", &["free", "back"]);
        assert_eq!(
            build(&swim_outline(fields), date()),
            Err(Error::Shape {
                label: String::from("stroke"),
                count: 2
            })
        );
    }

    #[test]
    fn test_build_missing_summary() {
        let fields = swim_fields()
            .into_iter()
            .filter(|f| f.label != "summary")
            .collect();
        assert_eq!(
            build(&swim_outline(fields), date()),
            Err(Error::MissingField(String::from("summary")))
        );
    }

    #[test]
    fn test_build_reports_first_missing_in_table_order() {
        let fields = swim_fields()
            .into_iter()
            .filter(|f| !matches!(f.label.as_str(), "volume" | "warm-up" | "next"))
            .collect();
        assert_eq!(
            build(&swim_outline(fields), date()),
            Err(Error::MissingField(String::from("warm-up")))
        );
    }

    #[test]
    fn test_build_unknown_label() {
        let mut fields = swim_fields();
        fields.push(Field::new("cool-down", &["easy 200"]));
        assert_eq!(
            build(&swim_outline(fields), date()),
            Err(Error::UnknownLabel(String::from("cool-down")))
        );
    }

    #[test]
    fn test_build_comments_and_note() {
        let mut fields = swim_fields();
        fields.push(Field::new("comments", &["a"]));
        fields.push(Field::new("note", &["b"]));
        assert!(matches!(
            build(&swim_outline(fields), date()),
            Err(Error::MalformedInput(_))
        ));
    }

    #[rstest]
    #[case(Field::new("time", &["late"]))]
    #[case(Field::new("volume", &["far"]))]
    #[case(Field::new("venue", &[" "]))]
    #[case(Field::new("kind", &[]))]
    fn test_build_malformed_value(#[case] field: Field) {
        let mut fields = swim_fields()
            .into_iter()
            .filter(|f| f.label != field.label)
            .collect::<Vec<_>>();
        fields.push(field);
        assert!(matches!(
            build(&swim_outline(fields), date()),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_build_group_in_swim_session() {
        let mut outline = swim_outline(swim_fields());
        outline.nodes.push(Node::Group(Group::new("squat 100", vec![])));
        assert!(matches!(
            build(&outline, date()),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_build_exercise_with_two_weights() {
        let mut outline = lift_outline();
        outline.nodes[4] = Node::Group(Group::new(
            "squat 100",
            vec![
                Field::new("weight", &["100"]),
                Field::new("preparation", &["bar"]),
                Field::new("next", &["same"]),
            ],
        ));
        assert_eq!(
            build(&outline, date()),
            Err(Error::Shape {
                label: String::from("weight"),
                count: 2
            })
        );
    }

    #[test]
    fn test_build_exercise_without_weight() {
        let mut outline = lift_outline();
        outline.nodes[4] = Node::Group(Group::new(
            "squat",
            vec![
                Field::new("preparation", &["bar"]),
                Field::new("next", &["same"]),
            ],
        ));
        assert_eq!(
            build(&outline, date()),
            Err(Error::MissingField(String::from("weight")))
        );
    }

    #[test]
    fn test_build_exercise_missing_next() {
        let mut outline = lift_outline();
        outline.nodes[4] = Node::Group(Group::new(
            "squat 100",
            vec![Field::new("preparation", &["bar"])],
        ));
        assert_eq!(
            build(&outline, date()),
            Err(Error::MissingField(String::from("next")))
        );
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(Slot::Warmup.as_ref(), "warm-up");
        assert_eq!(Slot::Preparation.as_ref(), "preparation");
    }
}
