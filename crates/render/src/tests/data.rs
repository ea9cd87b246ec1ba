use chrono::{NaiveDate, NaiveTime};
use logbook_domain::{
    Exercise, Name, Notes, Session, Start, Stroke, Venue, Volume, Weight, Work, WorkSet,
};

pub fn set(stroke: Option<Stroke>, summary: &str) -> WorkSet {
    WorkSet {
        stroke,
        summary: summary.to_string(),
        preparation: Notes::from("slept well"),
        structure: None,
        comments: None,
        times: None,
        video: None,
    }
}

pub fn swim(year: i32, month: u32, day: u32, volume: u32) -> Session {
    Session {
        start: Start::new(
            NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        ),
        kind: String::from("threshold"),
        venue: Venue {
            name: Name::new("Freibad Zürich").unwrap(),
            notes: Some(Notes::from("lanes were spacious")),
            spacious: true,
        },
        warmup: Some(Notes::from("easy 400")),
        work: Work::Swim {
            volume: Volume::from(volume),
            sets: vec![WorkSet {
                times: Some(Notes::from(vec!["1:32", "1:31"])),
                ..set(Some(Stroke::Free), "10x100 on 1:45")
            }],
        },
        cooldown: None,
        next: Some(Notes::from("try 1:40 send-off")),
        picture: None,
    }
}

pub fn exercise(kind: &str, weight: f64) -> Exercise {
    Exercise {
        kind: kind.to_string(),
        weight: Weight::new(weight).unwrap(),
        preparation: Notes::from(vec!["bar", "60"]),
        warmup: None,
        comments: Some(Notes::from("last rep slow")),
        video: None,
        next: Notes::from("same again"),
        thumbnail: None,
    }
}

pub fn lift(year: i32, month: u32, day: u32, exercises: &[(&str, f64)]) -> Session {
    Session {
        start: Start::new(
            NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            NaiveTime::from_hms_opt(18, 15, 0).unwrap(),
        ),
        kind: String::from("5x5"),
        venue: Venue {
            name: Name::new("Garage").unwrap(),
            notes: None,
            spacious: false,
        },
        warmup: Some(Notes::from("rowing")),
        work: Work::Lift {
            exercises: exercises
                .iter()
                .map(|(kind, weight)| exercise(kind, *weight))
                .collect(),
        },
        cooldown: None,
        next: None,
        picture: None,
    }
}
