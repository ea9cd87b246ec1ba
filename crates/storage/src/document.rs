use chrono::NaiveDateTime;
use log::{debug, warn};
use logbook_domain::{
    self as domain, DEFAULT_ZONE, Domain, Exercise, Name, Notes, Session, Start, Stroke, Venue,
    Volume, Weight, Work, WorkSet,
};

use crate::{Error, xml::Element};

const START_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn to_xml(session: &Session) -> Result<String, Error> {
    let mut meta = Element::new("meta")
        .with_attribute("type", session.domain().to_string())
        .with_attribute(
            "start",
            session.start.datetime().format(START_FORMAT).to_string(),
        )
        .with_attribute("zone", session.start.zone.as_str())
        .with_attribute("kind", session.kind.as_str());
    if let Some(volume) = session.volume() {
        meta = meta.with_attribute("volume", volume.to_string());
    }

    let mut venue = notes_element("venue", session.venue.notes.as_ref())
        .unwrap_or_else(|| Element::new("venue"));
    venue.attributes.push((
        String::from("name"),
        session.venue.name.as_str().to_string(),
    ));
    if session.venue.spacious {
        venue.attributes.push((String::from("spacious"), String::from("yes")));
    }

    let mut root = Element::new("session").with_child(meta).with_child(venue);
    root.children
        .extend(notes_element("warmup", session.warmup.as_ref()));
    root.children.push(Element::new("work").with_child(match &session.work {
        Work::Swim { sets, .. } => sets
            .iter()
            .fold(Element::new("swimming"), |e, set| e.with_child(set_element(set))),
        Work::Lift { exercises } => exercises
            .iter()
            .fold(Element::new("lifting"), |e, exercise| {
                e.with_child(lift_element(exercise))
            }),
    }));
    root.children
        .extend(notes_element("cooldown", session.cooldown.as_ref()));
    root.children
        .extend(notes_element("next", session.next.as_ref()));
    root.children.extend(
        session
            .picture
            .as_ref()
            .map(|picture| Element::new("picture").with_text(picture.as_str())),
    );

    crate::xml::write(&root)
}

fn set_element(set: &WorkSet) -> Element {
    let mut element = Element::new("set");
    if let Some(stroke) = &set.stroke {
        element = element.with_attribute("stroke", stroke.as_str());
    }
    element.children.extend(
        [
            notes_element("preparation", Some(&set.preparation)),
            Some(Element::new("summary").with_text(set.summary.as_str())),
            notes_element("structure", set.structure.as_ref()),
            notes_element("comments", set.comments.as_ref()),
            notes_element("times", set.times.as_ref()),
            notes_element("video", set.video.as_ref()),
        ]
        .into_iter()
        .flatten(),
    );
    element
}

fn lift_element(exercise: &Exercise) -> Element {
    let mut element = Element::new("lift")
        .with_attribute("kind", exercise.kind.as_str())
        .with_attribute("weight", format!("{}", *exercise.weight));
    element.children.extend(
        [
            notes_element("preparation", Some(&exercise.preparation)),
            notes_element("warm-up", exercise.warmup.as_ref()),
            notes_element("comments", exercise.comments.as_ref()),
            notes_element("video", exercise.video.as_ref()),
            notes_element("next", Some(&exercise.next)),
            exercise
                .thumbnail
                .as_ref()
                .map(|thumbnail| Element::new("thumbnail").with_text(thumbnail.as_str())),
        ]
        .into_iter()
        .flatten(),
    );
    element
}

fn notes_element(name: &str, notes: Option<&Notes>) -> Option<Element> {
    notes.map(|notes| match notes {
        Notes::Single(line) => Element::new(name).with_text(line.as_str()),
        Notes::Many(lines) => lines.iter().fold(Element::new(name), |e, line| {
            e.with_child(Element::new("note").with_text(line.as_str()))
        }),
    })
}

pub fn from_xml(input: &str) -> Result<Session, Error> {
    let root = crate::xml::parse(input)?;
    if root.name != "session" {
        return Err(malformed(format!("unexpected root element \"{}\"", root.name)));
    }
    expect_children(
        &root,
        &["meta", "venue", "warmup", "work", "cooldown", "next", "picture"],
    )?;

    let meta = required_child(&root, "meta")?;
    let domain = required_attribute(meta, "type")?
        .parse::<Domain>()
        .map_err(|_| {
            Error::Domain(domain::Error::UnsupportedFormat(format!(
                "unknown session type \"{}\"",
                meta.attribute("type").unwrap_or_default()
            )))
        })?;
    let start = NaiveDateTime::parse_from_str(required_attribute(meta, "start")?, START_FORMAT)
        .map_err(|err| malformed(format!("invalid start: {err}")))?;
    let zone = meta.attribute("zone").unwrap_or_else(|| {
        debug!("no zone given, assuming {DEFAULT_ZONE}");
        DEFAULT_ZONE
    });

    let venue = required_child(&root, "venue")?;
    let venue = Venue {
        name: Name::new(required_attribute(venue, "name")?).map_err(domain::Error::from)?,
        notes: venue_notes(venue)?,
        spacious: venue.attribute("spacious").is_some_and(is_yes),
    };

    let work = required_child(&root, "work")?;
    let payload = match work.children.as_slice() {
        [payload] => payload,
        _ => return Err(malformed("work must contain exactly one element")),
    };
    let mut next = optional_notes(&root, "next")?;
    let work = match (domain, payload.name.as_str()) {
        (Domain::Swim, "swimming") => {
            let volume = match meta.attribute("volume") {
                Some(volume) => Volume::try_from(volume)
                    .map_err(|err| malformed(err.to_string()))?,
                None => {
                    warn!("swim session without volume");
                    Volume::default()
                }
            };
            let mut sets = vec![];
            for element in &payload.children {
                let (set, set_next) = set(element)?;
                if next.is_none() {
                    next = set_next;
                }
                sets.push(set);
            }
            Work::Swim { volume, sets }
        }
        (Domain::Lift, "lifting" | "weights") => Work::Lift {
            exercises: payload
                .children
                .iter()
                .map(exercise)
                .collect::<Result<Vec<_>, _>>()?,
        },
        (domain, name) => {
            return Err(malformed(format!(
                "{domain} session with \"{name}\" work"
            )));
        }
    };

    Ok(Session {
        start: Start {
            date: start.date(),
            time: start.time(),
            zone: zone.to_string(),
        },
        kind: required_attribute(meta, "kind")?.to_string(),
        venue,
        warmup: optional_notes(&root, "warmup")?,
        work,
        cooldown: optional_notes(&root, "cooldown")?,
        next,
        picture: root.child("picture").map(|picture| picture.text.clone()),
    })
}

fn set(element: &Element) -> Result<(WorkSet, Option<Notes>), Error> {
    if element.name != "set" {
        return Err(malformed(format!("unexpected element \"{}\"", element.name)));
    }
    expect_children(
        element,
        &[
            "preparation",
            "summary",
            "structure",
            "comments",
            "times",
            "video",
            "next",
        ],
    )?;
    let set = WorkSet {
        stroke: element.attribute("stroke").map(Stroke::from),
        summary: required_child(element, "summary")?.text.clone(),
        preparation: required_notes(element, "preparation")?,
        structure: optional_notes(element, "structure")?,
        comments: optional_notes(element, "comments")?,
        times: optional_notes(element, "times")?,
        video: optional_notes(element, "video")?,
    };
    Ok((set, optional_notes(element, "next")?))
}

fn exercise(element: &Element) -> Result<Exercise, Error> {
    if element.name != "lift" {
        return Err(malformed(format!("unexpected element \"{}\"", element.name)));
    }
    expect_children(
        element,
        &[
            "preparation",
            "warm-up",
            "comments",
            "video",
            "next",
            "thumbnail",
        ],
    )?;
    let weight = required_attribute(element, "weight")?;
    Ok(Exercise {
        kind: required_attribute(element, "kind")?.to_string(),
        weight: Weight::try_from(weight)
            .map_err(|err| malformed(format!("{err} (\"{weight}\")")))?,
        preparation: required_notes(element, "preparation")?,
        warmup: optional_notes(element, "warm-up")?,
        comments: optional_notes(element, "comments")?,
        video: optional_notes(element, "video")?,
        next: required_notes(element, "next")?,
        thumbnail: element
            .child("thumbnail")
            .map(|thumbnail| thumbnail.text.clone()),
    })
}

/// `<note>` children give `Many`, plain text gives `Single`, even when empty.
fn notes(element: &Element) -> Result<Notes, Error> {
    if element.children.is_empty() {
        return Ok(Notes::Single(element.text.clone()));
    }
    if element.text().is_some() {
        return Err(malformed(format!(
            "\"{}\" mixes text and note elements",
            element.name
        )));
    }
    let lines = element
        .children
        .iter()
        .map(|child| {
            if child.name == "note" {
                Ok(child.text.clone())
            } else {
                Err(malformed(format!(
                    "unexpected element \"{}\" in \"{}\"",
                    child.name, element.name
                )))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Notes::Many(lines))
}

/// The venue element always exists, so only content makes notes.
fn venue_notes(venue: &Element) -> Result<Option<Notes>, Error> {
    if venue.children.is_empty() && venue.text().is_none() {
        return Ok(None);
    }
    notes(venue).map(Some)
}

fn optional_notes(parent: &Element, name: &str) -> Result<Option<Notes>, Error> {
    parent.child(name).map(notes).transpose()
}

fn required_notes(parent: &Element, name: &str) -> Result<Notes, Error> {
    optional_notes(parent, name)?.ok_or_else(|| Error::Domain(domain::Error::missing(name)))
}

fn required_child<'a>(parent: &'a Element, name: &str) -> Result<&'a Element, Error> {
    parent
        .child(name)
        .ok_or_else(|| Error::Domain(domain::Error::missing(name)))
}

fn required_attribute<'a>(element: &'a Element, name: &str) -> Result<&'a str, Error> {
    element
        .attribute(name)
        .ok_or_else(|| Error::Domain(domain::Error::missing(name)))
}

fn expect_children(element: &Element, allowed: &[&str]) -> Result<(), Error> {
    let mut seen = vec![];
    for child in &element.children {
        if !allowed.contains(&child.name.as_str()) {
            return Err(malformed(format!(
                "unexpected element \"{}\" in \"{}\"",
                child.name, element.name
            )));
        }
        if seen.contains(&child.name.as_str()) {
            return Err(malformed(format!(
                "\"{}\" given more than once in \"{}\"",
                child.name, element.name
            )));
        }
        seen.push(child.name.as_str());
    }
    Ok(())
}

fn is_yes(value: &str) -> bool {
    !matches!(value.trim(), "" | "no" | "false" | "False" | "0")
}

fn malformed(message: impl Into<String>) -> Error {
    Error::Domain(domain::Error::malformed(message))
}
