use std::{collections::BTreeMap, slice};

use chrono::Datelike;
use log::debug;
use logbook_domain::{Session, Work};

use crate::{
    RenderError, Settings,
    common::{format_weight, lifts, stroke_class, swim, venue_icon},
};

/// One CSV row per set or exercise, ordered by date.
pub fn summary(sessions: &[&Session], settings: &Settings) -> Result<String, RenderError> {
    let mut writer = writer(b',');
    for session in sorted(sessions) {
        let date = session.date().format("%Y-%m-%d").to_string();
        match &session.work {
            Work::Swim { volume, sets } => {
                for set in sets {
                    let (colour, _) = stroke_class(slice::from_ref(set));
                    writer.write_record([
                        date.as_str(),
                        colour.as_str(),
                        set.summary.as_str(),
                        volume.to_string().as_str(),
                    ])?;
                }
            }
            Work::Lift { exercises } => {
                for exercise in exercises {
                    let weight = format!(
                        "{}kg",
                        format_weight(*exercise.weight, settings.weight_format)
                    );
                    writer.write_record([
                        date.as_str(),
                        exercise.kind.as_str(),
                        weight.as_str(),
                        "",
                    ])?;
                }
            }
        }
    }
    finish(writer)
}

/// Total swim volume and session count per month of one year, in calendar order.
pub fn totals(sessions: &[&Session], year: i32) -> Result<String, RenderError> {
    let mut months: BTreeMap<u32, (String, u64, u32)> = BTreeMap::new();
    for session in sessions.iter().filter(|s| s.date().year() == year) {
        let (volume, _) = swim(session)?;
        let month = months
            .entry(session.date().month())
            .or_insert_with(|| (session.date().format("%B").to_string(), 0, 0));
        month.1 += u64::from(volume);
        month.2 += 1;
    }
    debug!("totals for {} months of {year}", months.len());

    let mut writer = writer(b',');
    for (name, volume, count) in months.values() {
        writer.write_record([name.clone(), volume.to_string(), count.to_string()])?;
    }
    finish(writer)
}

/// Tab-separated lift weights per session, `-1.0` where a kind was not done.
pub fn database(sessions: &[&Session], settings: &Settings) -> Result<String, RenderError> {
    let mut writer = writer(b'\t');
    for session in sorted(sessions) {
        let mut weights = vec![-1.0; settings.lift_order.len()];
        for exercise in lifts(session)? {
            let position = settings
                .lift_order
                .iter()
                .position(|kind| kind == &exercise.kind)
                .ok_or_else(|| RenderError::UnknownKind(exercise.kind.clone()))?;
            weights[position] = *exercise.weight;
        }
        let mut record = vec![
            session.start.datetime().format("%Y-%m-%d %H:%M:%S").to_string(),
            venue_icon(session.venue.name.as_str()),
            session.venue.name.to_string(),
        ];
        record.extend(weights.iter().map(|weight| format!("{weight:?}")));
        writer.write_record(&record)?;
    }
    finish(writer)
}

fn sorted<'a>(sessions: &[&'a Session]) -> Vec<&'a Session> {
    let mut sessions = sessions.to_vec();
    sessions.sort_by(|a, b| a.start.cmp(&b.start));
    sessions
}

fn writer(delimiter: u8) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![])
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, RenderError> {
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
