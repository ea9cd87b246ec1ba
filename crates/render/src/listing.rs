use std::fmt::Write;

use chrono::Datelike;
use logbook_domain::{Domain, Session};

use crate::{
    RenderError, Settings,
    common::{format_weight, lifts, swim, time_ampm, weekday},
};

/// Fixed-width text listing of the sessions of one domain and year, by month.
pub fn listing(
    sessions: &[&Session],
    domain: Domain,
    year: i32,
    settings: &Settings,
) -> Result<String, RenderError> {
    let mut sessions = sessions
        .iter()
        .filter(|session| session.date().year() == year)
        .collect::<Vec<_>>();
    sessions.sort_by(|a, b| a.start.cmp(&b.start));

    let mut out = String::new();
    let mut block = None;
    for session in sessions {
        let month = session.date().format("%B").to_string();
        if block.as_ref() != Some(&month) {
            writeln!(out, "{month}")?;
            if domain == Domain::Lift {
                let labels = settings
                    .lift_order
                    .iter()
                    .map(|kind| format!(" {kind:>11}"))
                    .collect::<String>();
                writeln!(out, "{:7} {labels}", "")?;
            }
            block = Some(month);
        }

        let day = session.date().format("%-d").to_string();
        let weekday = weekday(session.date());
        match domain {
            Domain::Swim => {
                let (volume, sets) = swim(session)?;
                let strokes = session
                    .strokes()
                    .iter()
                    .map(|stroke| stroke.as_str())
                    .collect::<Vec<_>>();
                if strokes.is_empty() {
                    return Err(RenderError::MissingField("stroke"));
                }
                let summaries = sets
                    .iter()
                    .map(|set| set.summary.as_str())
                    .collect::<Vec<_>>();
                writeln!(
                    out,
                    "{day:>2} {weekday:<2}  {:>7} {:<7} {:<8} {:>10} {:<60} {volume:>7}m",
                    time_ampm(session.start.time),
                    session.venue.name.as_str(),
                    strokes.join("-"),
                    session.kind,
                    summaries.join(", "),
                )?;
            }
            Domain::Lift => {
                let exercises = lifts(session)?;
                write!(out, "{day:>2} {weekday:<2}  {}", session.kind)?;
                for kind in &settings.lift_order {
                    let weight = exercises
                        .iter()
                        .find(|exercise| &exercise.kind == kind)
                        .map(|exercise| format_weight(*exercise.weight, settings.weight_format))
                        .unwrap_or_default();
                    write!(out, " {weight:>11}")?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tests::data;

    #[test]
    fn test_listing_swim() {
        let march = data::swim(2024, 3, 1, 2500);
        let april = data::swim(2024, 4, 2, 3000);
        let old = data::swim(2023, 4, 2, 3000);
        assert_eq!(
            listing(&[&april, &old, &march], Domain::Swim, 2024, &Settings::default()).unwrap(),
            format!(
                "March\n 1 Fr   7.30am Freibad Zürich free      threshold {:<60}    2500m\n\
                 April\n 2 Tu   7.30am Freibad Zürich free      threshold {:<60}    3000m\n",
                "10x100 on 1:45", "10x100 on 1:45"
            )
        );
    }

    #[test]
    fn test_listing_swim_without_stroke() {
        let mut session = data::swim(2024, 3, 1, 2500);
        if let logbook_domain::Work::Swim { sets, .. } = &mut session.work {
            sets[0].stroke = None;
        }
        assert!(matches!(
            listing(&[&session], Domain::Swim, 2024, &Settings::default()),
            Err(RenderError::MissingField("stroke"))
        ));
    }

    #[test]
    fn test_listing_lift() {
        let session = data::lift(2024, 3, 2, &[("bench", 80.0), ("squat", 100.0)]);
        assert_eq!(
            listing(&[&session], Domain::Lift, 2024, &Settings::default()).unwrap(),
            concat!(
                "March\n",
                "               squat       press       bench     pull-up    deadlift       clean\n",
                " 2 Sa  5x5         100                      80                                    \n",
            )
        );
    }
}
