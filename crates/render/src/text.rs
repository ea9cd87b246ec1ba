use std::fmt::Write;

use logbook_domain::{Notes, Session, Work};

use crate::{
    RenderError, Settings,
    common::{capitalise, format_weight, headline, short_date},
};

const UNDERLINE: &str =
    "=======================================================================";

/// Plain-text diary page of one session.
pub fn diary(session: &Session, settings: &Settings) -> Result<String, RenderError> {
    let mut out = String::new();
    writeln!(out, "{}\n", short_date(session.date()))?;
    writeln!(out, "{}\n", headline(session))?;

    match &session.work {
        Work::Swim { sets, .. } => {
            for (i, set) in sets.iter().enumerate() {
                writeln!(out, "{}\n{UNDERLINE}\n", set.summary)?;
                if i == 0 {
                    section(&mut out, session.venue.notes.as_ref())?;
                    section(&mut out, session.warmup.as_ref())?;
                }
                section(&mut out, Some(&set.preparation))?;
                section(&mut out, set.comments.as_ref())?;
                section(&mut out, set.structure.as_ref())?;
                section(&mut out, set.times.as_ref())?;
                section(&mut out, set.video.as_ref())?;
            }
        }
        Work::Lift { exercises } => {
            section(&mut out, session.venue.notes.as_ref())?;
            section(&mut out, session.warmup.as_ref())?;
            for exercise in exercises {
                writeln!(
                    out,
                    "{}kg {}\n{UNDERLINE}\n",
                    format_weight(*exercise.weight, settings.weight_format),
                    exercise.kind
                )?;
                section(&mut out, Some(&exercise.preparation))?;
                section(&mut out, exercise.comments.as_ref())?;
                section(&mut out, exercise.video.as_ref())?;
            }
        }
    }
    section(&mut out, session.cooldown.as_ref())?;
    section(&mut out, session.next.as_ref())?;

    Ok(out)
}

fn section(out: &mut String, notes: Option<&Notes>) -> Result<(), RenderError> {
    match notes {
        None => {}
        Some(Notes::Single(line)) => writeln!(out, "{}\n", capitalise(line))?,
        Some(Notes::Many(lines)) => {
            for line in lines {
                writeln!(out, "- {line}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{WeightFormat, tests::data};

    #[test]
    fn test_diary_swim() {
        assert_eq!(
            diary(&data::swim(2024, 3, 1, 2500), &Settings::default()).unwrap(),
            format!(
                "Mar 1\n\n\
                 7.30am, Freibad Zürich, free, threshold, 2500m\n\n\
                 10x100 on 1:45\n{UNDERLINE}\n\n\
                 Lanes were spacious\n\n\
                 Easy 400\n\n\
                 Slept well\n\n\
                 - 1:32\n- 1:31\n\n\
                 Try 1:40 send-off\n\n"
            )
        );
    }

    #[test]
    fn test_diary_lift() {
        let settings = Settings {
            weight_format: WeightFormat::Integer,
            ..Settings::default()
        };
        assert_eq!(
            diary(&data::lift(2024, 3, 2, &[("squat", 102.5)]), &settings).unwrap(),
            format!(
                "Mar 2\n\n\
                 6.15pm, Garage, 5x5\n\n\
                 Rowing\n\n\
                 102kg squat\n{UNDERLINE}\n\n\
                 - bar\n- 60\n\n\
                 Last rep slow\n\n"
            )
        );
    }

    #[test]
    fn test_diary_cooldown() {
        let mut session = data::swim(2024, 3, 1, 2500);
        session.cooldown = Some(Notes::from(vec!["200 backstroke", "100 easy"]));
        assert!(
            diary(&session, &Settings::default())
                .unwrap()
                .ends_with("- 1:32\n- 1:31\n\n- 200 backstroke\n- 100 easy\n\nTry 1:40 send-off\n\n")
        );
    }

    #[test]
    fn test_diary_is_idempotent() {
        let session = data::swim(2024, 3, 1, 2500);
        assert_eq!(
            diary(&session, &Settings::default()).unwrap(),
            diary(&session, &Settings::default()).unwrap()
        );
    }
}
