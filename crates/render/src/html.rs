use std::fmt::Write;

use logbook_domain::{Notes, Session, Work};

use crate::{
    NoteStyle, Pictures, RenderError, Settings,
    common::{capitalise, format_weight, headline, prose, short_date},
};

/// HTML diary page of one session.
pub fn diary(
    session: &Session,
    pictures: &Pictures,
    settings: &Settings,
) -> Result<String, RenderError> {
    let date = short_date(session.date());
    let mut page = Page {
        out: String::new(),
        style: settings.note_style,
    };

    writeln!(page.out, r#"<html><head><meta charset="utf-8">"#)?;
    if settings.favicon {
        writeln!(
            page.out,
            r#"<link rel="icon" type="image/x-icon" href="favicon.ico">"#
        )?;
    }
    writeln!(page.out, "<title>{date}</title></head><body><main>")?;
    writeln!(page.out, "<header><h2>{date}</h2>")?;
    writeln!(page.out, "<p>{}</p></header>", headline(session))?;

    page.notes(session.venue.notes.as_ref(), "")?;
    page.notes(session.warmup.as_ref(), "Warm-up: ")?;

    match &session.work {
        Work::Swim { sets, .. } => {
            for set in sets {
                writeln!(page.out, "<h3>{}</h3>", set.summary)?;
                page.notes(Some(&set.preparation), "")?;
                page.notes(set.comments.as_ref(), "Comments: ")?;
                page.notes(set.structure.as_ref(), "Structure: ")?;
                page.notes(set.times.as_ref(), "Times: ")?;
                page.notes(set.video.as_ref(), "Video: ")?;
            }
        }
        Work::Lift { exercises } => {
            for exercise in exercises {
                writeln!(
                    page.out,
                    "<h3>{}kg {}</h3>",
                    format_weight(*exercise.weight, settings.weight_format),
                    exercise.kind
                )?;
                page.notes(Some(&exercise.preparation), "")?;
                page.notes(exercise.warmup.as_ref(), "Warm-up: ")?;
                page.notes(exercise.comments.as_ref(), "Comments: ")?;
                page.notes(exercise.video.as_ref(), "Video: ")?;
                page.notes(Some(&exercise.next), "Next: ")?;
                if let Some(picture) = pictures
                    .kinds
                    .get(&exercise.kind)
                    .or(exercise.thumbnail.as_ref())
                {
                    writeln!(
                        page.out,
                        r#"<section><p><img width="200" src="{picture}" alt="{date}"></p></section>"#
                    )?;
                }
            }
        }
    }
    page.notes(session.cooldown.as_ref(), "Cool-down: ")?;
    page.notes(session.next.as_ref(), "Next: ")?;
    if let Some(picture) = pictures.session.as_ref().or(session.picture.as_ref()) {
        writeln!(page.out, r#"<p><img width="480" src="{picture}"/></p>"#)?;
    }

    // mobile reader modes need the <main> element
    writeln!(page.out, "</main></body></html>")?;
    Ok(page.out)
}

struct Page {
    out: String,
    style: NoteStyle,
}

impl Page {
    fn notes(&mut self, notes: Option<&Notes>, prefix: &str) -> Result<(), RenderError> {
        match (notes, self.style) {
            (None, _) => {}
            (Some(Notes::Single(line)), _) => writeln!(
                self.out,
                "<section><p>{prefix}{}</p></section>",
                capitalise(line)
            )?,
            (Some(Notes::Many(lines)), NoteStyle::List) => {
                writeln!(self.out, "<section>{prefix}<ul>")?;
                for line in lines {
                    writeln!(self.out, "<li>{line}</li>")?;
                }
                writeln!(self.out, "</ul></section>")?;
            }
            (Some(notes @ Notes::Many(_)), NoteStyle::Breaks) => writeln!(
                self.out,
                "<section><p>{prefix}{}</p></section>",
                prose(notes, "<br/>")
            )?,
        }
        Ok(())
    }
}
