use std::fmt::Write;

use chrono::Datelike;
use log::debug;
use logbook_domain::{Domain, Session};

use crate::{
    RenderError, Settings,
    common::{char_refs, format_weight, lifts, stroke_class, swim, time_ampm, venue_icon, weekday},
};

const SWIM_STYLE: &str = r"<style> /* Top-Right-Bottom-Left */
  TD.link:hover    { cursor: pointer; }
  HTML             { font-family: Helvetica; padding: 20pt 0pt 0pt 20pt; }
  TD               { font-size: 7pt; }
  TD A             { color: white; }
  P                { font-size: 9pt; }
  TABLE            { border-collapse: collapse; }
  H1               { font-size: 10pt; margin-top: 16pt; margin-bottom: 10pt; }
  .col1, .col2     { background: black; color: white; }
  .col1            { width: 16pt; padding-right: 7pt; text-align: right; }
  .col2            { width: 16pt; }
  .col3            { width: 38pt; padding-right: 7pt; text-align: right; }
  .col4            { width: 28pt; text-align: center; }
  .col5            { width: 70pt; padding-left: 4pt; color: white; }
  .col6            { width: 200pt; padding-left: 4pt; padding-right: 20pt; }
  .col7            { width: 40pt; }
  .spacious        { background: #88FA4E; }
  .fly200          { background: #3F2859; }
  .back200         { background: #8C0F59; }
  .breast200       { background: #AC3300; }
  .free200         { background: #006EA2; }
  .im200           { background: #4B4B4B; }
  .other           { background: black; }
</style>";

const LIFT_STYLE: &str = r"<style> /* Top-Right-Bottom-Left */
  HTML             { font-family: Helvetica; padding: 20pt 0pt 0pt 20pt; }
  TD               { font-size: 7pt; padding-top: 4pt; padding-bottom: 4pt; }
  TD A             { color: white; }
  P                { font-size: 9pt; padding-top: 6pt; }
  TABLE            { border-collapse: collapse; }
  H1               { font-size: 10pt; margin-top: 20pt; margin-bottom: 10pt; }
  .label           { font-weight: bold; text-transform: capitalize; text-align: center; }
  .col1, .col2     { background: black; color: white; }
  .col1            { width: 16pt; padding-right: 7pt; text-align: right; }
  .col2            { width: 16pt; }
  .col3            { width: 24pt; text-align: center; background: #EBEBEB; }
  .col4            { width: 36pt; text-align: right; padding-right: 4pt; }
</style>";

/// A session and the diary page it links to.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'a> {
    pub session: &'a Session,
    pub href: String,
}

/// Month-grouped calendar page of the sessions of one domain and year.
pub fn landing(
    entries: &[Entry],
    domain: Domain,
    title: &str,
    year: i32,
    settings: &Settings,
) -> Result<String, RenderError> {
    let mut entries = entries
        .iter()
        .filter(|entry| entry.session.date().year() == year)
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| a.session.start.cmp(&b.session.start));
    debug!("rendering {} {domain} sessions of {year}", entries.len());

    let mut out = String::new();
    writeln!(out, "<html><head><title>{title}</title>")?;
    if settings.favicon {
        writeln!(
            out,
            r#"<link rel="icon" type="image/x-icon" href="favicon.ico">"#
        )?;
    }
    writeln!(
        out,
        "{}",
        match domain {
            Domain::Swim => SWIM_STYLE,
            Domain::Lift => LIFT_STYLE,
        }
    )?;
    writeln!(out, "</head><body>")?;

    let mut block = None;
    for entry in entries {
        let month = entry.session.date().format("%B").to_string();
        if block.as_ref() != Some(&month) {
            if block.is_some() {
                writeln!(out, "</tbody></table>")?;
            }
            match domain {
                Domain::Swim => writeln!(out, "<h1>{month}</h1>\n<table><tbody>")?,
                Domain::Lift => {
                    let year_suffix = if block.is_none() {
                        format!(" {year}")
                    } else {
                        String::new()
                    };
                    let labels = settings
                        .lift_order
                        .iter()
                        .map(|kind| format!(r#"<td class="label">{kind}</td>"#))
                        .collect::<String>();
                    writeln!(
                        out,
                        r#"<h1>{month}{year_suffix}</h1> <table><thead><tr><td colspan="3"/> {labels} </tr></thead><tbody>"#
                    )?;
                }
            }
            block = Some(month);
        }
        match domain {
            Domain::Swim => swim_row(&mut out, entry)?,
            Domain::Lift => lift_row(&mut out, entry, settings)?,
        }
    }
    if block.is_some() {
        writeln!(out, "</tbody></table>")?;
    }

    writeln!(out, r#"<p><a href="..">../</a></p>"#)?;
    writeln!(out, "</body></html>")?;
    Ok(out)
}

fn swim_row(out: &mut String, entry: &Entry) -> Result<(), RenderError> {
    let session = entry.session;
    let (volume, sets) = swim(session)?;
    let (colour, prefix) = stroke_class(sets);
    let venue = char_refs(session.venue.name.as_str());
    let summaries = sets
        .iter()
        .map(|set| set.summary.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let cells = [
        String::from("<tr>"),
        format!(r#"<td class="col1">{}</td>"#, session.date().format("%-d")),
        format!(r#"<td class="col2">{}</td>"#, weekday(session.date())),
        format!(
            r#"<td class="col3{}">{}</td>"#,
            if session.venue.spacious { " spacious" } else { "" },
            time_ampm(session.start.time)
        ),
        format!(
            r#"<td class="col4"><img width="18" height="18" src="{}.png" alt="{venue}" title="{venue}"/></td>"#,
            venue_icon(session.venue.name.as_str())
        ),
        format!(
            r#"<td onclick="window.location='{href}';" class="col5 link {colour}"><a href="{href}">{prefix}{kind}</a></td>"#,
            href = entry.href,
            kind = session.kind
        ),
        format!(r#"<td class="col6">{summaries}</td>"#),
        format!(r#"<td class="col7">{volume}m</td>"#),
        String::from("</tr>"),
    ];
    writeln!(out, "{}", cells.join(" "))?;
    Ok(())
}

fn lift_row(out: &mut String, entry: &Entry, settings: &Settings) -> Result<(), RenderError> {
    let session = entry.session;
    let exercises = lifts(session)?;
    writeln!(
        out,
        r#"<tr><td class="col1"><a href="{href}">{}</a></td> <td class="col2"><a href="{href}">{}</a></td> <td class="col3">{}</td>"#,
        session.date().format("%-d"),
        weekday(session.date()),
        session.kind,
        href = entry.href,
    )?;
    for (position, kind) in settings.lift_order.iter().enumerate() {
        let weight = exercises
            .iter()
            .find(|exercise| &exercise.kind == kind)
            .map(|exercise| format_weight(*exercise.weight, settings.weight_format))
            .unwrap_or_default();
        write!(out, r#"<td class="col4" id="ex{position}">{weight}</td>"#)?;
    }
    writeln!(out, "</tr>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tests::data;

    fn entries(sessions: &[Session]) -> Vec<Entry<'_>> {
        sessions
            .iter()
            .map(|session| Entry {
                session,
                href: format!("{}.html", session.date().format("%Y%m%d")),
            })
            .collect()
    }

    #[test]
    fn test_landing_swim() {
        let mut other = data::swim(2024, 4, 2, 3000);
        other.venue.spacious = false;
        let sessions = [
            other,
            data::swim(2024, 3, 1, 2500),
            data::swim(2023, 12, 30, 1000),
        ];
        let settings = Settings {
            favicon: false,
            ..Settings::default()
        };
        let page = landing(&entries(&sessions), Domain::Swim, "Swimming", 2024, &settings).unwrap();
        assert!(page.starts_with("<html><head><title>Swimming</title>\n<style>"));
        let body = &page[page.find("<body>").unwrap()..];
        assert_eq!(
            body,
            r#"<body>
<h1>March</h1>
<table><tbody>
<tr> <td class="col1">1</td> <td class="col2">Fr</td> <td class="col3 spacious">7.30am</td> <td class="col4"><img width="18" height="18" src="freibad zurich.png" alt="Freibad Z&#252;rich" title="Freibad Z&#252;rich"/></td> <td onclick="window.location='20240301.html';" class="col5 link free200"><a href="20240301.html">free threshold</a></td> <td class="col6">10x100 on 1:45</td> <td class="col7">2500m</td> </tr>
</tbody></table>
<h1>April</h1>
<table><tbody>
<tr> <td class="col1">2</td> <td class="col2">Tu</td> <td class="col3">7.30am</td> <td class="col4"><img width="18" height="18" src="freibad zurich.png" alt="Freibad Z&#252;rich" title="Freibad Z&#252;rich"/></td> <td onclick="window.location='20240402.html';" class="col5 link free200"><a href="20240402.html">free threshold</a></td> <td class="col6">10x100 on 1:45</td> <td class="col7">3000m</td> </tr>
</tbody></table>
<p><a href="..">../</a></p>
</body></html>
"#
        );
    }

    #[test]
    fn test_landing_lift_column_order() {
        let sessions = [
            data::lift(2024, 3, 2, &[("bench", 80.0), ("squat", 100.0)]),
            data::lift(2024, 3, 5, &[("deadlift", 140.0)]),
            data::lift(2024, 4, 1, &[("press", 45.0)]),
        ];
        let page = landing(
            &entries(&sessions),
            Domain::Lift,
            "Lifting",
            2024,
            &Settings::default(),
        )
        .unwrap();
        assert!(page.contains(r#"<link rel="icon" type="image/x-icon" href="favicon.ico">"#));
        assert!(page.contains(r#"<h1>March 2024</h1> <table><thead><tr><td colspan="3"/> <td class="label">squat</td><td class="label">press</td><td class="label">bench</td><td class="label">pull-up</td><td class="label">deadlift</td><td class="label">clean</td> </tr></thead><tbody>"#));
        assert!(page.contains("<h1>April</h1> "));
        assert!(page.contains(
            r#"<tr><td class="col1"><a href="20240302.html">2</a></td> <td class="col2"><a href="20240302.html">Sa</a></td> <td class="col3">5x5</td>
<td class="col4" id="ex0">100</td><td class="col4" id="ex1"></td><td class="col4" id="ex2">80</td><td class="col4" id="ex3"></td><td class="col4" id="ex4"></td><td class="col4" id="ex5"></td></tr>
"#
        ));
    }

    #[test]
    fn test_landing_wrong_domain() {
        let sessions = [data::lift(2024, 3, 2, &[("squat", 100.0)])];
        assert!(matches!(
            landing(&entries(&sessions), Domain::Swim, "Swimming", 2024, &Settings::default()),
            Err(RenderError::MissingField("volume"))
        ));
    }

    #[test]
    fn test_landing_is_idempotent() {
        let sessions = [data::swim(2024, 3, 1, 2500), data::swim(2024, 3, 3, 2000)];
        let render = || {
            landing(&entries(&sessions), Domain::Swim, "Swimming", 2024, &Settings::default())
                .unwrap()
        };
        assert_eq!(render(), render());
    }
}
