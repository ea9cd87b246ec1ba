#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use log::debug;
use logbook_domain as domain;

pub mod document;
pub mod opml;
pub mod xml;
pub mod yaml;

pub use yaml::NoteMode;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Domain(#[from] domain::Error),
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("invalid XML attribute: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    Xml,
    Yaml,
}

impl Format {
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "xml" => Some(Format::Xml),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    #[must_use]
    pub fn detect(input: &str) -> Self {
        if input.trim_start().starts_with('<') {
            Format::Xml
        } else {
            Format::Yaml
        }
    }
}

/// A session together with the file it was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub session: domain::Session,
    pub source: PathBuf,
}

/// Reads a whole file, or standard input for `-`.
pub fn read_input(path: &Path) -> Result<String, Error> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

pub fn parse_sessions(input: &str, format: Format) -> Result<Vec<domain::Session>, Error> {
    match format {
        Format::Xml => Ok(vec![document::from_xml(input)?]),
        Format::Yaml => yaml::from_yaml(input),
    }
}

pub fn load(path: &Path) -> Result<Vec<Loaded>, Error> {
    let input = read_input(path)?;
    let format = Format::from_path(path).unwrap_or_else(|| Format::detect(&input));
    debug!("loading {} as {format}", path.display());
    Ok(parse_sessions(&input, format)?
        .into_iter()
        .map(|session| Loaded {
            session,
            source: path.to_path_buf(),
        })
        .collect())
}

pub fn serialize(
    session: &domain::Session,
    format: Format,
    mode: NoteMode,
) -> Result<String, Error> {
    match format {
        Format::Xml => document::to_xml(session),
        Format::Yaml => yaml::to_yaml(session, mode),
    }
}

/// Turns an outline export into a session recorded on the given date.
pub fn transcribe(input: &str, date: NaiveDate) -> Result<domain::Session, Error> {
    let outline = opml::read_outline(input)?;
    Ok(domain::build(&outline, date)?)
}

#[cfg(test)]
mod tests {
    pub mod data;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("a/b/2024-03-01.xml", Some(Format::Xml))]
    #[case("2024-03-01.yaml", Some(Format::Yaml))]
    #[case("2024-03-01.yml", Some(Format::Yaml))]
    #[case("2024-03-01.txt", None)]
    #[case("-", None)]
    fn test_format_from_path(#[case] path: &str, #[case] expected: Option<Format>) {
        assert_eq!(Format::from_path(Path::new(path)), expected);
    }

    #[rstest]
    #[case("  <?xml version=\"1.0\"?><session/>", Format::Xml)]
    #[case("- type: swim\n", Format::Yaml)]
    fn test_format_detect(#[case] input: &str, #[case] expected: Format) {
        assert_eq!(Format::detect(input), expected);
    }

    #[rstest]
    #[case(Format::Xml)]
    #[case(Format::Yaml)]
    fn test_serialize_then_parse(#[case] format: Format) {
        for session in [&*data::SWIM_SESSION, &*data::LIFT_SESSION] {
            let serialized = serialize(session, format, NoteMode::Preserve).unwrap();
            assert_eq!(
                parse_sessions(&serialized, Format::detect(&serialized)).unwrap(),
                vec![session.clone()]
            );
        }
    }

    #[test]
    fn test_transcribe() {
        let session = transcribe(
            data::SWIM_OPML,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
        .unwrap();
        assert_eq!(session, *data::SWIM_SESSION);
    }

    #[rstest]
    #[case(Format::Xml)]
    #[case(Format::Yaml)]
    fn test_transcribe_then_serialize_with_empty_lines(#[case] format: Format) {
        let outline = data::SWIM_OPML
            .replace(r#"text="easy 400 &amp; drills""#, r#"text="""#)
            .replace(r#"<outline text="slept well"/>"#, "")
            .replace(r#"text="banana at 6am""#, r#"text="""#);
        let session = transcribe(&outline, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).unwrap();
        assert_eq!(session.warmup, Some(domain::Notes::from("")));
        assert_eq!(session.sets().unwrap()[0].preparation, domain::Notes::from(""));
        let serialized = serialize(&session, format, NoteMode::Preserve).unwrap();
        assert_eq!(
            parse_sessions(&serialized, format).unwrap(),
            vec![session]
        );
    }

    #[test]
    fn test_load() {
        let path = std::env::temp_dir().join(format!("logbook-{}.yaml", std::process::id()));
        std::fs::write(
            &path,
            yaml::to_yaml(&data::LIFT_SESSION, NoteMode::Preserve).unwrap(),
        )
        .unwrap();
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            loaded,
            vec![Loaded {
                session: data::LIFT_SESSION.clone(),
                source: path,
            }]
        );
    }
}
