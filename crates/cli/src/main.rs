#![warn(clippy::pedantic)]

use std::path::{Path, PathBuf};

use ::log::{LevelFilter, debug, warn};
use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use logbook_domain::{Domain, Session};
use logbook_render::{self as render, Pictures, Settings};
use logbook_storage::{self as storage, Format, Loaded, NoteMode};

mod log;

#[derive(Parser, Debug)]
#[command(
    name = "logbook",
    about = "Transcribe, convert and render swim and lift session logs",
    version
)]
struct Cli {
    /// Render settings file (YAML)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log debug messages
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn an OPML outline export into a session document
    Transcribe {
        /// Outline file, or - for standard input
        input: PathBuf,
        /// Date of the session (YYYYMMDD)
        date: String,
        #[arg(long, value_enum, default_value = "xml")]
        format: FormatChoice,
        /// Write single-line note lists as plain values (YAML only)
        #[arg(long)]
        collapse: bool,
    },
    /// Render the diary page of one session
    Diary {
        /// Session document, or - for standard input
        input: PathBuf,
        /// Plain text instead of HTML
        #[arg(long)]
        text: bool,
        /// Picture shown at the end of the page, instead of the stored one
        #[arg(long, value_name = "JPG")]
        picture: Option<String>,
        /// Picture shown after the exercise of the given kind
        #[arg(long, num_args = 2, value_names = ["KIND", "JPG"])]
        kind_picture: Vec<String>,
    },
    /// Render the landing page of one year
    Landing {
        /// HTML title
        #[arg(short, long)]
        title: Option<String>,
        /// Year to show (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// CSV summary with one row per set or exercise
    Summary {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// CSV with monthly swim volume and session count
    Totals {
        /// Year to sum up (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Tab-separated lift weights per session
    Database {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Plain-text monthly listing of one year
    Listing {
        /// Year to list (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Convert session documents between XML and YAML
    Convert {
        /// Session document, or - for standard input
        input: PathBuf,
        #[arg(long, value_enum)]
        format: FormatChoice,
        /// Write single-line note lists as plain values (YAML only)
        #[arg(long)]
        collapse: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatChoice {
    Xml,
    Yaml,
}

impl From<FormatChoice> for Format {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Xml => Format::Xml,
            FormatChoice::Yaml => Format::Yaml,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    log::init(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    })
    .context("failed to initialize logger")?;

    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    debug!(
        "weight format {}, note style {}",
        settings.weight_format, settings.note_style
    );

    print!("{}", run(cli.command, &settings)?);
    Ok(())
}

fn run(command: Command, settings: &Settings) -> Result<String> {
    match command {
        Command::Transcribe {
            input,
            date,
            format,
            collapse,
        } => {
            let date = NaiveDate::parse_from_str(&date, "%Y%m%d")
                .with_context(|| format!("invalid date \"{date}\""))?;
            let outline = storage::read_input(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let session = storage::transcribe(&outline, date)
                .with_context(|| format!("failed to transcribe {}", input.display()))?;
            Ok(storage::serialize(&session, format.into(), note_mode(collapse))?)
        }
        Command::Diary {
            input,
            text,
            picture,
            kind_picture,
        } => {
            let loaded = load(&[input])?;
            let [Loaded { session, .. }] = loaded.as_slice() else {
                bail!("expected exactly one session, found {}", loaded.len());
            };
            if text {
                return Ok(render::text_diary(session, settings)?);
            }
            let pictures = Pictures {
                session: picture,
                kinds: kind_picture
                    .chunks_exact(2)
                    .map(|pair| (pair[0].clone(), pair[1].clone()))
                    .collect(),
            };
            Ok(render::html_diary(session, &pictures, settings)?)
        }
        Command::Landing { title, year, files } => {
            let loaded = load(&files)?;
            let domain = domain(&loaded)?;
            let title = title.unwrap_or_else(|| {
                let title = match domain {
                    Domain::Swim => "Swimming",
                    Domain::Lift => "Lifting",
                };
                warn!("no title given, using \"{title}\"");
                title.to_string()
            });
            let entries = loaded
                .iter()
                .map(|loaded| render::Entry {
                    session: &loaded.session,
                    href: href(&loaded.source),
                })
                .collect::<Vec<_>>();
            Ok(render::landing(
                &entries,
                domain,
                &title,
                year.unwrap_or_else(current_year),
                settings,
            )?)
        }
        Command::Summary { files } => {
            let loaded = load(&files)?;
            Ok(render::summary(&sessions(&loaded), settings)?)
        }
        Command::Totals { year, files } => {
            let loaded = load(&files)?;
            Ok(render::totals(
                &sessions(&loaded),
                year.unwrap_or_else(current_year),
            )?)
        }
        Command::Database { files } => {
            let loaded = load(&files)?;
            Ok(render::database(&sessions(&loaded), settings)?)
        }
        Command::Listing { year, files } => {
            let loaded = load(&files)?;
            Ok(render::listing(
                &sessions(&loaded),
                domain(&loaded)?,
                year.unwrap_or_else(current_year),
                settings,
            )?)
        }
        Command::Convert {
            input,
            format,
            collapse,
        } => {
            let loaded = load(&[input])?;
            let format = Format::from(format);
            if format == Format::Xml && loaded.len() != 1 {
                bail!(
                    "an XML document holds exactly one session, found {}",
                    loaded.len()
                );
            }
            let mut out = String::new();
            for Loaded { session, .. } in &loaded {
                out.push_str(&storage::serialize(session, format, note_mode(collapse))?);
            }
            Ok(out)
        }
    }
}

fn load(paths: &[PathBuf]) -> Result<Vec<Loaded>> {
    let mut loaded = vec![];
    for path in paths {
        loaded.extend(
            storage::load(path).with_context(|| format!("failed to load {}", path.display()))?,
        );
    }
    debug!("loaded {} sessions", loaded.len());
    Ok(loaded)
}

fn load_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("invalid settings in {}", path.display()))
}

fn sessions(loaded: &[Loaded]) -> Vec<&Session> {
    loaded.iter().map(|loaded| &loaded.session).collect()
}

/// Domain of the first session; the renderers reject sessions of another domain.
fn domain(loaded: &[Loaded]) -> Result<Domain> {
    match loaded.first() {
        Some(loaded) => Ok(loaded.session.domain()),
        None => bail!("no sessions found"),
    }
}

/// Diary pages are named after their session documents.
fn href(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map_or_else(|| String::from("-"), |stem| stem.to_string_lossy().into_owned());
    format!("{stem}.html")
}

fn note_mode(collapse: bool) -> NoteMode {
    if collapse {
        NoteMode::Collapse
    } else {
        NoteMode::Preserve
    }
}

fn current_year() -> i32 {
    Local::now().year()
}
