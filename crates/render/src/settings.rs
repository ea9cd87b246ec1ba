pub const DEFAULT_LIFT_ORDER: [&str; 6] = ["squat", "press", "bench", "pull-up", "deadlift", "clean"];

/// Options that differ between the rendered page variants.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Link `favicon.ico` from HTML pages.
    pub favicon: bool,
    pub weight_format: WeightFormat,
    pub note_style: NoteStyle,
    /// Column order of the lift landing page, listing and database.
    pub lift_order: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            favicon: true,
            weight_format: WeightFormat::default(),
            note_style: NoteStyle::default(),
            lift_order: DEFAULT_LIFT_ORDER.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WeightFormat {
    /// Up to six significant digits without trailing zeros.
    #[default]
    Shortest,
    /// Up to four significant digits without trailing zeros.
    Significant,
    /// Whole kilograms, truncated.
    Integer,
}

#[derive(
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoteStyle {
    /// Note lists become `<ul>` items.
    #[default]
    List,
    /// Note lists become one paragraph with `<br/>` between lines.
    Breaks,
}
