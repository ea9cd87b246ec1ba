/// A labelled outline as exported by an outlining app.
///
/// The title names the session domain. Top-level nodes are either fields (a
/// label with its lines) or, for lift sessions, exercise groups whose label
/// reads `"<exercise-kind> <weight>"` and whose children are fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub title: String,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Field(Field),
    Group(Group),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: String,
    pub lines: Vec<String>,
}

impl Field {
    #[must_use]
    pub fn new(label: &str, lines: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            lines: lines.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub label: String,
    pub kind: String,
    pub weight: Option<String>,
    pub fields: Vec<Field>,
}

impl Group {
    #[must_use]
    pub fn new(label: &str, fields: Vec<Field>) -> Self {
        let (kind, weight) = split_label(label);
        Self {
            label: label.to_string(),
            kind,
            weight,
            fields,
        }
    }
}

/// Splits a trailing weight token off an exercise label.
///
/// The token is only split off if it is numeric, optionally followed by `kg`,
/// so that multi-word kinds without a weight stay intact.
#[must_use]
pub fn split_label(label: &str) -> (String, Option<String>) {
    let label = label.trim();
    if let Some((kind, token)) = label.rsplit_once(char::is_whitespace) {
        let number = token.strip_suffix("kg").unwrap_or(token);
        if number.chars().all(|c| c.is_ascii_digit() || c == '.') && number.parse::<f64>().is_ok()
        {
            return (kind.trim_end().to_string(), Some(token.to_string()));
        }
    }
    (label.to_string(), None)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("squat 100", "squat", Some("100"))]
    #[case("power clean 62.5", "power clean", Some("62.5"))]
    #[case("bench 80kg", "bench", Some("80kg"))]
    #[case("power clean", "power clean", None)]
    #[case("pull-up", "pull-up", None)]
    #[case("bench inf", "bench inf", None)]
    #[case(" deadlift  140 ", "deadlift", Some("140"))]
    fn test_split_label(#[case] label: &str, #[case] kind: &str, #[case] weight: Option<&str>) {
        assert_eq!(
            split_label(label),
            (kind.to_string(), weight.map(ToString::to_string))
        );
    }

    #[test]
    fn test_group_new() {
        let group = Group::new("press 45", vec![Field::new("next", &["same"])]);
        assert_eq!(group.kind, "press");
        assert_eq!(group.weight.as_deref(), Some("45"));
        assert_eq!(group.fields, vec![Field::new("next", &["same"])]);
    }
}
