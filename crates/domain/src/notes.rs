use std::slice;

/// A note-shaped value: one line of free text or an ordered list of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notes {
    Single(String),
    Many(Vec<String>),
}

impl Notes {
    /// One line becomes `Single`, more become `Many`, none is absent.
    #[must_use]
    pub fn from_lines(mut lines: Vec<String>) -> Option<Self> {
        match lines.len() {
            0 => None,
            1 => lines.pop().map(Notes::Single),
            _ => Some(Notes::Many(lines)),
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        match self {
            Notes::Single(line) => slice::from_ref(line),
            Notes::Many(lines) => lines,
        }
    }

    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.lines().iter().any(|line| line.contains(pattern))
    }
}

impl From<&str> for Notes {
    fn from(value: &str) -> Self {
        Notes::Single(value.to_string())
    }
}

impl From<Vec<&str>> for Notes {
    fn from(value: Vec<&str>) -> Self {
        Notes::Many(value.into_iter().map(String::from).collect())
    }
}
