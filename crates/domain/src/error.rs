#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("\"{label}\" expects exactly one value ({count} given)")]
    Shape { label: String, count: usize },
    #[error("unknown label \"{0}\"")]
    UnknownLabel(String),
    #[error("missing \"{0}\"")]
    MissingField(String),
}

impl Error {
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput(message.into())
    }

    #[must_use]
    pub fn missing(label: impl Into<String>) -> Self {
        Error::MissingField(label.into())
    }
}

impl From<crate::NameError> for Error {
    fn from(value: crate::NameError) -> Self {
        Error::MalformedInput(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::Shape {
                label: String::from("stroke"),
                count: 2
            }
            .to_string(),
            "\"stroke\" expects exactly one value (2 given)"
        );
        assert_eq!(
            Error::MissingField(String::from("summary")).to_string(),
            "missing \"summary\""
        );
    }

    #[test]
    fn test_error_from_name_error() {
        assert!(matches!(
            Error::from(crate::NameError::Empty),
            Error::MalformedInput(message) if message == "Name must not be empty"
        ));
    }
}
