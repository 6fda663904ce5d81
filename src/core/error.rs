use std::fmt;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Entity and search document shapes could not be reconciled.
    MappingFailure,
    /// The search backend could not be reached or failed at transport level.
    SearchUnavailable,
    NotFound,
    InvalidArgument,
    InvalidInput,
    Io,
    Parse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MappingFailure => "mapping failure",
            ErrorKind::SearchUnavailable => "search unavailable",
            ErrorKind::NotFound => "not found",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::Io => "io",
            ErrorKind::Parse => "parse",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{kind}: {context}")]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
    #[source]
    pub source: Option<BoxedSource>,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error {
            kind,
            context: context.into(),
            source: None,
        }
    }

    pub fn with_source<E>(kind: ErrorKind, context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error {
            kind,
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Mapping failure keeping the low-level codec error as the cause.
    pub fn mapping(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::MappingFailure, err.to_string(), err)
    }

    /// Re-labels any error as a backend outage, chaining the original.
    pub fn unavailable(context: impl Into<String>, cause: Error) -> Self {
        Error::with_source(ErrorKind::SearchUnavailable, context, cause)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_mapping_failure(&self) -> bool {
        self.kind == ErrorKind::MappingFailure
    }

    pub fn is_search_unavailable(&self) -> bool {
        self.kind == ErrorKind::SearchUnavailable
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io, err.to_string(), err)
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::with_source(ErrorKind::Parse, err.to_string(), *err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::mapping(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
