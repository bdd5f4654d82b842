use std::fmt;
use std::io;
use std::path::PathBuf;

/// Broad category of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed directive or directive ordering violation.
    Format,
    /// A resource could not be acquired (texture, sprite, tileset, I/O).
    Resource,
    /// The file parsed but the result is incomplete.
    Consistency,
}

/// Error type for tileset and map loading
#[derive(Debug)]
pub enum LoadError {
    /// Malformed directive, e.g. `layer` before `columns`/`rows`
    Format(String),
    /// A loader callback failed to provide the requested resource
    Resource {
        /// Identifier as written in the data file
        ident: String,
        /// Why it could not be provided
        reason: String,
    },
    /// File I/O error
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// Missing image, tileset or mandatory layer after parsing
    Consistency(String),
    /// Tiled JSON that does not deserialize
    Parse(serde_json::Error),
}

impl LoadError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        LoadError::Format(msg.into())
    }

    pub(crate) fn resource(ident: impl Into<String>, reason: impl fmt::Display) -> Self {
        LoadError::Resource {
            ident: ident.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn consistency(msg: impl Into<String>) -> Self {
        LoadError::Consistency(msg.into())
    }

    /// Category of this error; I/O failures count as resource errors.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Format(_) | LoadError::Parse(_) => ErrorKind::Format,
            LoadError::Resource { .. } | LoadError::Io { .. } => ErrorKind::Resource,
            LoadError::Consistency(_) => ErrorKind::Consistency,
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Format(msg) => write!(f, "format error: {}", msg),
            LoadError::Resource { ident, reason } => {
                write!(f, "could not load resource '{}': {}", ident, reason)
            }
            LoadError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            LoadError::Consistency(msg) => write!(f, "incomplete data: {}", msg),
            LoadError::Parse(err) => write!(f, "failed to parse JSON: {}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Error type for [`MapConfig`](crate::MapConfig) loading
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    Io {
        /// Configuration file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// The configuration is not valid JSON for `MapConfig`
    Json {
        /// Configuration file
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "reading config {}: {}", path.display(), source)
            }
            ConfigError::Json { path, source } => {
                write!(f, "parsing config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json { source, .. } => Some(source),
        }
    }
}
