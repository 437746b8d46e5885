//! Error types of the statistics toolkit.

use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error raised by dataset analysis.
///
/// Every variant aborts the analysis. An image file that fails to decode
/// is not an error and never shows up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unable to read '{}'", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub(crate) fn directory(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Directory {
            path: path.into(),
            source,
        }
    }
}

/// The configuration file cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read configuration file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid YAML configuration '{}'", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid JSON5 configuration '{}'", path.display())]
    Json5 {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
}

/// A label line cannot be mapped to a configured class.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{}:{line}: class id '{token}' is not an integer", path.display())]
    InvalidClassId {
        path: PathBuf,
        line: usize,
        token: String,
    },
    #[error("{}:{line}: class id {class_id} is not a configured class", path.display())]
    UnknownClass {
        path: PathBuf,
        line: usize,
        /// The integer as written in the label file.
        class_id: String,
    },
}

/// A command line option value is not recognized.
#[derive(Debug, Error)]
#[error("invalid {kind} '{value}', expected one of: {expected}")]
pub struct OptionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
