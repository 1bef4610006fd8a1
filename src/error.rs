//! Error taxonomy shared by the converter and the ImageSets generator.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of an [`Error`], used by the binaries to decide how
/// a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    MalformedInput,
    EmptyInput,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported source XML format '{0}' (supported: labelme)")]
    UnsupportedFormat(String),
    #[error("validation portion {0} is outside [0, 1)")]
    InvalidValPortion(f64),
    #[error("annotation directory does not exist: {0}")]
    MissingDirectory(PathBuf),
    #[error("malformed annotation {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("no annotation files found in {0}")]
    EmptyInput(PathBuf),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to emit XML: {0}")]
    XmlWrite(#[from] xml::writer::Error),
    #[error("invalid annotation file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedFormat(_)
            | Error::InvalidValPortion(_)
            | Error::MissingDirectory(_)
            | Error::Pattern(_) => ErrorKind::Configuration,
            Error::Malformed { .. } => ErrorKind::MalformedInput,
            Error::EmptyInput(_) => ErrorKind::EmptyInput,
            Error::Io { .. } | Error::XmlWrite(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Malformed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
