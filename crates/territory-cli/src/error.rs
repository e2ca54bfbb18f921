use std::path::PathBuf;

use territory_layout::{InvariantViolation, LayoutError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no capacity given: pass --capacity or set \"capacity\" in the input")]
    MissingCapacity,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("layout failed verification: {0}")]
    Verify(#[from] InvariantViolation),

    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to encode output: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CliError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Process exit code.
    ///
    /// `2` for bad input or configuration, `3` when the engine cannot lay
    /// out a valid request, `4` when `--verify` rejects a result.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Read { .. }
            | Self::Parse { .. }
            | Self::MissingCapacity
            | Self::InvalidArgument(_)
            | Self::Layout(LayoutError::InvalidInput(_)) => 2,
            Self::Layout(_) => 3,
            Self::Verify(_) => 4,
            Self::Write(_) | Self::Encode(_) => 1,
        }
    }

    /// Stable machine-readable error name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::Parse { .. } => "parse",
            Self::MissingCapacity => "missing_capacity",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Layout(err) => err.kind(),
            Self::Verify(_) => "verify",
            Self::Write(_) => "write",
            Self::Encode(_) => "encode",
        }
    }
}
