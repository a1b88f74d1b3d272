use sectorscope_core::{SourceError, SourceErrorKind};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Source(error) => match error.kind() {
                SourceErrorKind::InvalidPeriod | SourceErrorKind::UnknownSymbol => 2,
                SourceErrorKind::Unavailable => 3,
                SourceErrorKind::SchemaMismatch | SourceErrorKind::Internal => 4,
            },
            Self::Command(_) => 2,
            Self::Serialization(_) | Self::Csv(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
