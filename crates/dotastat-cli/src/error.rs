use dotastat_core::{ClassifiedError, ConfigError, ErrorKind, QueryError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Upstream(#[from] ClassifiedError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Query(_) => 2,
            Self::Upstream(error) => match error.kind() {
                ErrorKind::NotFound => 3,
                ErrorKind::RateLimited => 4,
                ErrorKind::UpstreamServerError => 5,
                ErrorKind::TransportError => 6,
                ErrorKind::Unknown => 1,
            },
            Self::Serialization(_) => 7,
            Self::Io(_) => 10,
        }
    }
}
