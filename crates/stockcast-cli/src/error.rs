use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] stockcast_core::ValidationError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {}", .violations.join("; "))]
    InvalidConfig { violations: Vec<String> },
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Serialization(_) => 4,
            Self::InvalidConfig { .. } => 5,
        }
    }
}
