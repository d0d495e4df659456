//! Domain error types.

/// Top-level error type for cashflow.
#[derive(Debug, thiserror::Error)]
pub enum CashflowError {
    #[error("interval must be a positive number of days, got {days}")]
    InvalidInterval { days: i64 },

    #[error("invalid monthly cashflow: {reason}")]
    InvalidMonthly { reason: String },

    #[error("limit of {limit} not reached within {horizon_days} days")]
    LimitNotReached { limit: f64, horizon_days: u32 },

    #[error("cashflow document has no details.type")]
    MissingKind,

    #[error("unknown cashflow type '{kind}'")]
    UnknownKind { kind: String },

    #[error("invalid cashflow document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to write projection: {reason}")]
    Output { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CashflowError> for std::process::ExitCode {
    fn from(err: &CashflowError) -> Self {
        let code: u8 = match err {
            CashflowError::Io(_) => 1,
            CashflowError::ConfigParse { .. }
            | CashflowError::ConfigMissing { .. }
            | CashflowError::ConfigInvalid { .. } => 2,
            CashflowError::MissingKind
            | CashflowError::UnknownKind { .. }
            | CashflowError::Document(_) => 3,
            CashflowError::InvalidInterval { .. }
            | CashflowError::InvalidMonthly { .. }
            | CashflowError::LimitNotReached { .. } => 4,
            CashflowError::Output { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
