//! Domain error types.

/// Top-level error type for ticktrader.
#[derive(Debug, thiserror::Error)]
pub enum TicktraderError {
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

    #[error("market data error for {instrument}: {reason}")]
    MarketData { instrument: String, reason: String },

    #[error("order {side} {quantity} {instrument} failed: {reason}")]
    Gateway {
        instrument: String,
        side: String,
        quantity: f64,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TicktraderError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TicktraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TicktraderError> for std::process::ExitCode {
    fn from(err: &TicktraderError) -> Self {
        let code: u8 = match err {
            TicktraderError::Io(_) => 1,
            TicktraderError::ConfigParse { .. }
            | TicktraderError::ConfigMissing { .. }
            | TicktraderError::ConfigInvalid { .. } => 2,
            TicktraderError::MarketData { .. } => 3,
            TicktraderError::Gateway { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
