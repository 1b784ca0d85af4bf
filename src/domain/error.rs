//! Domain error types.

/// Top-level error type for tradeplot.
///
/// The presentation core never returns these; they come from the edges
/// (transport, payload decoding, configuration, report output).
#[derive(Debug, thiserror::Error)]
pub enum TradeplotError {
    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("could not decode {what}: {reason}")]
    Decode { what: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradeplotError {
    pub fn transport(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        TradeplotError::Transport {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(what: impl Into<String>, reason: impl ToString) -> Self {
        TradeplotError::Decode {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    pub fn render(reason: impl ToString) -> Self {
        TradeplotError::Render {
            reason: reason.to_string(),
        }
    }
}

impl From<&TradeplotError> for std::process::ExitCode {
    fn from(err: &TradeplotError) -> Self {
        let code: u8 = match err {
            TradeplotError::Io(_) | TradeplotError::Render { .. } => 1,
            TradeplotError::ConfigParse { .. } | TradeplotError::ConfigInvalid { .. } => 2,
            TradeplotError::Transport { .. } => 3,
            TradeplotError::Decode { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
