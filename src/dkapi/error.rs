use thiserror::Error;

#[derive(Error, Debug)]
pub enum DkapiError {
    #[error("State/config file is missing the {key} key. {hint}")]
    MissingConfig {
        key: &'static str,
        hint: &'static str,
    },

    #[error("Authentication failed in {stage}: {reason}")]
    Auth { stage: &'static str, reason: String },

    #[error("Part search failed with status {status}: {body}")]
    Search { status: u16, body: String },

    #[error("No login form action found in the authorization page")]
    FormAction,

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Api Error: {0}")]
    Api(String),
}

impl DkapiError {
    pub fn auth(stage: &'static str, reason: impl Into<String>) -> Self {
        DkapiError::Auth {
            stage,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DkapiError>;
