//! # Command Layer
//!
//! Business logic for each operation. Functions here take the transport,
//! endpoints and the in-memory documents explicitly and return plain Rust
//! values; nothing in this layer prints or exits.
//!
//! - [`urls`]: pure construction of the step-one and step-two URLs
//! - [`authorize`]: the login emulation and authorization-code exchange
//! - [`refresh`]: the refresh-token exchange, falling back to [`authorize`]
//! - [`search`]: the part search call, cache updates and result shaping

pub mod authorize;
pub mod refresh;
pub mod search;
pub mod urls;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// What a command hands back to the UI: an optional payload destined for
/// standard output plus status messages.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CmdResult {
    pub output: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }
}
