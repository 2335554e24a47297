//! Diagnostics produced while resolving synthetic metavariables
//!
//! Resolution only ever reports errors, so a message carries no severity.

use lean5_meta::{Name, SourceInfo};
use serde::Serialize;

/// One error, attached to the syntax it was reported at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// `None` when the syntax carried no position
    pub pos: Option<SourceInfo>,
    /// Declaration being elaborated when the message was logged
    pub decl_name: Option<Name>,
    pub text: String,
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pos {
            Some(pos) => write!(f, "{pos}: error: {}", self.text),
            None => write!(f, "error: {}", self.text),
        }
    }
}

/// Ordered log of diagnostics
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        tracing::debug!(pos = ?message.pos, "error: {}", message.text);
        self.messages.push(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every message logged after the first `len`
    pub(crate) fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }
}
