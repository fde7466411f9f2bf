//! Inbound event interpretation
//!
//! Chat platforms post differently shaped documents. Conversation identity and
//! message text are pulled out by ordered rule lists; the first rule that
//! yields a value wins.

use serde_json::Value;

/// Conversation used when no rule finds an identifier
pub const DEFAULT_CONVERSATION_ID: &str = "default";

/// Normalized inputs that ask for the next word
pub const TRIGGER_PHRASES: [&str; 3] = ["daily word", "start", "help"];

/// How to locate a conversation identifier in a payload
#[derive(Debug, Clone, Copy)]
enum IdRule {
    /// Scalar at a JSON pointer
    Field(&'static str),
    /// First `/`-separated segment of the string at a JSON pointer
    FirstSegment(&'static str),
}

const CONVERSATION_RULES: &[IdRule] = &[
    IdRule::Field("/channel/id"),
    IdRule::Field("/channelId"),
    IdRule::Field("/channel_id"),
    IdRule::FirstSegment("/address"),
    IdRule::Field("/metadata/channelId"),
    IdRule::Field("/metadata/channel_id"),
];

const TEXT_FIELDS: &[&str] = &["/text", "/message/text", "/message", "/content", "/body"];

impl IdRule {
    fn apply(self, payload: &Value) -> Option<String> {
        match self {
            IdRule::Field(pointer) => scalar_id(payload.pointer(pointer)?),
            IdRule::FirstSegment(pointer) => payload
                .pointer(pointer)?
                .as_str()?
                .split('/')
                .map(str::trim)
                .find(|segment| !segment.is_empty())
                .map(ToString::to_string),
        }
    }
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// What the sender is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent<'a> {
    /// Deliver the next word in the rotation
    NextWord,
    /// A practice sentence to check against the last word
    Reply(&'a str),
}

/// The parts of an inbound event the responder cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub conversation_id: String,
    /// Trimmed and lowercased message text, empty when absent
    pub text: String,
}

impl InboundEvent {
    pub fn from_payload(payload: &Value) -> Self {
        let conversation_id = CONVERSATION_RULES
            .iter()
            .find_map(|rule| rule.apply(payload))
            .unwrap_or_else(|| DEFAULT_CONVERSATION_ID.to_string());

        let text = TEXT_FIELDS
            .iter()
            .find_map(|pointer| payload.pointer(pointer)?.as_str())
            .map(normalize)
            .unwrap_or_default();

        Self {
            conversation_id,
            text,
        }
    }

    pub fn intent(&self) -> Intent<'_> {
        if self.text.is_empty() || TRIGGER_PHRASES.contains(&self.text.as_str()) {
            Intent::NextWord
        } else {
            Intent::Reply(&self.text)
        }
    }
}

pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
