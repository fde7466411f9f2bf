//! Reply payload composition

use crate::catalog::WordEntry;
use serde::Serialize;

/// Example offered when the conversation has not been served a word yet
const GENERIC_EXAMPLE: &str = "J'apprends un nouveau mot chaque jour.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Message,
}

/// Suggested quick reply attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub payload: String,
}

impl Action {
    fn postback(title: &str, payload: &str) -> Self {
        Self {
            kind: "postback".to_string(),
            title: title.to_string(),
            payload: payload.to_string(),
        }
    }
}

/// Body returned to the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundPayload {
    #[serde(rename = "type")]
    pub kind: PayloadKind,
    pub text: String,
    pub actions: Vec<Action>,
}

impl OutboundPayload {
    fn message(text: String, actions: Vec<Action>) -> Self {
        Self {
            kind: PayloadKind::Message,
            text,
            actions,
        }
    }
}

/// Present `entry` as the word of the day
pub fn daily_word(entry: &WordEntry) -> OutboundPayload {
    let text = format!(
        "📘 Word of the day: *{word}* ({pronunciation})\n\
         Meaning: {meaning}\n\
         Example: {example}\n\n\
         Reply with your own sentence using \"{word}\"!",
        word = entry.word,
        pronunciation = entry.pronunciation,
        meaning = entry.meaning,
        example = entry.example,
    );

    OutboundPayload::message(
        text,
        vec![
            Action::postback("I'll use it now", "use_now"),
            Action::postback("Send a sentence later", "send_later"),
        ],
    )
}

/// Whether the normalized `reply` contains `word`, ignoring case
pub fn uses_word(reply: &str, word: &str) -> bool {
    let word = word.trim().to_lowercase();
    !word.is_empty() && reply.trim().to_lowercase().contains(&word)
}

/// Outcome of checking a practice sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    Used(&'a WordEntry),
    Missing(&'a WordEntry),
    /// Nothing has been served to the conversation yet
    NoWord,
}

impl<'a> Verdict<'a> {
    pub fn judge(reply: &str, previous: Option<&'a WordEntry>) -> Self {
        match previous {
            Some(entry) if uses_word(reply, &entry.word) => Self::Used(entry),
            Some(entry) => Self::Missing(entry),
            None => Self::NoWord,
        }
    }

    pub fn word(self) -> Option<&'a str> {
        match self {
            Self::Used(entry) | Self::Missing(entry) => Some(entry.word.as_str()),
            Self::NoWord => None,
        }
    }

    pub fn is_used(self) -> bool {
        matches!(self, Self::Used(_))
    }
}

/// Acknowledge a practice sentence
pub fn acknowledgement(verdict: Verdict<'_>) -> OutboundPayload {
    let text = match verdict {
        Verdict::Used(entry) => format!(
            "🎉 Great job! You used \"{}\" correctly. Send \"daily word\" for the next one.",
            entry.word
        ),
        Verdict::Missing(entry) => format!(
            "Nice try! Try to include \"{}\" in your sentence, for example: {}",
            entry.word, entry.example
        ),
        Verdict::NoWord => format!(
            "Nice try! Include today's word in a full sentence, for example: {GENERIC_EXAMPLE} \
             Send \"daily word\" to get your word."
        ),
    };

    OutboundPayload::message(text, Vec::new())
}
