//! Per-event orchestration: classify the inbound event, then either serve the
//! next word or acknowledge a practice sentence.

use crate::compose::{self, OutboundPayload, Verdict};
use crate::inbound::{InboundEvent, Intent};
use crate::progress::ProgressResult;
use crate::rotation::Rotation;
use serde_json::Value;

pub fn respond(rotation: &Rotation, payload: &Value) -> ProgressResult<OutboundPayload> {
    let event = InboundEvent::from_payload(payload);

    match event.intent() {
        Intent::NextWord => {
            let selection = rotation.pick_next(&event.conversation_id)?;
            tracing::info!(
                conversation = %event.conversation_id,
                index = selection.index,
                word = %selection.entry.word,
                "Served daily word"
            );
            Ok(compose::daily_word(selection.entry))
        }
        Intent::Reply(reply) => {
            let previous = rotation.last_served(&event.conversation_id);
            let verdict = Verdict::judge(reply, previous.map(|s| s.entry));
            tracing::debug!(
                conversation = %event.conversation_id,
                word = verdict.word(),
                used = verdict.is_used(),
                "Acknowledged reply"
            );
            Ok(compose::acknowledgement(verdict))
        }
    }
}
