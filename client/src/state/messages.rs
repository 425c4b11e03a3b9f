//! Realtime message reconciliation for the open chat view.
//!
//! DESIGN
//! ======
//! Each realtime batch is a full snapshot of one chat's messages. Merging is
//! keyed by message id: fields present on the incoming record win, absent
//! fields fall back to the previously-known record. The timestamp is the one
//! field with a stricter rule: a known timestamp survives an incoming record
//! whose timestamp is missing or null.
//!
//! Output is ordered ascending by timestamp with a stable sort, so records
//! sharing a timestamp (or lacking one, which orders as the epoch) keep the
//! order in which the batch delivered them.

#[cfg(test)]
#[path = "messages_test.rs"]
mod messages_test;

use std::collections::HashMap;

use chrono::{FixedOffset, NaiveDate};
use wire::model::{Message, MessagePatch};

use crate::util::time;

/// Merge one incoming record over the previously-known record with the same id.
pub fn merge_record(prev: Option<&Message>, incoming: &MessagePatch, chat_id: &str) -> Message {
    let timestamp = match (prev.and_then(|p| p.timestamp.as_ref()), &incoming.timestamp) {
        (Some(known), None) => Some(known.clone()),
        (_, supplied) => supplied.clone(),
    };

    Message {
        id: incoming.id.clone(),
        chat_id: incoming
            .chat_id
            .clone()
            .or_else(|| prev.map(|p| p.chat_id.clone()))
            .unwrap_or_else(|| chat_id.to_owned()),
        sender: incoming
            .sender
            .clone()
            .or_else(|| prev.map(|p| p.sender.clone()))
            .unwrap_or_default(),
        content: incoming
            .content
            .clone()
            .or_else(|| prev.map(|p| p.content.clone()))
            .unwrap_or_default(),
        timestamp,
        read: incoming.read.or(prev.map(|p| p.read)).unwrap_or(false),
    }
}

/// Reconcile a realtime batch against the current ordered messages.
///
/// Records addressed to another chat are dropped. Returns `None` when the
/// batch held records and every one of them belonged to another chat, meaning
/// the current view stays as is. Otherwise the batch replaces the visible set:
/// ids missing from it are gone, and an empty batch empties the chat.
pub fn merge_batch(prev: &[Message], incoming: &[MessagePatch], chat_id: &str) -> Option<Vec<Message>> {
    let known: HashMap<&str, &Message> = prev.iter().map(|m| (m.id.as_str(), m)).collect();

    let mut merged: Vec<Message> = Vec::with_capacity(incoming.len());
    let mut position: HashMap<String, usize> = HashMap::new();

    for record in incoming
        .iter()
        .filter(|r| r.chat_id.as_deref().is_none_or(|c| c == chat_id))
    {
        if let Some(&at) = position.get(&record.id) {
            let collapsed = merge_record(Some(&merged[at]), record, chat_id);
            merged[at] = collapsed;
            continue;
        }
        let prior = known.get(record.id.as_str()).copied();
        position.insert(record.id.clone(), merged.len());
        merged.push(merge_record(prior, record, chat_id));
    }

    if merged.is_empty() && !incoming.is_empty() {
        return None;
    }
    sort_by_time(&mut merged);
    Some(merged)
}

/// Stable ascending sort by timestamp; unparseable timestamps order as the epoch.
pub fn sort_by_time(messages: &mut [Message]) {
    messages.sort_by_key(|m| time::sort_key(m.timestamp.as_deref()));
}

/// Messages from one calendar day, for date separators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub messages: Vec<Message>,
}

/// Split an ordered sequence into consecutive per-day groups.
pub fn group_by_day(messages: &[Message], offset: FixedOffset) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for message in messages {
        let day = time::local_day(message.timestamp.as_deref(), offset);
        if let Some(group) = groups.last_mut().filter(|g| g.day == day) {
            group.messages.push(message.clone());
            continue;
        }
        groups.push(DayGroup { day, messages: vec![message.clone()] });
    }
    groups
}

