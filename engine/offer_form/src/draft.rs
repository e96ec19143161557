//! # Drafts
//!
//! Encoding and restoring the locally persisted copy of an in-progress offer.
//! This module is pure: the caller supplies the clock and owns the store and
//! the debounce timer.
//!
//! ## Layout
//!
//! One JSON object under one key: every top-level [`FormState`] field plus a
//! `timestamp` in epoch milliseconds.
//!
//! ```text
//! { "agent": {...}, "propertyAddress": "...", "buyers": [...], ..., "timestamp": 1767225600000 }
//! ```
//!
//! ## Restore rules
//!
//! - A draft older than the max age is ignored.
//! - Restored top-level fields override the defaults they are merged onto;
//!   fields the draft lacks keep their defaults.
//! - Anything unreadable is discarded with a warning. Restore never fails.

use serde::de::Error as _;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;
use crate::types::FormState;

/// Default key the draft is stored under.
pub const DRAFT_KEY: &str = "offer-form-draft";
/// Quiet period after the last mutation before the draft is written.
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 3_000;
/// How long the "draft saved" indicator stays visible.
pub const SAVED_INDICATOR_MS: u64 = 2_000;
/// Drafts at least this old are ignored on restore.
pub const DRAFT_MAX_AGE_MS: i64 = 24 * 60 * 60 * 1_000;

const TIMESTAMP: &str = "timestamp";

/// A decoded draft: the merged state and when it was captured.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub state: FormState,
    pub timestamp: i64,
}

/// Serialize `state` with a capture timestamp.
pub fn encode_draft(state: &FormState, timestamp_ms: i64) -> Result<String> {
    let mut value = serde_json::to_value(state)?;
    if let Value::Object(fields) = &mut value {
        fields.insert(TIMESTAMP.to_string(), Value::from(timestamp_ms));
    }
    Ok(serde_json::to_string(&value)?)
}

/// Parse a stored draft and merge it over `base`.
pub fn decode_draft(raw: &str, base: &FormState) -> Result<DraftSnapshot> {
    let Value::Object(mut draft) = serde_json::from_str::<Value>(raw)? else {
        return Err(serde_json::Error::custom("draft is not a JSON object").into());
    };
    let timestamp = draft
        .remove(TIMESTAMP)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| serde_json::Error::custom("draft has no timestamp"))?;

    let mut merged = match serde_json::to_value(base)? {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    merged.extend(draft);

    let state = serde_json::from_value(Value::Object(merged))?;
    Ok(DraftSnapshot { state, timestamp })
}

/// Restore a draft if it is readable and younger than `max_age_ms`.
pub fn restore_draft(raw: &str, base: &FormState, now_ms: i64, max_age_ms: i64) -> Option<FormState> {
    let snapshot = match decode_draft(raw, base) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Discarding unreadable draft: {e}");
            return None;
        }
    };
    let Some(age) = now_ms.checked_sub(snapshot.timestamp) else {
        warn!("Discarding draft with timestamp {}", snapshot.timestamp);
        return None;
    };
    if age >= max_age_ms {
        warn!("Discarding draft saved {age} ms ago (limit {max_age_ms} ms)");
        return None;
    }
    Some(snapshot.state)
}
