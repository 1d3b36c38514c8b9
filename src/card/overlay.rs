//! Overlay patches for card records
//!
//! The publishing layer keeps hand-maintained corrections as JSON patches
//! keyed by slug. A patch is merged field-wise over the record's JSON
//! representation; the patch wins for every field it names.

use crate::card::CardRecord;
use serde_json::Value;

/// Applies an overlay patch to a record, returning the merged record
///
/// Fields present in the patch replace the record's fields; everything else
/// is kept. Keys the record shape does not know are ignored.
pub fn apply_overlay(card: &CardRecord, patch: &Value) -> serde_json::Result<CardRecord> {
    let mut base = serde_json::to_value(card)?;

    if let (Value::Object(base_map), Value::Object(patch_map)) = (&mut base, patch) {
        for (key, value) in patch_map {
            base_map.insert(key.clone(), value.clone());
        }
    }

    serde_json::from_value(base)
}
