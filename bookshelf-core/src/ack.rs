//! Write acknowledgments returned by store backends.
//!
//! These mirror the summaries a MongoDB server reports for single-document writes and are
//! serialized with the same camelCase field names, so they can be handed to clients as-is.

use serde::{Deserialize, Serialize};

use crate::document::RecordId;

/// Result of inserting a single record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    /// The identifier the store assigned to the new record.
    pub inserted_id: RecordId,
}

impl InsertAck {
    pub fn new(inserted_id: RecordId) -> Self {
        Self { acknowledged: true, inserted_id }
    }
}

/// Result of merging fields into a single record.
///
/// Upserts are never requested, so `upserted_count` is always 0 and `upserted_id` is
/// always `None`; both are kept for wire compatibility.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<RecordId>,
}

impl UpdateAck {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

/// Result of deleting a single record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        Self { acknowledged: true, deleted_count }
    }
}
