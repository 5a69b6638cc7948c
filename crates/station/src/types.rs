//! Shared job types for the station workflow.

use chrono::{DateTime, Utc};
use labelforge_core::{LabelSpec, StickerKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operator request for a batch of inventory labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRequest {
    pub spec: LabelSpec,
    pub kind: StickerKind,
    /// Labels the operator asked for (rounded up to whole stickers).
    pub labels: u32,
    /// Allocate a serial and suffix it to the title.
    pub serialized: bool,
}

/// Operator request for plain free-text labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlainRequest {
    pub text: String,
    pub kind: StickerKind,
    pub labels: u32,
}

/// Summary of a completed print job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReceipt {
    pub job_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Final label name, serial suffix included.
    pub name: String,
    pub labels: u32,
    pub stickers: u32,
    pub serial: Option<u64>,
    /// Inventory records committed to the ledger for this job.
    pub records: Vec<String>,
}
