//! Display records: the flat rows of the call stack view
//!
//! One [`Record`] is one row. All rows share identity and linkage fields
//! (depth, id, parent id, title, argument); everything else lives in a
//! per-kind payload so that exception/annotation/parameter rows don't drag
//! a dozen meaningless span fields around.
//!
//! Records serialize to JSON for the viewer frontend. The wire format keeps
//! the historical conventions the frontend expects: camelCase field names
//! and `parentId: 0` for the root row.

use crate::domain::{ApiType, RecordId, SpanId};
use crate::registry::ServiceType;
use serde::{Serialize, Serializer};

/// Span-only payload of a record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanDetail {
    /// Wall clock start, epoch milliseconds.
    pub start_time: u64,
    pub elapsed: u32,
    pub gap: i64,
    pub agent_id: String,
    pub application_id: String,
    pub service_type: ServiceType,
    pub destination_id: String,
    pub has_child: bool,
    pub transaction_id: String,
    pub span_id: SpanId,
    pub execution_ms: u64,
    pub api_type: ApiType,
    /// False for rows emitted for collapsed/aggregated views.
    pub visible: bool,
    pub simple_class_name: String,
    pub full_api_description: String,
}

/// Per-kind payload of a record.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordKind {
    /// A method row backed by a recorded span.
    Span(SpanDetail),
    /// Synthetic row for the exception a span recorded.
    #[serde(rename_all = "camelCase")]
    Exception { transaction_id: String, span_id: SpanId, execution_ms: u64 },
    /// Synthetic row for one registry-visible annotation.
    Annotation,
    /// Synthetic row supplied directly by the caller.
    Parameter,
}

/// One row of the flattened, display-ready call stack.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub depth: u32,
    pub id: RecordId,
    /// Structural parent's record id; `None` only for the root row,
    /// serialized as 0.
    #[serde(serialize_with = "serialize_parent")]
    pub parent_id: Option<RecordId>,
    pub title: String,
    pub argument: String,
    pub authorized: bool,
    #[serde(flatten)]
    pub kind: RecordKind,
}

impl Record {
    /// True exactly for span-backed rows (full and filtered).
    pub fn is_method(&self) -> bool {
        matches!(self.kind, RecordKind::Span(_))
    }

    /// True exactly for exception rows.
    pub fn is_exception(&self) -> bool {
        matches!(self.kind, RecordKind::Exception { .. })
    }

    /// Span payload, when this is a span row.
    pub fn span_detail(&self) -> Option<&SpanDetail> {
        match &self.kind {
            RecordKind::Span(detail) => Some(detail),
            _ => None,
        }
    }
}

fn serialize_parent<S: Serializer>(
    parent: &Option<RecordId>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u32(parent.map_or(0, RecordId::get))
}
