//! Span data as aligned for the call stack view
//!
//! A [`SpanAlignment`] is one recorded unit of work, already positioned in
//! the call tree by the upstream tree builder: depth, gap to the previous
//! row and self-execution time are precomputed there. This core reads the
//! alignment, it never recomputes timing.

use crate::domain::{AnnotationKeyCode, ApiType, ServiceTypeCode, SpanId};
use std::fmt;

/// Exception captured on a span: fully qualified class name plus message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanException {
    pub class_name: String,
    pub message: String,
}

/// Structured API metadata identifying which method/endpoint a span
/// represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiMetadata {
    /// Raw serialized API signature as stored by the agent.
    pub api_info: String,
    /// Source line of the call site, when the agent recorded one.
    pub line: Option<u32>,
    /// Instrumentation tag; see [`ApiType`].
    pub api_type: ApiType,
}

impl ApiMetadata {
    /// The raw descriptor shown to the user when parsing is skipped or
    /// fails: the stored signature, with `:<line>` appended when the call
    /// site line is known.
    pub fn raw_descriptor(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{line}", self.api_info),
            None => self.api_info.clone(),
        }
    }
}

/// Value payload of an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    Text(String),
    Long(i64),
    /// Structured API metadata; at most one per span is meaningful.
    ApiMetadata(ApiMetadata),
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Text(text) => write!(f, "{text}"),
            AnnotationValue::Long(value) => write!(f, "{value}"),
            AnnotationValue::ApiMetadata(meta) => write!(f, "{}", meta.raw_descriptor()),
        }
    }
}

/// Typed key/value attached to a span (API descriptor, error code,
/// argument, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub key: AnnotationKeyCode,
    pub value: AnnotationValue,
    /// Whether the viewing user is allowed to see the value.
    pub authorized: bool,
}

/// One recorded span, aligned for display.
///
/// Read-only from this crate's perspective. The record ids assigned during
/// conversion live in the [`RecordBuilder`](crate::builder::RecordBuilder),
/// not here, so the same tree can be flattened more than once.
#[derive(Debug, Clone, Default)]
pub struct SpanAlignment {
    /// Indentation depth in the call stack view (root is 0).
    pub depth: u32,
    /// Wall clock start, epoch milliseconds.
    pub start_time: u64,
    /// Total elapsed time in milliseconds.
    pub elapsed: u32,
    /// Gap to the previous row in milliseconds. May be negative under
    /// agent clock skew; not validated here.
    pub gap: i64,
    pub agent_id: String,
    pub application_id: String,
    pub service_type: ServiceTypeCode,
    /// Target of remote calls (queue name, database address, ...).
    pub destination_id: String,
    pub has_child: bool,
    pub transaction_id: String,
    pub span_id: SpanId,
    /// Self execution time in milliseconds (elapsed minus children).
    pub execution_ms: u64,
    /// Annotations in recorded order.
    pub annotations: Vec<Annotation>,
    pub exception: Option<SpanException>,
    /// True for real spans, false for synthetic alignments (e.g. rows
    /// representing the remote side of an incomplete trace).
    pub is_span: bool,
}

impl SpanAlignment {
    /// First annotation carrying structured API metadata, if any.
    ///
    /// First match wins when duplicates exist; agents are not supposed to
    /// record more than one.
    pub fn api_metadata(&self) -> Option<&ApiMetadata> {
        self.annotations.iter().find_map(|annotation| match &annotation.value {
            AnnotationValue::ApiMetadata(meta) => Some(meta),
            _ => None,
        })
    }
}
