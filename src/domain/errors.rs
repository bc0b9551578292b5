//! Structured error types for callgrid
//!
//! Using thiserror for automatic Display implementation and error chaining.
//!
//! Two distinct failure families exist in this crate:
//! - [`ConvertError`]: structural violations in the call tree or in the
//!   visit order. These abort the whole conversion, they signal a defect in
//!   the upstream tree construction, not in the trace data.
//! - [`DescriptorParseError`]: a malformed raw API descriptor. Recoverable,
//!   the resolver logs it and falls back to the raw text.

use super::types::RecordId;
use crate::calltree::NodeId;
use thiserror::Error;

/// Fatal structural violation detected while converting a call tree into
/// display records. A well-formed tree visited in depth-first order never
/// produces one of these.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("call tree root {0} does not hold a span")]
    RootNotSpan(NodeId),

    #[error("parent of {0} has no record id yet; nodes must be visited parents-first")]
    ParentNotVisited(NodeId),

    #[error("{0} was already assigned record id {1}")]
    AlreadyVisited(NodeId, RecordId),
}

/// A raw API descriptor that the descriptor parser could not understand.
///
/// Produced by [`DescriptorParser`](crate::api::DescriptorParser)
/// implementations. The Api resolver catches this, logs it and keeps the
/// raw descriptor as the title; it never propagates past the resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed api descriptor {descriptor:?}: {reason}")]
pub struct DescriptorParseError {
    /// The descriptor text that failed to parse.
    pub descriptor: String,
    /// Parser-specific explanation of the failure.
    pub reason: String,
}

impl DescriptorParseError {
    pub fn new(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { descriptor: descriptor.into(), reason: reason.into() }
    }
}
