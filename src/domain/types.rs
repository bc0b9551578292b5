//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers prevent common bugs like passing an annotation key
//! code where a service type code is expected, and make function signatures
//! more expressive.

use serde::Serialize;
use std::fmt;
use std::num::NonZeroU32;

/// Identity of one display record within a single conversion run.
///
/// Ids are assigned sequentially starting at 1. The value 0 is reserved as
/// the "no parent" sentinel on the wire, which is why this wraps
/// [`NonZeroU32`]: a real record id of 0 cannot be constructed at all.
/// Absent parents are modeled as `Option<RecordId>` and serialized as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordId(NonZeroU32);

impl RecordId {
    /// Create a record id from a raw value. Returns `None` for 0.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// The raw id value (always >= 1).
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Span ID as recorded by the tracing agent.
///
/// Distinct from [`RecordId`]: span ids are global to the trace, record ids
/// are local to one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SpanId(pub i64);

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric code identifying the service type of a span (web server,
/// database client, cache, ...). Resolved to a display name through the
/// service type registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ServiceTypeCode(pub i16);

impl fmt::Display for ServiceTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceType:{}", self.0)
    }
}

/// Numeric code identifying the kind of an annotation attached to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct AnnotationKeyCode(pub i32);

impl fmt::Display for AnnotationKeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnnotationKey:{}", self.0)
    }
}

/// Type tag of recorded API metadata.
///
/// 0 means the descriptor was captured uninstrumented and still needs to be
/// parsed into class/method names; any other value means a specific
/// instrumentation pre-formatted the descriptor and it is displayed
/// verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ApiType(pub i32);

impl ApiType {
    /// The default/uninstrumented tag whose descriptors go through the
    /// descriptor parser.
    pub const DEFAULT: ApiType = ApiType(0);

    /// Returns true if descriptors with this tag need parsing.
    pub fn is_default(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiType:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_rejects_zero() {
        assert!(RecordId::new(0).is_none());
        assert_eq!(RecordId::new(1).unwrap().get(), 1);
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::new(42).unwrap().to_string(), "#42");
    }

    #[test]
    fn test_record_id_ordering() {
        assert!(RecordId::new(1).unwrap() < RecordId::new(2).unwrap());
    }

    #[test]
    fn test_api_type_default() {
        assert!(ApiType::DEFAULT.is_default());
        assert!(ApiType(0).is_default());
        assert!(!ApiType(310).is_default());
    }

    #[test]
    fn test_code_display() {
        assert_eq!(ServiceTypeCode(1010).to_string(), "ServiceType:1010");
        assert_eq!(AnnotationKeyCode(13).to_string(), "AnnotationKey:13");
    }
}
