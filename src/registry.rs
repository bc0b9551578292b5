//! Service type and annotation key registries
//!
//! The registries map the numeric codes recorded by tracing agents to
//! display metadata. Their contents are owned by the host environment; this
//! crate only defines the lookup contract and a `HashMap`-backed
//! implementation for hosts and tests.
//!
//! Both lookups are total functions: an unrecognized code resolves to an
//! explicit UNKNOWN sentinel, never to an error. Conversion must keep going
//! whatever codes show up in stored traces.

use crate::domain::{AnnotationKeyCode, ServiceTypeCode};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Annotation key code under which agents record structured API metadata.
pub const API_METADATA: AnnotationKeyCode = AnnotationKeyCode(13);

/// Generic "API metadata missing" error code, used as the last-resort title
/// when a span recorded no API call and no more specific error code either.
pub const API_METADATA_ERROR: AnnotationKeyCode = AnnotationKeyCode(10_000_010);

/// Display descriptor for a service type code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceType {
    pub code: ServiceTypeCode,
    pub name: String,
}

impl ServiceType {
    /// Sentinel returned for codes the registry does not know.
    pub fn unknown() -> Self {
        Self { code: ServiceTypeCode(1), name: "UNKNOWN".to_string() }
    }
}

/// Display descriptor for an annotation key code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationKey {
    pub code: AnnotationKeyCode,
    /// Human-readable key name shown as the row title.
    pub name: String,
    /// Whether rows for this key appear in the call stack view at all.
    pub visible_in_record_set: bool,
}

impl AnnotationKey {
    /// Sentinel returned for codes the registry does not know. Hidden from
    /// the record set.
    pub fn unknown(code: AnnotationKeyCode) -> Self {
        Self { code, name: "UNKNOWN".to_string(), visible_in_record_set: false }
    }

    /// The fixed generic fallback for spans without API metadata.
    pub fn metadata_error() -> Self {
        Self {
            code: API_METADATA_ERROR,
            name: "API-METADATA-ERROR".to_string(),
            visible_in_record_set: false,
        }
    }
}

/// Total lookup of service type display metadata.
pub trait ServiceTypeRegistry {
    /// Resolve a code. Unknown codes map to [`ServiceType::unknown`].
    fn resolve(&self, code: ServiceTypeCode) -> ServiceType;
}

/// Total lookup of annotation key display metadata.
pub trait AnnotationKeyRegistry {
    /// Resolve a code. Unknown codes map to [`AnnotationKey::unknown`].
    fn resolve(&self, code: AnnotationKeyCode) -> AnnotationKey;

    /// Resolve a code only if it is a known API-error code; `None`
    /// otherwise.
    fn resolve_error_code(&self, code: AnnotationKeyCode) -> Option<AnnotationKey>;
}

/// `HashMap`-backed [`ServiceTypeRegistry`].
#[derive(Debug, Default)]
pub struct MapServiceTypeRegistry {
    types: HashMap<ServiceTypeCode, ServiceType>,
}

impl MapServiceTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, code: ServiceTypeCode, name: impl Into<String>) {
        self.types.insert(code, ServiceType { code, name: name.into() });
    }
}

impl ServiceTypeRegistry for MapServiceTypeRegistry {
    fn resolve(&self, code: ServiceTypeCode) -> ServiceType {
        self.types.get(&code).cloned().unwrap_or_else(ServiceType::unknown)
    }
}

/// `HashMap`-backed [`AnnotationKeyRegistry`].
#[derive(Debug, Default)]
pub struct MapAnnotationKeyRegistry {
    keys: HashMap<AnnotationKeyCode, AnnotationKey>,
    error_codes: HashSet<AnnotationKeyCode>,
}

impl MapAnnotationKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, code: AnnotationKeyCode, name: impl Into<String>, visible: bool) {
        self.keys.insert(
            code,
            AnnotationKey { code, name: name.into(), visible_in_record_set: visible },
        );
    }

    /// Register a key that also counts as an API-error code for
    /// [`AnnotationKeyRegistry::resolve_error_code`].
    pub fn register_error(&mut self, code: AnnotationKeyCode, name: impl Into<String>) {
        self.register(code, name, false);
        self.error_codes.insert(code);
    }
}

impl AnnotationKeyRegistry for MapAnnotationKeyRegistry {
    fn resolve(&self, code: AnnotationKeyCode) -> AnnotationKey {
        self.keys.get(&code).cloned().unwrap_or_else(|| AnnotationKey::unknown(code))
    }

    fn resolve_error_code(&self, code: AnnotationKeyCode) -> Option<AnnotationKey> {
        if self.error_codes.contains(&code) {
            self.keys.get(&code).cloned()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_service_type_is_total() {
        let registry = MapServiceTypeRegistry::new();
        let resolved = registry.resolve(ServiceTypeCode(9999));
        assert_eq!(resolved, ServiceType::unknown());
    }

    #[test]
    fn test_registered_service_type_resolves() {
        let mut registry = MapServiceTypeRegistry::new();
        registry.register(ServiceTypeCode(1010), "TOMCAT");
        assert_eq!(registry.resolve(ServiceTypeCode(1010)).name, "TOMCAT");
    }

    #[test]
    fn test_unknown_annotation_key_is_hidden() {
        let registry = MapAnnotationKeyRegistry::new();
        let key = registry.resolve(AnnotationKeyCode(77));
        assert_eq!(key.name, "UNKNOWN");
        assert!(!key.visible_in_record_set);
    }

    #[test]
    fn test_error_code_lookup_only_matches_registered_errors() {
        let mut registry = MapAnnotationKeyRegistry::new();
        registry.register(AnnotationKeyCode(14), "SQL", true);
        registry.register_error(AnnotationKeyCode(10_000_000), "API-METADATA-NOT-FOUND");

        assert!(registry.resolve_error_code(AnnotationKeyCode(14)).is_none());
        let error = registry.resolve_error_code(AnnotationKeyCode(10_000_000)).unwrap();
        assert_eq!(error.name, "API-METADATA-NOT-FOUND");
    }
}
