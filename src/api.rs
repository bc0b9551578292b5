//! API descriptor resolution
//!
//! Derives `{title, simple class name, description, api type}` for a span
//! through a three-way fallback that never fails:
//!
//! 1. Structured API metadata present, default type tag: parse the raw
//!    descriptor into class/method names; on parse failure log and keep the
//!    raw text.
//! 2. Metadata present, non-default tag: the descriptor was pre-formatted
//!    by a specific instrumentation, display it verbatim.
//! 3. No metadata: the span recorded no API call. Title becomes the most
//!    specific API-error annotation the registry recognizes, or the fixed
//!    generic metadata-error name.
//!
//! Whatever the stored trace looks like, every span ends up with a
//! non-empty title.

use crate::domain::errors::DescriptorParseError;
use crate::domain::ApiType;
use crate::registry::{AnnotationKey, AnnotationKeyRegistry};
use crate::span::SpanAlignment;
use log::warn;

/// Parsed form of a raw API descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDescription {
    /// Short method description, e.g. `handle(Request request)`.
    pub simple_method_description: String,
    /// Simple name of the owning class, e.g. `Controller`.
    pub simple_class_name: String,
}

/// External seam to the descriptor parser.
///
/// The grammar is owned by the host; this crate only consumes the outcome.
/// Failures are recoverable by contract: the resolver logs them and falls
/// back to the raw descriptor text.
pub trait DescriptorParser {
    fn parse(&self, descriptor: &str) -> Result<ApiDescription, DescriptorParseError>;
}

/// Resolution result for one span. Transient: consumed while building the
/// span record, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Api {
    pub title: String,
    pub simple_class_name: String,
    pub description: String,
    pub api_type: ApiType,
}

/// Resolve display metadata for one span. Never fails; see the module docs
/// for the fallback order.
pub fn resolve_api(
    span: &SpanAlignment,
    keys: &dyn AnnotationKeyRegistry,
    parser: &dyn DescriptorParser,
) -> Api {
    let Some(meta) = span.api_metadata() else {
        // No API call recorded on this span
        return Api { title: metadata_error_key(span, keys).name, ..Api::default() };
    };

    let raw = meta.raw_descriptor();
    let mut api = Api {
        title: raw.clone(),
        simple_class_name: String::new(),
        description: raw,
        api_type: meta.api_type,
    };
    if meta.api_type.is_default() {
        match parser.parse(&api.description) {
            Ok(parsed) => {
                api.title = parsed.simple_method_description;
                api.simple_class_name = parsed.simple_class_name;
            }
            Err(err) => warn!("keeping raw api descriptor: {err}"),
        }
    }
    api
}

/// Most specific API-error annotation the registry recognizes, falling back
/// to the generic metadata-error key.
fn metadata_error_key(span: &SpanAlignment, keys: &dyn AnnotationKeyRegistry) -> AnnotationKey {
    span.annotations
        .iter()
        .find_map(|annotation| keys.resolve_error_code(annotation.key))
        .unwrap_or_else(AnnotationKey::metadata_error)
}
