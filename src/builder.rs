//! Record builder: identity, linkage and emission
//!
//! The [`RecordBuilder`] turns call tree nodes into display [`Record`]s.
//! It owns the id sequence for one conversion run and the side table of
//! ids already assigned to nodes, which is what resolves parent linkage
//! after the tree is flattened.
//!
//! One builder per conversion run, on one thread. The id counter is not
//! shared or synchronized; reusing a builder across runs would leak ids
//! from the previous run into the next one's linkage.

use crate::api::{resolve_api, DescriptorParser};
use crate::calltree::{CallTree, NodeId};
use crate::domain::{ApiType, ConvertError, RecordId};
use crate::record::{Record, RecordKind, SpanDetail};
use crate::registry::{AnnotationKeyRegistry, ServiceType, ServiceTypeRegistry};
use crate::span::SpanAlignment;
use std::collections::HashMap;

/// Single-owner record id sequence. Ids start at 1; 0 stays reserved as
/// the wire-level "no parent" sentinel.
#[derive(Debug)]
struct RecordIdGen {
    next: u32,
}

impl RecordIdGen {
    fn new() -> Self {
        Self { next: 1 }
    }

    fn next_id(&mut self) -> RecordId {
        // next starts at 1 and only grows, so 0 is unrepresentable here
        let id = RecordId::new(self.next).expect("record ids start at 1");
        self.next += 1;
        id
    }
}

/// Assigns record identity, resolves parent linkage and emits the four
/// record kinds. Scoped to exactly one conversion run.
pub struct RecordBuilder<'a> {
    service_types: &'a dyn ServiceTypeRegistry,
    annotation_keys: &'a dyn AnnotationKeyRegistry,
    parser: &'a dyn DescriptorParser,
    ids: RecordIdGen,
    /// Record ids already assigned to span nodes, used for parent lookup
    /// and for rejecting repeat visits.
    assigned: HashMap<NodeId, RecordId>,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(
        service_types: &'a dyn ServiceTypeRegistry,
        annotation_keys: &'a dyn AnnotationKeyRegistry,
        parser: &'a dyn DescriptorParser,
    ) -> Self {
        Self {
            service_types,
            annotation_keys,
            parser,
            ids: RecordIdGen::new(),
            assigned: HashMap::new(),
        }
    }

    /// Emit the span row for `node`: fresh id, parent linkage, full Api
    /// resolution. Each node may be passed exactly once per run.
    pub fn span_record(
        &mut self,
        tree: &CallTree,
        node: NodeId,
        argument: impl Into<String>,
    ) -> Result<Record, ConvertError> {
        let span = tree.value(node);
        let id = self.assign_id(node)?;
        let parent_id = self.parent_id(tree, node)?;
        let api = resolve_api(span, self.annotation_keys, self.parser);

        Ok(Record {
            depth: span.depth,
            id,
            parent_id,
            title: api.title,
            argument: argument.into(),
            authorized: true,
            kind: RecordKind::Span(SpanDetail {
                start_time: span.start_time,
                elapsed: span.elapsed,
                gap: span.gap,
                agent_id: span.agent_id.clone(),
                application_id: span.application_id.clone(),
                service_type: self.service_types.resolve(span.service_type),
                destination_id: span.destination_id.clone(),
                has_child: span.has_child,
                transaction_id: span.transaction_id.clone(),
                span_id: span.span_id,
                execution_ms: span.execution_ms,
                api_type: api.api_type,
                visible: true,
                simple_class_name: api.simple_class_name,
                full_api_description: api.description,
            }),
        })
    }

    /// Emit a reduced span row for collapsed/aggregated views: same id and
    /// parent assignment as [`span_record`](Self::span_record), but Api
    /// resolution is bypassed and the caller supplies the title.
    pub fn filtered_span_record(
        &mut self,
        tree: &CallTree,
        node: NodeId,
        title: impl Into<String>,
    ) -> Result<Record, ConvertError> {
        let span = tree.value(node);
        let id = self.assign_id(node)?;
        let parent_id = self.parent_id(tree, node)?;

        Ok(Record {
            depth: span.depth,
            id,
            parent_id,
            title: title.into(),
            argument: String::new(),
            authorized: false,
            kind: RecordKind::Span(SpanDetail {
                start_time: span.start_time,
                elapsed: span.elapsed,
                gap: span.gap,
                agent_id: "UNKNOWN".to_string(),
                application_id: span.application_id.clone(),
                service_type: ServiceType::unknown(),
                destination_id: String::new(),
                has_child: false,
                transaction_id: span.transaction_id.clone(),
                span_id: span.span_id,
                execution_ms: span.execution_ms,
                api_type: ApiType::DEFAULT,
                visible: false,
                simple_class_name: String::new(),
                full_api_description: String::new(),
            }),
        })
    }

    /// Emit the exception row for a span, or `None` when the span recorded
    /// no exception. `depth` and `parent_id` come from the span's own row.
    pub fn exception_record(
        &mut self,
        depth: u32,
        parent_id: RecordId,
        span: &SpanAlignment,
    ) -> Option<Record> {
        let exception = span.exception.as_ref()?;
        Some(Record {
            depth,
            id: self.ids.next_id(),
            parent_id: Some(parent_id),
            title: simple_exception_name(&exception.class_name).to_string(),
            argument: exception.message.clone(),
            authorized: true,
            kind: RecordKind::Exception {
                transaction_id: span.transaction_id.clone(),
                span_id: span.span_id,
                execution_ms: span.execution_ms,
            },
        })
    }

    /// Emit one row per annotation the key registry marks visible in the
    /// record set, preserving recorded order. Empty when none qualify.
    pub fn annotation_records(
        &mut self,
        depth: u32,
        parent_id: RecordId,
        span: &SpanAlignment,
    ) -> Vec<Record> {
        span.annotations
            .iter()
            .filter_map(|annotation| {
                let key = self.annotation_keys.resolve(annotation.key);
                if !key.visible_in_record_set {
                    return None;
                }
                Some(Record {
                    depth,
                    id: self.ids.next_id(),
                    parent_id: Some(parent_id),
                    title: key.name,
                    argument: annotation.value.to_string(),
                    authorized: annotation.authorized,
                    kind: RecordKind::Annotation,
                })
            })
            .collect()
    }

    /// Emit a parameter row synthesized from caller-supplied strings; no
    /// span backing, always authorized.
    pub fn parameter_record(
        &mut self,
        depth: u32,
        parent_id: RecordId,
        method: impl Into<String>,
        argument: impl Into<String>,
    ) -> Record {
        Record {
            depth,
            id: self.ids.next_id(),
            parent_id: Some(parent_id),
            title: method.into(),
            argument: argument.into(),
            authorized: true,
            kind: RecordKind::Parameter,
        }
    }

    /// Record id assigned to `node` earlier in this run, if any. The
    /// flatten driver uses this to link synthetic rows to their span row.
    pub fn assigned_id(&self, node: NodeId) -> Option<RecordId> {
        self.assigned.get(&node).copied()
    }

    fn assign_id(&mut self, node: NodeId) -> Result<RecordId, ConvertError> {
        if let Some(&existing) = self.assigned.get(&node) {
            return Err(ConvertError::AlreadyVisited(node, existing));
        }
        let id = self.ids.next_id();
        self.assigned.insert(node, id);
        Ok(id)
    }

    /// Parent-linkage rule: a node with a parent links to the parent's
    /// already-assigned id; the parentless root links to nothing, but only
    /// if it holds a real span. Anything else means the upstream tree was
    /// built or traversed incorrectly.
    fn parent_id(&self, tree: &CallTree, node: NodeId) -> Result<Option<RecordId>, ConvertError> {
        match tree.parent(node) {
            Some(parent) => match self.assigned.get(&parent) {
                Some(&id) => Ok(Some(id)),
                None => Err(ConvertError::ParentNotVisited(node)),
            },
            None => {
                if tree.value(node).is_span {
                    Ok(None)
                } else {
                    Err(ConvertError::RootNotSpan(node))
                }
            }
        }
    }
}

/// Strip the package path from a fully qualified exception class name.
///
/// Empty input stays empty; a name without separators is returned
/// unchanged.
pub fn simple_exception_name(exception_class: &str) -> &str {
    match exception_class.rfind('.') {
        Some(index) => &exception_class[index + 1..],
        None => exception_class,
    }
}
