//! Depth-first flattening driver
//!
//! Walks a [`CallTree`] in display order and emits the full row sequence:
//! for every node the span row, then its exception row (if any), then its
//! registry-visible annotation rows. Exception and annotation rows are
//! indented one level below their span and linked to the span row's id.
//!
//! Parameter rows are host-specific (they depend on what the surrounding
//! view wants to inject), so they stay a direct
//! [`RecordBuilder::parameter_record`] call for the host.

use crate::builder::RecordBuilder;
use crate::calltree::CallTree;
use crate::domain::ConvertError;
use crate::record::Record;
use crate::span::SpanAlignment;

/// Flatten `tree` into the ordered row sequence of the call stack view.
///
/// `argument_of` supplies the display argument for each span row (typically
/// the span's recorded method arguments); the tree itself does not carry
/// that decision.
///
/// Consumes one conversion run of `builder`: the builder must be fresh and
/// must not be reused afterwards for another tree.
pub fn flatten<F>(
    tree: &CallTree,
    builder: &mut RecordBuilder<'_>,
    mut argument_of: F,
) -> Result<Vec<Record>, ConvertError>
where
    F: FnMut(&SpanAlignment) -> String,
{
    let mut records = Vec::with_capacity(tree.len());
    for node in tree.depth_first() {
        let span = tree.value(node);
        let span_row = builder.span_record(tree, node, argument_of(span))?;
        let span_row_id = span_row.id;
        records.push(span_row);

        let detail_depth = span.depth + 1;
        if let Some(exception_row) = builder.exception_record(detail_depth, span_row_id, span) {
            records.push(exception_row);
        }
        records.extend(builder.annotation_records(detail_depth, span_row_id, span));
    }
    Ok(records)
}
