//! Field declaration checks.

use thrift_lint_core::ast::{NodeKind, Requiredness};
use thrift_lint_core::{Check, KindConstraint};

/// Reports an error when a field has no explicit ID.
#[must_use]
pub fn field_id_missing() -> Check {
    Check::new(
        "field.id.missing",
        vec![KindConstraint::Kind(NodeKind::Field)],
        |ctx, nodes| {
            let Some(field) = nodes.last().and_then(|n| n.as_field()) else {
                return;
            };
            if field.id.is_none() {
                ctx.error(field.pos, format!("field ID for {:?} is missing", field.name));
            }
        },
    )
}

/// Reports an error when a field's ID is explicitly negative.
#[must_use]
pub fn field_id_negative() -> Check {
    Check::new(
        "field.id.negative",
        vec![KindConstraint::Kind(NodeKind::Field)],
        |ctx, nodes| {
            let Some(field) = nodes.last().and_then(|n| n.as_field()) else {
                return;
            };
            if let Some(id) = field.id {
                if id < 0 {
                    ctx.error(
                        field.pos,
                        format!("field ID for {:?} ({id}) is negative", field.name),
                    );
                }
            }
        },
    )
}

/// Reports an error when a field's ID is explicitly zero.
#[must_use]
pub fn field_id_zero() -> Check {
    Check::new(
        "field.id.zero",
        vec![KindConstraint::Kind(NodeKind::Field)],
        |ctx, nodes| {
            let Some(field) = nodes.last().and_then(|n| n.as_field()) else {
                return;
            };
            if field.id == Some(0) {
                ctx.error(field.pos, format!("field ID for {:?} is zero", field.name));
            }
        },
    )
}

/// Warns when a field is not declared `optional`.
#[must_use]
pub fn field_optional() -> Check {
    Check::new(
        "field.optional",
        vec![KindConstraint::Kind(NodeKind::Field)],
        |ctx, nodes| {
            let Some(field) = nodes.last().and_then(|n| n.as_field()) else {
                return;
            };
            if field.requiredness != Requiredness::Optional {
                ctx.warning(
                    field.pos,
                    format!(
                        "field {:?} ({}) should be \"optional\"",
                        field.name,
                        field.id.unwrap_or(0)
                    ),
                );
            }
        },
    )
}

/// Warns when a field's requiredness is left unspecified.
#[must_use]
pub fn field_requiredness() -> Check {
    Check::new(
        "field.requiredness",
        vec![KindConstraint::Kind(NodeKind::Field)],
        |ctx, nodes| {
            let Some(field) = nodes.last().and_then(|n| n.as_field()) else {
                return;
            };
            if field.requiredness == Requiredness::Unspecified {
                ctx.warning(
                    field.pos,
                    format!(
                        "field {:?} ({}) should be explicitly \"required\" or \"optional\"",
                        field.name,
                        field.id.unwrap_or(0)
                    ),
                );
            }
        },
    )
}

/// Warns when a field has no doc comment.
#[must_use]
pub fn field_doc_missing() -> Check {
    Check::new(
        "field.doc.missing",
        vec![KindConstraint::Kind(NodeKind::Field)],
        |ctx, nodes| {
            let Some(field) = nodes.last().and_then(|n| n.as_field()) else {
                return;
            };
            if field.doc.as_deref().unwrap_or("").is_empty() {
                ctx.warning(
                    field.pos,
                    format!(
                        "field {:?} ({}) has no doc comment",
                        field.name,
                        field.id.unwrap_or(0)
                    ),
                );
            }
        },
    )
}
