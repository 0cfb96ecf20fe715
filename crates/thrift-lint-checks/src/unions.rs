//! Union usage checks.

use thrift_lint_core::ast::{NodeKind, StructureKind};
use thrift_lint_core::{Check, KindConstraint};

/// Reports an error whenever a `union` is declared.
#[must_use]
pub fn union() -> Check {
    Check::new(
        "union",
        vec![KindConstraint::Kind(NodeKind::Struct)],
        |ctx, nodes| {
            let Some(s) = nodes.last().and_then(|n| n.as_struct()) else {
                return;
            };
            if s.kind == StructureKind::Union {
                ctx.error(s.pos, "unions aren't allowed");
            }
        },
    )
}
