//! Naming checks.

use std::collections::HashSet;

use thrift_lint_core::{Check, KindConstraint};

/// Reports an error when any named node uses one of the reserved names.
#[must_use]
pub fn names_reserved<S: Into<String>>(reserved: Vec<S>) -> Check {
    let reserved: HashSet<String> = reserved.into_iter().map(Into::into).collect();
    Check::new(
        "names.reserved",
        vec![KindConstraint::Any],
        move |ctx, nodes| {
            let Some(node) = nodes.last() else { return };
            if let Some(name) = node.name() {
                if reserved.contains(name) {
                    ctx.error(node.pos(), format!("{name:?} is a reserved name"));
                }
            }
        },
    )
}
