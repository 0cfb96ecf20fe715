//! Set type checks.

use thrift_lint_core::ast::NodeKind;
use thrift_lint_core::{Check, KindConstraint};

use crate::maps::is_primitive;

/// Reports an error when a set's value is not a primitive type.
#[must_use]
pub fn set_value_type() -> Check {
    Check::new(
        "set.value.type",
        vec![KindConstraint::Kind(NodeKind::SetType)],
        |ctx, nodes| {
            let Some(set) = nodes.last().and_then(|n| n.as_set_type()) else {
                return;
            };
            if !is_primitive(ctx, &set.value) {
                ctx.error(set.pos, "set value must be a primitive type");
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use thrift_lint_core::Linter;

    #[test]
    fn value_must_be_primitive() {
        let linter = Linter::new([set_value_type()].into_iter().collect());
        let messages = linter.lint(
            "t.thrift",
            r"
            enum E { A }
            struct S {}
            struct T {
                1: set<i64> ok1
                2: set<E> ok2
                3: set<S> bad1
                4: set<set<i32>> bad2
            }
            ",
        );
        // the outer set of bad2 is flagged; its inner set<i32> passes
        assert_eq!(messages.len(), 2);
        for m in &messages {
            assert!(m.message.contains("set value must be a primitive type"));
        }
    }
}
