//! Constant reference checks.

use thrift_lint_core::ast::NodeKind;
use thrift_lint_core::{Check, KindConstraint};

/// Reports an error when a constant reference cannot be resolved to a
/// constant or enum value.
#[must_use]
pub fn constant_ref() -> Check {
    Check::new(
        "constant.ref",
        vec![KindConstraint::Kind(NodeKind::ConstantReference)],
        |ctx, nodes| {
            let Some(reference) = nodes.last().and_then(|n| n.as_constant_reference()) else {
                return;
            };
            if ctx.resolve_constant(&reference.name).is_err() {
                ctx.error(
                    reference.pos,
                    format!(
                        "unable to find a constant or enum value named {:?}",
                        reference.name
                    ),
                );
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use thrift_lint_core::Linter;

    #[test]
    fn resolvable_references_pass() {
        let linter = Linter::new([constant_ref()].into_iter().collect());
        let messages = linter.lint(
            "t.thrift",
            "enum Level { LOW = 1 }\nconst i32 A = 1\nconst i32 B = A\nconst Level C = Level.LOW",
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn unresolvable_references_error() {
        let linter = Linter::new([constant_ref()].into_iter().collect());
        let messages = linter.lint("t.thrift", "const i32 B = Missing");
        assert_eq!(messages.len(), 1);
        let m = messages.iter().next().unwrap();
        assert!(m
            .message
            .contains("unable to find a constant or enum value named \"Missing\""));
    }

    #[test]
    fn struct_references_are_not_constants() {
        let linter = Linter::new([constant_ref()].into_iter().collect());
        let messages = linter.lint("t.thrift", "struct S {}\nconst i32 B = S");
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn references_inside_containers_are_checked() {
        let linter = Linter::new([constant_ref()].into_iter().collect());
        let messages = linter.lint("t.thrift", "const list<i32> L = [1, Gone, 3]");
        assert_eq!(messages.len(), 1);
    }
}
