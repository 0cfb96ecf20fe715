//! Type usage checks.

use thrift_lint_core::{Check, KindConstraint, TypeMatcher};

/// Reports an error when any node matches one of the disallowed type
/// matchers.
#[must_use]
pub fn types_disallowed(disallowed: Vec<TypeMatcher>) -> Check {
    Check::new(
        "types.disallowed",
        vec![KindConstraint::Any],
        move |ctx, nodes| {
            let Some(node) = nodes.last().copied() else { return };
            for matcher in &disallowed {
                let matched = matcher
                    .matches_node(ctx.resolver(), ctx.file(), node)
                    .unwrap_or(false);
                if matched {
                    ctx.error(
                        node.pos(),
                        format!("type {:?} is not allowed", matcher.name()),
                    );
                    return;
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use thrift_lint_core::Linter;

    #[test]
    fn flags_direct_uses_and_definitions() {
        let linter = Linter::new(
            [types_disallowed(vec![TypeMatcher::Double])]
                .into_iter()
                .collect(),
        );
        let messages = linter.lint(
            "t.thrift",
            "struct S { 1: double price\n2: i64 cents }",
        );
        assert_eq!(messages.len(), 1);
        let m = messages.iter().next().unwrap();
        assert!(m.message.contains("type \"double\" is not allowed"));
    }

    #[test]
    fn flags_references_through_typedefs() {
        let linter = Linter::new(
            [types_disallowed(vec![TypeMatcher::Double])]
                .into_iter()
                .collect(),
        );
        let messages = linter.lint(
            "t.thrift",
            "typedef double Money\nstruct S { 1: Money price }",
        );
        // the typedef's own double plus the resolved reference
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn empty_list_is_a_noop() {
        let linter = Linter::new([types_disallowed(Vec::new())].into_iter().collect());
        let messages = linter.lint("t.thrift", "struct S { 1: double d }");
        assert!(messages.is_empty());
    }
}
