//! Enumeration checks.

use thrift_lint_core::ast::NodeKind;
use thrift_lint_core::{Check, KindConstraint};

/// Warns or errors when an enumeration grows beyond the given item-count
/// limits. A limit of `None` disables that severity.
#[must_use]
pub fn enum_size(warning_limit: Option<usize>, error_limit: Option<usize>) -> Check {
    Check::new(
        "enum.size",
        vec![KindConstraint::Kind(NodeKind::Enum)],
        move |ctx, nodes| {
            let Some(e) = nodes.last().and_then(|n| n.as_enum()) else {
                return;
            };
            let size = e.items.len();
            if let Some(limit) = error_limit {
                if size > limit {
                    ctx.error(
                        e.pos,
                        format!("enumeration {:?} has more than {limit} items", e.name),
                    );
                    return;
                }
            }
            if let Some(limit) = warning_limit {
                if size > limit {
                    ctx.warning(
                        e.pos,
                        format!("enumeration {:?} has more than {limit} items", e.name),
                    );
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use thrift_lint_core::{Linter, Severity};

    #[test]
    fn limits_escalate() {
        let linter = Linter::new([enum_size(Some(2), Some(4))].into_iter().collect());

        let small = linter.lint("t.thrift", "enum E { A, B }");
        assert!(small.is_empty());

        let medium = linter.lint("t.thrift", "enum E { A, B, C }");
        assert_eq!(medium.max_severity(), Some(Severity::Warning));

        let large = linter.lint("t.thrift", "enum E { A, B, C, D, E5 }");
        assert_eq!(large.len(), 1);
        assert_eq!(large.max_severity(), Some(Severity::Error));
        let m = large.iter().next().unwrap();
        assert!(m.message.contains("more than 4 items"));
    }

    #[test]
    fn disabled_limits_stay_silent() {
        let linter = Linter::new([enum_size(None, None)].into_iter().collect());
        let messages = linter.lint("t.thrift", "enum E { A, B, C, D }");
        assert!(messages.is_empty());
    }
}
