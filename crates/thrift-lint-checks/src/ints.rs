//! Integer constant checks.

use thrift_lint_core::ast::{ConstantValueKind, NodeKind};
use thrift_lint_core::{Check, KindConstraint};

/// Warns when an integer constant needs more than 32 bits, since some target
/// languages cannot represent it faithfully.
#[must_use]
pub fn int_64bit() -> Check {
    Check::new(
        "int.64bit",
        vec![KindConstraint::Kind(NodeKind::ConstantValue)],
        |ctx, nodes| {
            let Some(value) = nodes.last().and_then(|n| n.as_constant_value()) else {
                return;
            };
            if let ConstantValueKind::Integer(i) = value.kind {
                if i < i64::from(i32::MIN) || i > i64::from(i32::MAX) {
                    ctx.warning(
                        value.pos,
                        format!("64-bit integer constant {i} may not work in all languages"),
                    );
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
    fn in_range_constants_pass() {
        let linter = Linter::new([int_64bit()].into_iter().collect());
        let messages = linter.lint(
            "t.thrift",
            "const i32 A = 2147483647\nconst i32 B = -2147483648\nconst i32 C = 0",
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn out_of_range_constants_warn() {
        let linter = Linter::new([int_64bit()].into_iter().collect());
        let messages = linter.lint(
            "t.thrift",
            "const i64 A = 2147483648\nconst i64 B = -2147483649",
        );
        assert_eq!(messages.len(), 2);
        let first = messages.iter().next().unwrap();
        assert!(first.message.contains("2147483648 may not work"));
    }

    #[test]
    fn applies_to_field_defaults() {
        let linter = Linter::new([int_64bit()].into_iter().collect());
        let messages = linter.lint("t.thrift", "struct S { 1: i64 x = 4294967296 }");
        assert_eq!(messages.len(), 1);
    }
}
