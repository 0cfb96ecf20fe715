//! Map type checks.

use thrift_lint_core::ast::{NodeKind, NodeRef, Type};
use thrift_lint_core::{Check, CheckContext, KindConstraint, TypeMatcher};

/// Whether a type's terminal form is acceptable as a map key or set value:
/// base types and enums qualify, resolved through typedefs.
pub(crate) fn is_primitive(ctx: &CheckContext, ty: &Type) -> bool {
    match ty {
        Type::Base(_) => true,
        Type::Reference(_) => match ctx.resolve_type(ty) {
            Ok(resolution) => matches!(
                resolution.node(),
                NodeRef::BaseType(_) | NodeRef::Enum(_)
            ),
            Err(_) => false,
        },
        _ => false,
    }
}

/// Reports an error when a map's key is not a primitive type.
#[must_use]
pub fn map_key_type() -> Check {
    Check::new(
        "map.key.type",
        vec![KindConstraint::Kind(NodeKind::MapType)],
        |ctx, nodes| {
            let Some(map) = nodes.last().and_then(|n| n.as_map_type()) else {
                return;
            };
            if !is_primitive(ctx, &map.key) {
                ctx.error(map.pos, "map key must be a primitive type");
            }
        },
    )
}

/// Reports an error when a map's value matches one of the restricted type
/// matchers. With an empty list this check never fires.
#[must_use]
pub fn map_value_type(restricted: Vec<TypeMatcher>) -> Check {
    Check::new(
        "map.value.type",
        vec![KindConstraint::Kind(NodeKind::MapType)],
        move |ctx, nodes| {
            let Some(map) = nodes.last().and_then(|n| n.as_map_type()) else {
                return;
            };
            for matcher in &restricted {
                let matched = matcher
                    .matches(ctx.resolver(), ctx.file(), &map.value)
                    .unwrap_or(false);
                if matched {
                    ctx.error(
                        map.pos,
                        format!("map value type {} is restricted", matcher.name()),
                    );
                    return;
                }
            }
        },
    )
}
