//! Namespace checks.

use std::collections::HashMap;

use regex::Regex;
use thrift_lint_core::ast::NodeKind;
use thrift_lint_core::{Check, KindConstraint};

/// Reports an error when a namespace's name fails the pattern configured for
/// its scope. Scopes without a configured pattern are unrestricted.
#[must_use]
pub fn namespace_pattern(patterns: HashMap<String, Regex>) -> Check {
    Check::new(
        "namespace.pattern",
        vec![KindConstraint::Kind(NodeKind::Namespace)],
        move |ctx, nodes| {
            let Some(ns) = nodes.last().and_then(|n| n.as_namespace()) else {
                return;
            };
            if let Some(re) = patterns.get(&ns.scope) {
                if !re.is_match(&ns.name) {
                    ctx.error(
                        ns.pos,
                        format!("{:?} namespace must match {:?}", ns.scope, re.as_str()),
                    );
                }
            }
        },
    )
}
