//! `nolint` suppression directives.
//!
//! A node can opt out of linting through a `(nolint)` annotation or a
//! `@nolint` doc-comment pragma. Either form optionally names the checks to
//! suppress; with no names, every check is suppressed for the node and its
//! descendants.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::ast::NodeRef;

static DOC_PRAGMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@nolint\b(?:\(([^)]*)\))?").expect("static pattern compiles")
});

/// A suppression directive found on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Suppress every check.
    All,
    /// Suppress the named checks (lowercased).
    Names(BTreeSet<String>),
}

impl Directive {
    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Names(mut a), Self::Names(b)) => {
                a.extend(b);
                Self::Names(a)
            }
            _ => Self::All,
        }
    }
}

fn parse_names(list: &str) -> Directive {
    let names: BTreeSet<String> = list
        .split(',')
        .map(|n| n.trim().to_ascii_lowercase())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        Directive::All
    } else {
        Directive::Names(names)
    }
}

/// Returns the suppression directive attached to `node`, if any.
///
/// Annotation and doc-pragma directives are combined; a bare directive from
/// either source suppresses everything.
#[must_use]
pub fn directive(node: NodeRef<'_>) -> Option<Directive> {
    let mut result: Option<Directive> = None;

    for annotation in node.annotations() {
        if annotation.name.eq_ignore_ascii_case("nolint") {
            let found = parse_names(&annotation.value);
            result = Some(match result {
                Some(existing) => existing.merge(found),
                None => found,
            });
        }
    }

    if let Some(doc) = node.doc() {
        for captures in DOC_PRAGMA.captures_iter(doc) {
            let found = match captures.get(1) {
                Some(list) => parse_names(list.as_str()),
                None => Directive::All,
            };
            result = Some(match result {
                Some(existing) => existing.merge(found),
                None => found,
            });
        }
    }

    result
}
