//! The walker: drives every check over one or more documents.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::ast::{NodeId, NodeRef};
use crate::check::{CheckContext, Checks};
use crate::message::{Message, Messages, Severity};
use crate::nolint::{self, Directive};
use crate::parser;
use crate::resolve::{ParseCache, ParsedFile, Resolver};

/// Reserved check name used for diagnostics converted from parse failures.
pub const PARSE_CHECK: &str = "parse";

/// A failure that prevents a document from being linted at all.
#[derive(Debug, Error)]
pub enum LintError {
    /// A document could not be read.
    #[error("unable to read {}", path.display())]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Lints documents against a fixed set of checks.
///
/// One linter owns the per-run shared state: the parse cache that backs
/// cross-file resolution. Construct with [`Linter::new`] and configure with
/// the builder methods.
#[derive(Debug)]
pub struct Linter {
    checks: Checks,
    includes: Vec<PathBuf>,
    cache: Arc<ParseCache>,
}

impl Linter {
    /// Creates a linter over `checks`.
    #[must_use]
    pub fn new(checks: Checks) -> Self {
        Self {
            checks,
            includes: Vec::new(),
            cache: Arc::new(ParseCache::new()),
        }
    }

    /// Adds directories to search when resolving `include` headers.
    #[must_use]
    pub fn with_include_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.includes.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// The checks this linter runs.
    #[must_use]
    pub fn checks(&self) -> &Checks {
        &self.checks
    }

    /// Lints in-memory document content under a display name.
    ///
    /// Parse failures become Error diagnostics tagged [`PARSE_CHECK`] rather
    /// than aborting the run.
    #[must_use]
    pub fn lint(&self, filename: &str, source: &str) -> Messages {
        let _span = tracing::debug_span!("lint", file = filename).entered();
        let program = match parser::parse(source) {
            Ok(program) => program,
            Err(err) => {
                let mut messages = Messages::new();
                for detail in err.errors {
                    messages.push(Message::new(
                        filename,
                        detail.pos,
                        PARSE_CHECK,
                        Severity::Error,
                        detail.message,
                    ));
                }
                return messages;
            }
        };
        let file = Arc::new(ParsedFile::new(PathBuf::from(filename), program));
        self.lint_parsed(filename, file)
    }

    /// Lints each path in order, aggregating the diagnostics.
    ///
    /// # Errors
    ///
    /// Returns a [`LintError`] when a document cannot be read. Parse and
    /// check failures are reported as diagnostics, not errors.
    pub fn lint_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Messages, LintError> {
        let mut messages = Messages::new();
        for path in paths {
            let path = path.as_ref();
            let source = std::fs::read_to_string(path).map_err(|source| LintError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            messages.extend(self.lint(&path.display().to_string(), &source));
        }
        Ok(messages)
    }

    fn lint_parsed(&self, filename: &str, file: Arc<ParsedFile>) -> Messages {
        // Make the document itself resolvable before any check runs, so that
        // resolution is uniform across local and included names.
        self.cache.insert(Arc::clone(&file));
        let resolver = Resolver::new(Arc::clone(&self.cache), self.includes.clone());
        let mut ctx = CheckContext::new(filename, Arc::clone(&file), resolver);
        let mut walker = Walker {
            checks: &self.checks,
            overrides: HashMap::new(),
        };
        walker.visit(&mut ctx, NodeRef::Program(&file.program), &mut Vec::new());
        ctx.into_messages()
    }
}

/// One document's traversal state: the root check set plus the suppression
/// overrides registered by named `nolint` directives.
struct Walker<'c> {
    checks: &'c Checks,
    overrides: HashMap<NodeId, Checks>,
}

impl Walker<'_> {
    /// Returns the check set in effect for a node with the given ancestors.
    ///
    /// Overrides are keyed by node identity, which is document-local, so the
    /// table is reset whenever a new root is visited.
    fn active_checks(&mut self, ancestors: &[NodeRef<'_>]) -> Checks {
        if ancestors.is_empty() {
            self.overrides.clear();
            return self.checks.clone();
        }
        if self.overrides.is_empty() {
            return self.checks.clone();
        }
        // Nearest ancestor's override wins.
        ancestors
            .iter()
            .rev()
            .find_map(|a| self.overrides.get(&a.id()))
            .cloned()
            .unwrap_or_else(|| self.checks.clone())
    }

    fn visit<'a>(
        &mut self,
        ctx: &mut CheckContext,
        node: NodeRef<'a>,
        ancestors: &mut Vec<NodeRef<'a>>,
    ) {
        let mut active = self.active_checks(ancestors);

        match nolint::directive(node) {
            Some(Directive::All) => return,
            Some(Directive::Names(names)) => {
                let names: Vec<String> = names.into_iter().collect();
                active = active.without(&names);
                self.overrides.insert(node.id(), active.clone());
            }
            None => {}
        }

        // The dispatch chain is the node itself, then ancestors nearest
        // first.
        let mut chain = Vec::with_capacity(ancestors.len() + 1);
        chain.push(node);
        chain.extend(ancestors.iter().rev().copied());
        active.call(ctx, &chain);

        ancestors.push(node);
        for child in node.children() {
            self.visit(ctx, child, ancestors);
        }
        ancestors.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, Pos};
    use crate::check::{Check, KindConstraint};

    fn count_check(name: &str, kind: NodeKind) -> Check {
        Check::new(name, vec![KindConstraint::Kind(kind)], move |ctx, nodes| {
            ctx.warning(nodes[nodes.len() - 1].pos(), "seen");
        })
    }

    fn any_check(name: &str) -> Check {
        Check::new(name, vec![KindConstraint::Any], |ctx, nodes| {
            ctx.warning(nodes[nodes.len() - 1].pos(), "seen");
        })
    }

    const SOURCE: &str = r"
        struct TestStruct {
            1: string field1
            2: bool field2
        }

        enum TestEnum {
            ONE = 1
            TWO = 2
        }
    ";

    #[test]
    fn visits_every_node_once() {
        let linter = Linter::new([any_check("count")].into_iter().collect());
        let messages = linter.lint("t.thrift", SOURCE);
        // program + struct + 2 fields + 2 base types + enum + 2 items
        assert_eq!(messages.len(), 9);
    }

    #[test]
    fn kind_constraint_limits_dispatch() {
        let linter = Linter::new([count_check("fields", NodeKind::Field)].into_iter().collect());
        let messages = linter.lint("t.thrift", SOURCE);
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn parse_failures_become_diagnostics() {
        let linter = Linter::new(Checks::new());
        let messages = linter.lint("t.thrift", "struct Broken {");
        assert_eq!(messages.len(), 1);
        let m = messages.iter().next().unwrap();
        assert_eq!(m.check, PARSE_CHECK);
        assert_eq!(m.severity, Severity::Error);
    }

    #[test]
    fn bare_nolint_suppresses_subtree() {
        let linter = Linter::new([any_check("count")].into_iter().collect());
        let messages = linter.lint(
            "t.thrift",
            r"
            struct Quiet {
                1: string a
            } (nolint)

            struct Loud {
                1: string b
            }
            ",
        );
        // program + Loud + its field + its base type
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn named_nolint_removes_only_named_checks() {
        let checks: Checks = [
            count_check("field.one", NodeKind::Field),
            count_check("other", NodeKind::Field),
        ]
        .into_iter()
        .collect();
        let linter = Linter::new(checks);
        let messages = linter.lint(
            "t.thrift",
            r#"
            struct S {
                1: string a
            } (nolint = "field.one")

            struct T {
                1: string b
            }
            "#,
        );
        // S's field: only "other"; T's field: both.
        assert_eq!(messages.len(), 3);
        let field_one: Vec<_> = messages.iter().filter(|m| m.check == "field.one").collect();
        assert_eq!(field_one.len(), 1);
    }

    #[test]
    fn nolint_prefix_removes_dotted_children() {
        let checks: Checks = [count_check("field.one.deep", NodeKind::Field)]
            .into_iter()
            .collect();
        let linter = Linter::new(checks);
        let messages = linter.lint(
            "t.thrift",
            "struct S { 1: string a } (nolint = \"field\")",
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn nolint_does_not_leak_to_siblings_or_later_documents() {
        let linter = Linter::new([any_check("count")].into_iter().collect());
        let suppressed = linter.lint("a.thrift", "struct S { 1: string a } (nolint)");
        assert_eq!(suppressed.len(), 1); // program only

        // A fresh document through the same linter sees the full set again.
        let normal = linter.lint("b.thrift", "struct S { 1: string a }");
        assert_eq!(normal.len(), 4);
    }

    #[test]
    fn ancestor_constrained_check_sees_chain() {
        let check = Check::new(
            "nested",
            vec![
                KindConstraint::Kind(NodeKind::Program),
                KindConstraint::Kind(NodeKind::Struct),
                KindConstraint::Kind(NodeKind::Field),
            ],
            |ctx, nodes| {
                assert_eq!(nodes[0].kind(), NodeKind::Program);
                assert_eq!(nodes[1].kind(), NodeKind::Struct);
                ctx.error(nodes[2].pos(), "nested field");
            },
        );
        let linter = Linter::new([check].into_iter().collect());
        let messages = linter.lint("t.thrift", SOURCE);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages.max_severity(), Some(Severity::Error));
    }

    #[test]
    fn lint_files_reads_and_aggregates() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.thrift");
        let b = dir.path().join("b.thrift");
        std::fs::write(&a, "struct A {}").unwrap();
        std::fs::write(&b, "struct B {}").unwrap();

        let linter = Linter::new([count_check("s", NodeKind::Struct)].into_iter().collect());
        let messages = linter.lint_files(&[&a, &b]).unwrap();
        assert_eq!(messages.len(), 2);

        let missing = dir.path().join("missing.thrift");
        assert!(matches!(
            linter.lint_files(&[&missing]),
            Err(LintError::Io { .. })
        ));
    }

    #[test]
    fn zero_position_renders_column_one() {
        let m = Message::new("t.thrift", Pos::new(1, 0), "x", Severity::Warning, "w");
        assert!(m.to_string().starts_with("t.thrift:1:1:"));
    }
}
