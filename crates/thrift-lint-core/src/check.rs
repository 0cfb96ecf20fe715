//! Checks, check sets, and the dispatch machinery.
//!
//! A [`Check`] pairs a dot-segmented name with a callback and a signature of
//! node-kind constraints. The signature is declared outermost-first, so
//! `[Enum, EnumItem]` reads "an enum item whose parent is an enum". Dispatch
//! matches the signature against the node and its ancestor chain and invokes
//! the callback only on a full match.

use std::sync::Arc;

use crate::ast::{NodeKind, NodeRef, Pos, Type};
use crate::message::{Message, Messages, Severity};
use crate::resolve::{ParsedFile, Resolution, ResolveError, Resolver, TypeResolution};

/// One constraint of a check signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindConstraint {
    /// Accepts any node kind.
    Any,
    /// Accepts exactly the given kind.
    Kind(NodeKind),
}

impl KindConstraint {
    fn matches(self, node: NodeRef<'_>) -> bool {
        match self {
            Self::Any => true,
            Self::Kind(kind) => node.kind() == kind,
        }
    }
}

/// Shared state handed to every check invocation for one document.
pub struct CheckContext {
    filename: String,
    file: Arc<ParsedFile>,
    resolver: Resolver,
    check: String,
    messages: Messages,
}

impl CheckContext {
    /// Creates a context for linting one document.
    #[must_use]
    pub fn new(filename: impl Into<String>, file: Arc<ParsedFile>, resolver: Resolver) -> Self {
        Self {
            filename: filename.into(),
            file,
            resolver,
            check: String::new(),
            messages: Messages::new(),
        }
    }

    /// The display name of the document being linted.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The document being linted.
    #[must_use]
    pub fn file(&self) -> &Arc<ParsedFile> {
        &self.file
    }

    /// The cross-file resolver for this run.
    #[must_use]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// The name of the check currently being invoked.
    #[must_use]
    pub fn check_name(&self) -> &str {
        &self.check
    }

    /// Records a warning at `pos`, tagged with the current check's name.
    pub fn warning(&mut self, pos: Pos, message: impl Into<String>) {
        self.report(Severity::Warning, pos, message);
    }

    /// Records an error at `pos`, tagged with the current check's name.
    pub fn error(&mut self, pos: Pos, message: impl Into<String>) {
        self.report(Severity::Error, pos, message);
    }

    /// Records a diagnostic at `pos`, tagged with the current check's name.
    pub fn report(&mut self, severity: Severity, pos: Pos, message: impl Into<String>) {
        self.messages.push(Message::new(
            self.filename.clone(),
            pos,
            self.check.clone(),
            severity,
            message,
        ));
    }

    /// Resolves a possibly-qualified name to its definition.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the name cannot be resolved.
    pub fn resolve(&self, name: &str) -> Result<Resolution, ResolveError> {
        self.resolver.resolve(name, &self.file)
    }

    /// Resolves a constant or enum-item reference.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the name cannot be resolved.
    pub fn resolve_constant(&self, name: &str) -> Result<Resolution, ResolveError> {
        self.resolver.resolve_constant(name, &self.file)
    }

    /// Resolves a type through typedefs and includes to its terminal form.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when a reference cannot be resolved.
    pub fn resolve_type<'t>(&self, ty: &'t Type) -> Result<TypeResolution<'t>, ResolveError> {
        self.resolver.resolve_type(ty, &self.file)
    }

    /// The diagnostics recorded so far.
    #[must_use]
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Consumes the context, yielding its diagnostics.
    #[must_use]
    pub fn into_messages(self) -> Messages {
        self.messages
    }
}

type Callback = dyn for<'a> Fn(&mut CheckContext, &[NodeRef<'a>]) + Send + Sync;

/// A named diagnostic rule.
pub struct Check {
    name: String,
    signature: Vec<KindConstraint>,
    callback: Box<Callback>,
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl Check {
    /// Creates a check.
    ///
    /// `signature` is declared outermost-first; its final constraint is the
    /// node the check fires on. The callback receives the matched nodes in
    /// the same order, self last.
    ///
    /// # Panics
    ///
    /// Panics when `signature` is empty. A check with no self constraint is a
    /// programming error and must fail at construction, not at dispatch.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, signature: Vec<KindConstraint>, callback: F) -> Self
    where
        F: for<'a> Fn(&mut CheckContext, &[NodeRef<'a>]) + Send + Sync + 'static,
    {
        let name = name.into();
        assert!(
            !signature.is_empty(),
            "check {name:?} must declare at least its self constraint"
        );
        Self {
            name,
            signature,
            callback: Box::new(callback),
        }
    }

    /// The check's dot-segmented name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attempts to dispatch this check against `chain`.
    ///
    /// `chain` holds the current node first, followed by its ancestors
    /// closest-first. Returns whether the signature matched and the callback
    /// ran.
    pub fn call(&self, ctx: &mut CheckContext, chain: &[NodeRef<'_>]) -> bool {
        let arity = self.signature.len();
        if chain.len() < arity {
            return false;
        }
        // Constraints are declared outermost-first; the chain is innermost-
        // first. Pair them from opposite ends.
        for (i, constraint) in self.signature.iter().rev().enumerate() {
            if !constraint.matches(chain[i]) {
                return false;
            }
        }
        let mut matched: Vec<NodeRef<'_>> = chain[..arity].to_vec();
        matched.reverse();
        ctx.check = self.name.clone();
        (self.callback)(ctx, &matched);
        true
    }
}

/// An ordered set of checks.
#[derive(Debug, Clone, Default)]
pub struct Checks(Vec<Arc<Check>>);

impl Checks {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a check to the set.
    pub fn add(&mut self, check: Check) {
        self.0.push(Arc::new(check));
    }

    /// Returns the number of checks in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the subset whose names match one of `prefixes`.
    ///
    /// A prefix matches its own name and any dot-separated child, so `"a"`
    /// matches `"a"` and `"a.b"` but not `"ab"`.
    #[must_use]
    pub fn with<S: AsRef<str>>(&self, prefixes: &[S]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|c| prefixes.iter().any(|p| prefix_matches(p.as_ref(), c.name())))
                .cloned()
                .collect(),
        )
    }

    /// Returns the subset whose names match none of `prefixes`.
    #[must_use]
    pub fn without<S: AsRef<str>>(&self, prefixes: &[S]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|c| !prefixes.iter().any(|p| prefix_matches(p.as_ref(), c.name())))
                .cloned()
                .collect(),
        )
    }

    /// Returns the check names in lexicographic order.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.iter().map(|c| c.name().to_string()).collect();
        names.sort();
        names
    }

    /// Dispatches every check in the set against `chain`.
    pub fn call(&self, ctx: &mut CheckContext, chain: &[NodeRef<'_>]) {
        for check in &self.0 {
            check.call(ctx, chain);
        }
    }
}

impl FromIterator<Check> for Checks {
    fn from_iter<I: IntoIterator<Item = Check>>(iter: I) -> Self {
        Self(iter.into_iter().map(Arc::new).collect())
    }
}

fn prefix_matches(prefix: &str, name: &str) -> bool {
    name == prefix
        || (name.len() > prefix.len()
            && name.starts_with(prefix)
            && name.as_bytes()[prefix.len()] == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Definition, NodeKind, Program};
    use crate::parser::parse;
    use crate::resolve::ParseCache;
    use std::path::PathBuf;

    fn context_for(program: Program) -> CheckContext {
        let cache = Arc::new(ParseCache::new());
        let file = Arc::new(ParsedFile::new(PathBuf::from("t.thrift"), program));
        cache.insert(Arc::clone(&file));
        let resolver = Resolver::new(cache, Vec::new());
        CheckContext::new("t.thrift", file, resolver)
    }

    fn noop(name: &str, signature: Vec<KindConstraint>) -> Check {
        Check::new(name, signature, |_, _| {})
    }

    #[test]
    #[should_panic(expected = "self constraint")]
    fn empty_signature_panics() {
        let _ = noop("bad", vec![]);
    }

    #[test]
    fn self_constraint_must_match() {
        let program = parse("enum E { ONE }").unwrap();
        let Definition::Enum(e) = &program.definitions[0] else {
            panic!("expected an enum");
        };
        let enum_ref = NodeRef::Enum(e);
        let item_ref = NodeRef::EnumItem(&e.items[0]);

        let check = noop("x", vec![KindConstraint::Kind(NodeKind::EnumItem)]);
        let mut ctx = context_for(parse("").unwrap());
        assert!(check.call(&mut ctx, &[item_ref]));
        assert!(!check.call(&mut ctx, &[enum_ref]));
    }

    #[test]
    fn short_chain_rejects_without_side_effects() {
        let program = parse("enum E { ONE }").unwrap();
        let Definition::Enum(e) = &program.definitions[0] else {
            panic!("expected an enum");
        };
        let item_ref = NodeRef::EnumItem(&e.items[0]);

        let check = Check::new(
            "x",
            vec![
                KindConstraint::Kind(NodeKind::Enum),
                KindConstraint::Kind(NodeKind::EnumItem),
            ],
            |ctx, nodes| {
                ctx.error(nodes[1].pos(), "fired");
            },
        );
        let mut ctx = context_for(parse("").unwrap());
        assert!(!check.call(&mut ctx, &[item_ref]));
        assert!(ctx.messages().is_empty());
    }

    #[test]
    fn matched_nodes_arrive_in_declared_order() {
        let program = parse("enum E { ONE }").unwrap();
        let Definition::Enum(e) = &program.definitions[0] else {
            panic!("expected an enum");
        };
        let program_ref = NodeRef::Program(&program);
        let enum_ref = NodeRef::Enum(e);
        let item_ref = NodeRef::EnumItem(&e.items[0]);

        let check = Check::new(
            "x",
            vec![
                KindConstraint::Kind(NodeKind::Enum),
                KindConstraint::Kind(NodeKind::EnumItem),
            ],
            |ctx, nodes| {
                assert_eq!(nodes.len(), 2);
                assert_eq!(nodes[0].kind(), NodeKind::Enum);
                assert_eq!(nodes[1].kind(), NodeKind::EnumItem);
                ctx.warning(nodes[1].pos(), "seen");
            },
        );
        // chain: node first, then ancestors closest-first
        let mut ctx = context_for(parse("").unwrap());
        assert!(check.call(&mut ctx, &[item_ref, enum_ref, program_ref]));
        assert_eq!(ctx.messages().len(), 1);
    }

    #[test]
    fn wildcard_accepts_any_kind() {
        let program = parse("enum E { ONE }").unwrap();
        let Definition::Enum(e) = &program.definitions[0] else {
            panic!("expected an enum");
        };
        let check = noop("x", vec![KindConstraint::Any]);
        let mut ctx = context_for(parse("").unwrap());
        assert!(check.call(&mut ctx, &[NodeRef::Enum(e)]));
        assert!(check.call(&mut ctx, &[NodeRef::EnumItem(&e.items[0])]));
    }

    #[test]
    fn with_and_without_are_complementary() {
        let checks: Checks = [
            noop("a", vec![KindConstraint::Any]),
            noop("a.b", vec![KindConstraint::Any]),
            noop("c", vec![KindConstraint::Any]),
        ]
        .into_iter()
        .collect();

        let kept = checks.with(&["a"]);
        assert_eq!(kept.sorted_names(), vec!["a", "a.b"]);

        let dropped = checks.without(&["a"]);
        assert_eq!(dropped.sorted_names(), vec!["c"]);

        let mut union = kept.sorted_names();
        union.extend(dropped.sorted_names());
        union.sort();
        assert_eq!(union, checks.sorted_names());

        // "a" must not match "ab".
        let checks: Checks = [noop("ab", vec![KindConstraint::Any])].into_iter().collect();
        assert!(checks.with(&["a"]).is_empty());
    }

    #[test]
    fn resolve_type_reaches_terminal_nodes() {
        let program = parse(
            r"
            typedef i32 Age
            struct S {
                1: Age a
                2: bool b
            }
            ",
        )
        .unwrap();
        let ctx = context_for(program.clone());
        let Definition::Struct(s) = &program.definitions[1] else {
            panic!("expected a struct");
        };

        let through_typedef = ctx.resolve_type(&s.fields[0].field_type).unwrap();
        assert!(matches!(through_typedef, TypeResolution::Resolved(_)));
        assert_eq!(through_typedef.node().kind(), NodeKind::BaseType);

        let direct = ctx.resolve_type(&s.fields[1].field_type).unwrap();
        assert!(matches!(direct, TypeResolution::Direct(_)));
        assert_eq!(direct.node().kind(), NodeKind::BaseType);
    }
}
