//! Nesting-depth analysis for structs, unions, and exceptions.
//!
//! Depth counts the container and struct levels reachable from a struct's
//! fields. Each container level adds one, a referenced struct adds one per
//! hop, and typedefs are transparent. Per struct, only the single deepest
//! edge to each distinct destination is kept, so two fields reaching the
//! same struct contribute its worst case once rather than twice.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use thrift_lint_core::ast::{Definition, NodeKind, Pos, Struct, Type};
use thrift_lint_core::{Check, CheckContext, KindConstraint, NodeRef, ParsedFile};

/// A struct's identity across the run: owning document plus name.
type StructKey = (PathBuf, String);

/// A struct definition located inside a cached document.
#[derive(Debug, Clone)]
struct StructHandle {
    file: Arc<ParsedFile>,
    index: usize,
}

impl StructHandle {
    fn get(&self) -> Option<&Struct> {
        match self.file.program.definitions.get(self.index) {
            Some(Definition::Struct(s)) => Some(s),
            _ => None,
        }
    }

    fn key(&self) -> StructKey {
        let name = self.get().map(|s| s.name.clone()).unwrap_or_default();
        (self.file.path.clone(), name)
    }
}

/// Where a deepest-edge ends up.
#[derive(Debug, Clone)]
enum Dest {
    /// A primitive base type.
    Base,
    /// Another struct, to be expanded in turn.
    Struct(StructHandle),
}

/// One retained edge of a struct's expansion.
#[derive(Debug, Clone)]
struct Edge {
    /// Document the referencing type appears in.
    filename: String,
    pos: Pos,
    /// The referenced name as written (or the base type's name).
    name: String,
    /// Depth contributed by this edge.
    depth: usize,
    dest: Dest,
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    /// Effective depth limit; `None` means unlimited.
    max_depth: Option<usize>,
    allow_cycles: bool,
}

/// Per-run analyzer state: the memoized expansion of every struct seen.
#[derive(Debug, Default)]
struct DepthAnalyzer {
    expansions: Mutex<BTreeMap<StructKey, Arc<BTreeMap<String, Edge>>>>,
}

impl DepthAnalyzer {
    /// Returns the struct's deepest-edge set, expanding its fields on first
    /// use.
    fn expansion(&self, handle: &StructHandle, ctx: &mut CheckContext) -> Arc<BTreeMap<String, Edge>> {
        let key = handle.key();
        if let Some(edges) = self
            .expansions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(edges);
        }

        let mut edges = BTreeMap::new();
        if let Some(s) = handle.get() {
            for field in &s.fields {
                let mut vis = HashSet::new();
                self.expand_type(
                    &field.field_type,
                    1,
                    &handle.file,
                    &mut vis,
                    &mut edges,
                    ctx,
                );
            }
        }
        let edges = Arc::new(edges);
        self.expansions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&edges));
        edges
    }

    /// Unwinds a field type, keeping the deepest edge per destination.
    /// Containers add one depth level per level of nesting; typedefs and
    /// constants are transparent.
    fn expand_type(
        &self,
        ty: &Type,
        depth: usize,
        src: &Arc<ParsedFile>,
        vis: &mut HashSet<StructKey>,
        edges: &mut BTreeMap<String, Edge>,
        ctx: &mut CheckContext,
    ) {
        match ty {
            Type::Base(base) => {
                let name = base.id.name();
                update_if_deepest(
                    edges,
                    name.to_string(),
                    Edge {
                        filename: src.path.display().to_string(),
                        pos: base.pos,
                        name: name.to_string(),
                        depth: depth - 1,
                        dest: Dest::Base,
                    },
                );
            }
            Type::Reference(reference) => {
                let Ok(resolution) = ctx.resolver().resolve(&reference.name, src) else {
                    return;
                };
                let owner = Arc::clone(&resolution.file);
                enum Next {
                    Into(Type),
                    Guarded(Type, String),
                    Target(usize, String),
                    Skip,
                }
                let next = match resolution.node() {
                    NodeRef::Constant(c) => Next::Into(c.value_type.clone()),
                    NodeRef::Typedef(td) => Next::Guarded(td.target.clone(), td.name.clone()),
                    NodeRef::Struct(s) => {
                        let index = owner
                            .program
                            .definitions
                            .iter()
                            .position(|d| d.name() == s.name);
                        match index {
                            Some(index) => Next::Target(index, s.name.clone()),
                            None => Next::Skip,
                        }
                    }
                    _ => Next::Skip,
                };
                match next {
                    Next::Into(target) => {
                        self.expand_type(&target, depth, &owner, vis, edges, ctx);
                    }
                    Next::Guarded(target, name) => {
                        let key = (src.path.clone(), name.clone());
                        if !vis.insert(key.clone()) {
                            ctx.warning(
                                reference.pos,
                                format!("found a cycle resolving typedef {name:?}"),
                            );
                            return;
                        }
                        self.expand_type(&target, depth, &owner, vis, edges, ctx);
                        vis.remove(&key);
                    }
                    Next::Target(index, name) => {
                        let handle = StructHandle {
                            file: Arc::clone(&owner),
                            index,
                        };
                        update_if_deepest(
                            edges,
                            format!("{}#{name}", owner.path.display()),
                            Edge {
                                filename: src.path.display().to_string(),
                                pos: reference.pos,
                                name: reference.name.clone(),
                                depth,
                                dest: Dest::Struct(handle),
                            },
                        );
                    }
                    Next::Skip => {}
                }
            }
            Type::Map(map) => {
                self.expand_type(&map.key, depth + 1, src, vis, edges, ctx);
                self.expand_type(&map.value, depth + 1, src, vis, edges, ctx);
            }
            Type::List(list) => {
                self.expand_type(&list.value, depth + 1, src, vis, edges, ctx);
            }
            Type::Set(set) => {
                self.expand_type(&set.value, depth + 1, src, vis, edges, ctx);
            }
        }
    }

    /// Depth-first traversal from `handle`, following struct edges.
    ///
    /// Returns the maximum depth seen, whether a cycle was found, and, when
    /// a limit violation or cycle ended the walk, the edge path leading to
    /// it (truncated at the violating edge).
    fn walk(
        &self,
        handle: &StructHandle,
        cur_depth: usize,
        mut max_depth: usize,
        vis: &mut HashSet<StructKey>,
        path: Vec<Edge>,
        limits: Limits,
        ctx: &mut CheckContext,
    ) -> (usize, bool, Vec<Edge>) {
        let key = handle.key();
        if !vis.insert(key.clone()) {
            return (cur_depth, true, path);
        }

        max_depth = max_depth.max(cur_depth);
        if limits.max_depth.is_some_and(|limit| max_depth > limit) {
            return (max_depth, false, path);
        }

        let edges = self.expansion(handle, ctx);
        let mut cycle = false;
        for edge in edges.values() {
            match &edge.dest {
                Dest::Base => {
                    let new_depth = cur_depth + edge.depth;
                    if limits.max_depth.is_some_and(|limit| new_depth > limit) {
                        let mut p = path;
                        p.push(edge.clone());
                        return (new_depth, cycle, p);
                    }
                }
                Dest::Struct(next) => {
                    let mut p = path.clone();
                    p.push(edge.clone());
                    let (depth, found, p) =
                        self.walk(next, cur_depth + edge.depth, max_depth, vis, p, limits, ctx);
                    cycle = cycle || found;
                    max_depth = max_depth.max(depth);
                    let over = limits.max_depth.is_some_and(|limit| max_depth > limit);
                    if over || (cycle && !limits.allow_cycles) {
                        return (max_depth, cycle, p);
                    }
                }
            }
        }

        vis.remove(&key);
        (max_depth, false, Vec::new())
    }
}

/// Reads a struct's `maxDepth` annotation override, reporting malformed
/// values. Returns `Err(())` when the struct should be skipped.
fn effective_limit(
    s: &Struct,
    default: Option<usize>,
    ctx: &mut CheckContext,
) -> Result<Option<usize>, ()> {
    for annotation in &s.annotations {
        if annotation.name == "maxDepth" {
            let Ok(value) = annotation.value.parse::<i64>() else {
                ctx.error(
                    s.pos,
                    format!(
                        "value of {:?} for \"maxDepth\" annotation could not be parsed into an integer",
                        annotation.value
                    ),
                );
                return Err(());
            };
            if value < 1 {
                ctx.error(
                    s.pos,
                    format!("\"maxDepth\" annotations should be positive, but got {value}"),
                );
                return Err(());
            }
            #[allow(clippy::cast_sign_loss)]
            return Ok(Some(value as usize));
        }
    }
    Ok(default)
}

/// Reports an error when a struct's nesting depth exceeds the limit, or when
/// it (transitively) references itself and cycles are disallowed.
///
/// `max_depth` of `None` means unlimited; a per-struct `maxDepth` annotation
/// overrides it.
#[must_use]
pub fn depth(max_depth: Option<usize>, allow_cycles: bool) -> Check {
    let analyzer = Arc::new(DepthAnalyzer::default());
    Check::new(
        "depth",
        vec![KindConstraint::Kind(NodeKind::Struct)],
        move |ctx, nodes| {
            let Some(s) = nodes.last().and_then(|n| n.as_struct()) else {
                return;
            };
            let Ok(limit) = effective_limit(s, max_depth, ctx) else {
                return;
            };
            if limit.is_none() && allow_cycles {
                return;
            }

            let file = Arc::clone(ctx.file());
            let Some(index) = file
                .program
                .definitions
                .iter()
                .position(|d| d.name() == s.name)
            else {
                return;
            };
            let handle = StructHandle { file, index };

            let limits = Limits {
                max_depth: limit,
                allow_cycles,
            };
            let mut vis = HashSet::new();
            let (depth, cycle, path) =
                analyzer.walk(&handle, 1, 1, &mut vis, Vec::new(), limits, ctx);

            let over = limits.max_depth.is_some_and(|l| depth > l);
            let cycle_error = cycle && !allow_cycles;
            if over || cycle_error {
                let mut acc = 1usize;
                let mut details = String::new();
                for edge in &path {
                    acc += edge.depth;
                    details.push_str(&format!(
                        "\n\t{}:{}:{} ({}) +{} ({acc})",
                        edge.filename, edge.pos.line, edge.pos.column, edge.name, edge.depth
                    ));
                }
                let what = if cycle_error {
                    "led to a cycle".to_string()
                } else {
                    format!("exceeded maximum depth of {}", limit.unwrap_or(0))
                };
                ctx.error(s.pos, format!("{} {what}{details}", s.name));
            }
        },
    )
}

fn update_if_deepest(edges: &mut BTreeMap<String, Edge>, key: String, edge: Edge) {
    match edges.entry(key) {
        std::collections::btree_map::Entry::Vacant(slot) => {
            slot.insert(edge);
        }
        std::collections::btree_map::Entry::Occupied(mut slot) => {
            if edge.depth > slot.get().depth {
                *slot.get_mut() = edge;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thrift_lint_core::{Linter, Messages, Severity};

    fn lint(check: Check, source: &str) -> Messages {
        Linter::new([check].into_iter().collect()).lint("t.thrift", source)
    }

    #[test]
    fn flat_struct_has_depth_one() {
        let messages = lint(
            depth(Some(1), true),
            "struct S { 1: string a\n2: i64 b }",
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn nested_containers_add_levels() {
        // list<list<bool>> reaches cumulative depth 3
        let source = "struct S { 1: list<list<bool>> f }";

        let messages = lint(depth(Some(2), true), source);
        assert_eq!(messages.len(), 1);
        let m = messages.iter().next().unwrap();
        assert_eq!(m.severity, Severity::Error);
        assert!(m.message.contains("S exceeded maximum depth of 2"));
        assert!(m.message.contains("(bool) +2 (3)"));

        let relaxed = lint(depth(Some(3), true), source);
        assert!(relaxed.is_empty());
    }

    #[test]
    fn struct_references_add_a_level_per_hop() {
        let source = "struct Inner { 1: string s }\nstruct Outer { 1: Inner i }";
        assert!(lint(depth(Some(2), true), source).is_empty());

        let messages = lint(depth(Some(1), true), source);
        // Outer -> Inner exceeds 1; Inner alone is fine
        assert_eq!(messages.len(), 1);
        assert!(messages
            .iter()
            .next()
            .unwrap()
            .message
            .contains("Outer exceeded maximum depth of 1"));
    }

    #[test]
    fn typedefs_are_transparent() {
        let source = "typedef string Name\nstruct S { 1: Name n }";
        assert!(lint(depth(Some(1), true), source).is_empty());
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let source = "struct Node { 1: Node next }";
        let messages = lint(depth(None, false), source);
        assert_eq!(messages.len(), 1);
        assert!(messages.iter().next().unwrap().message.contains("Node led to a cycle"));

        // cycles allowed, no limit: analysis is skipped entirely
        assert!(lint(depth(None, true), source).is_empty());
    }

    #[test]
    fn mutual_recursion_is_a_cycle() {
        let source = "struct A { 1: B b }\nstruct B { 1: A a }";
        let messages = lint(depth(None, false), source);
        assert_eq!(messages.len(), 2); // reported for A and for B
        assert!(messages.iter().next().unwrap().message.contains("led to a cycle"));
    }

    #[test]
    fn allowed_cycle_with_limit_is_bounded() {
        // The cycle stops expansion; no base type is ever reached, so no
        // depth violation either.
        let source = "struct Node { 1: Node next }";
        let messages = lint(depth(Some(10), true), source);
        assert!(messages.is_empty());
    }

    #[test]
    fn annotation_overrides_global_limit() {
        let deep = "struct S { 1: list<list<list<string>>> f } (maxDepth = \"2\")";
        let messages = lint(depth(None, true), deep);
        assert_eq!(messages.len(), 1);
        assert!(messages
            .iter()
            .next()
            .unwrap()
            .message
            .contains("exceeded maximum depth of 2"));

        let loose = "struct S { 1: list<list<string>> f } (maxDepth = \"5\")";
        assert!(lint(depth(Some(1), true), loose).is_empty());
    }

    #[test]
    fn malformed_annotation_is_reported() {
        let messages = lint(
            depth(Some(5), true),
            "struct S {} (maxDepth = \"lots\")",
        );
        assert_eq!(messages.len(), 1);
        assert!(messages
            .iter()
            .next()
            .unwrap()
            .message
            .contains("could not be parsed into an integer"));

        let messages = lint(depth(Some(5), true), "struct S {} (maxDepth = \"0\")");
        assert_eq!(messages.len(), 1);
        assert!(messages
            .iter()
            .next()
            .unwrap()
            .message
            .contains("should be positive"));
    }

    #[test]
    fn typedef_cycles_warn_without_aborting() {
        let source = "typedef B A\ntypedef A B\nstruct S { 1: A a\n2: string ok }";
        let messages = lint(depth(Some(5), false), source);
        assert_eq!(messages.len(), 1);
        let m = messages.iter().next().unwrap();
        assert_eq!(m.severity, Severity::Warning);
        assert!(m.message.contains("found a cycle resolving typedef"));
    }

    #[test]
    fn shared_destination_keeps_worst_case_not_sum() {
        // Two fields reaching Inner collapse to the deeper edge.
        let source = "
            struct Inner { 1: string s }
            struct Outer {
                1: Inner direct
                2: list<Inner> nested
            }
        ";
        // deepest edge to Inner is through the list: 1 (Outer) + 2 + 1 = not
        // summed with the direct edge
        assert!(lint(depth(Some(3), true), source).is_empty());
        let messages = lint(depth(Some(2), true), source);
        assert_eq!(messages.len(), 1);
    }
}
