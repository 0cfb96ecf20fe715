//! Include checks: path resolution, restricted imports, and cycle
//! detection.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use glob::Pattern;
use regex::Regex;
use thrift_lint_core::ast::{NodeKind, Pos};
use thrift_lint_core::{normalize, Check, KindConstraint};

/// Reports an error when an `include` header names a file that cannot be
/// found through the configured search directories.
#[must_use]
pub fn include_path() -> Check {
    Check::new(
        "include.path",
        vec![KindConstraint::Kind(NodeKind::Include)],
        |ctx, nodes| {
            let Some(include) = nodes.last().and_then(|n| n.as_include()) else {
                return;
            };
            let path = Path::new(&include.path);
            if path.is_absolute() {
                if !path.is_file() {
                    ctx.error(
                        include.pos,
                        format!("unable to read file {:?}", include.path),
                    );
                }
                return;
            }
            let file = Arc::clone(ctx.file());
            if ctx.resolver().locate_include(&file, include).is_none() {
                ctx.error(
                    include.pos,
                    format!("unable to find include file {:?}", include.path),
                );
            }
        },
    )
}

/// Reports an error when a file matching a glob pattern includes a file
/// matching that pattern's companion regex.
#[must_use]
pub fn include_restricted(patterns: Vec<(Pattern, Regex)>) -> Check {
    Check::new(
        "include.restricted",
        vec![KindConstraint::Kind(NodeKind::Include)],
        move |ctx, nodes| {
            let Some(include) = nodes.last().and_then(|n| n.as_include()) else {
                return;
            };
            for (file_pattern, include_re) in &patterns {
                if file_pattern.matches(ctx.filename()) && include_re.is_match(&include.path) {
                    tracing::debug!(
                        file = ctx.filename(),
                        pattern = %file_pattern,
                        include = %include.path,
                        regex = %include_re,
                        "restricted include matched"
                    );
                    ctx.error(
                        include.pos,
                        format!("{:?} is a restricted import", include.path),
                    );
                    return;
                }
            }
        },
    )
}

#[derive(Debug, Clone)]
struct IncludeEdge {
    to: PathBuf,
    text: String,
    pos: Pos,
}

/// The run-global include graph. Keyed by normalized paths so the same file
/// reached through different relative spellings collapses to one node.
#[derive(Debug, Default)]
struct IncludeGraph {
    edges: BTreeMap<PathBuf, Vec<IncludeEdge>>,
}

impl IncludeGraph {
    fn add_edge(&mut self, from: PathBuf, edge: IncludeEdge) {
        let edges = self.edges.entry(from).or_default();
        if !edges.iter().any(|e| e.to == edge.to) {
            edges.push(edge);
        }
    }

    /// Looks for a path that leaves `start` and returns to it.
    fn find_cycle(&self, start: &Path) -> Option<Vec<(PathBuf, IncludeEdge)>> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        if self.dfs(start, start, &mut visited, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn dfs(
        &self,
        current: &Path,
        start: &Path,
        visited: &mut HashSet<PathBuf>,
        path: &mut Vec<(PathBuf, IncludeEdge)>,
    ) -> bool {
        let Some(edges) = self.edges.get(current) else {
            return false;
        };
        for edge in edges {
            if edge.to == start {
                path.push((current.to_path_buf(), edge.clone()));
                return true;
            }
            if visited.insert(edge.to.clone()) {
                path.push((current.to_path_buf(), edge.clone()));
                if self.dfs(&edge.to, start, visited, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }
}

/// Reports an error when a document's `include` headers participate in a
/// cycle.
///
/// The graph spans the whole run: a cycle is only observable once its
/// closing edge appears, which may be many documents after the opening one.
/// Each document reports at most one cycle, the one reachable from itself.
#[must_use]
pub fn include_cycle() -> Check {
    let graph = Arc::new(Mutex::new(IncludeGraph::default()));
    Check::new(
        "include.cycle",
        vec![KindConstraint::Kind(NodeKind::Program)],
        move |ctx, _nodes| {
            let file = Arc::clone(ctx.file());
            let from = normalize(&file.path);

            let cycle = {
                let mut graph = graph.lock().unwrap_or_else(PoisonError::into_inner);
                for include in file.program.includes() {
                    let to = ctx
                        .resolver()
                        .locate_include(&file, include)
                        .unwrap_or_else(|| {
                            let base = file.path.parent().map_or_else(
                                || PathBuf::from(&include.path),
                                |parent| parent.join(&include.path),
                            );
                            normalize(&base)
                        });
                    graph.add_edge(
                        from.clone(),
                        IncludeEdge {
                            to,
                            text: include.path.clone(),
                            pos: include.pos,
                        },
                    );
                }
                graph.find_cycle(&from)
            };

            if let Some(cycle) = cycle {
                let mut detail = String::from("include cycle detected:");
                for (hop_from, edge) in &cycle {
                    detail.push_str(&format!(
                        "\n\t{} -> {} (included as {:?} at {}:{}:{})",
                        hop_from.display(),
                        edge.to.display(),
                        edge.text,
                        hop_from.display(),
                        edge.pos.line,
                        edge.pos.column
                    ));
                }
                let pos = cycle.first().map_or(Pos::new(1, 1), |(_, e)| e.pos);
                ctx.error(pos, detail);
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use thrift_lint_core::Linter;

    #[test]
    fn missing_includes_are_flagged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("real.thrift"), "struct R {}").unwrap();

        let linter = Linter::new([include_path()].into_iter().collect())
            .with_include_dirs([dir.path().to_path_buf()]);
        let messages = linter.lint(
            "t.thrift",
            "include \"real.thrift\"\ninclude \"fake.thrift\"",
        );
        assert_eq!(messages.len(), 1);
        let m = messages.iter().next().unwrap();
        assert!(m.message.contains("unable to find include file \"fake.thrift\""));
    }

    #[test]
    fn restricted_patterns_pair_file_and_include() {
        let patterns = vec![(
            Pattern::new("*/public/*.thrift").unwrap(),
            Regex::new(r"internal").unwrap(),
        )];
        let linter = Linter::new([include_restricted(patterns)].into_iter().collect());

        let flagged = linter.lint(
            "idl/public/api.thrift",
            "include \"internal/secrets.thrift\"",
        );
        assert_eq!(flagged.len(), 1);
        assert!(flagged
            .iter()
            .next()
            .unwrap()
            .message
            .contains("restricted import"));

        // Same include from a non-matching file is fine.
        let ok = linter.lint(
            "idl/private/impl.thrift",
            "include \"internal/secrets.thrift\"",
        );
        assert!(ok.is_empty());
    }

    #[test]
    fn cycle_reported_once_on_closing_document() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.thrift");
        let b = dir.path().join("b.thrift");
        std::fs::write(&a, "include \"b.thrift\"").unwrap();
        std::fs::write(&b, "include \"a.thrift\"").unwrap();

        let linter = Linter::new([include_cycle()].into_iter().collect());
        let messages = linter.lint_files(&[&a, &b]).unwrap();
        assert_eq!(messages.len(), 1);
        let m = messages.iter().next().unwrap();
        assert!(m.message.contains("include cycle detected"));
        assert!(m.message.contains("a.thrift"));
        assert!(m.message.contains("b.thrift"));
        assert!(m.filename.ends_with("b.thrift"));
    }

    #[test]
    fn self_include_is_a_one_edge_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.thrift");
        std::fs::write(&a, "include \"a.thrift\"").unwrap();

        let linter = Linter::new([include_cycle()].into_iter().collect());
        let messages = linter.lint_files(&[&a]).unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn shared_include_without_back_edge_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.thrift");
        let b = dir.path().join("b.thrift");
        let shared = dir.path().join("shared.thrift");
        std::fs::write(&a, "include \"shared.thrift\"").unwrap();
        std::fs::write(&b, "include \"shared.thrift\"").unwrap();
        std::fs::write(&shared, "struct S {}").unwrap();

        let linter = Linter::new([include_cycle()].into_iter().collect());
        let messages = linter.lint_files(&[&a, &b]).unwrap();
        assert!(messages.is_empty());
    }
}
