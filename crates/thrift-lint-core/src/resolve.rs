//! Cross-file name and type resolution.
//!
//! References can name definitions in the current document or, through a
//! `file.Name` qualified form, definitions in an included document. Included
//! documents are parsed once per run and shared through a [`ParseCache`].

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use crate::ast::{Definition, Include, NodeRef, Program, Type};
use crate::parser::{self, ParseError};

/// A resolution failure. Checks decide the severity of reporting these.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No definition with the given name exists.
    #[error("unable to find a definition for {name:?}")]
    Unresolved {
        /// The name that failed to resolve.
        name: String,
    },
    /// A qualified name's file prefix matches no `include` header.
    #[error("no include matches the {prefix:?} prefix")]
    UnknownInclude {
        /// The file prefix of the qualified name.
        prefix: String,
    },
    /// An included file exists in no search directory.
    #[error("unable to locate include {path:?}")]
    IncludeNotFound {
        /// The include path as written.
        path: String,
    },
    /// An included file could not be read.
    #[error("unable to read {}", path.display())]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// An included file failed to parse.
    #[error("unable to parse {}", path.display())]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying parse failure.
        #[source]
        source: ParseError,
    },
    /// A typedef resolves, transitively, to itself.
    #[error("found a cycle resolving typedef {name:?}")]
    TypedefCycle {
        /// The typedef where the cycle was detected.
        name: String,
    },
}

/// A parsed document keyed by its normalized path.
#[derive(Debug)]
pub struct ParsedFile {
    /// The document's normalized path.
    pub path: PathBuf,
    /// The parsed document.
    pub program: Program,
}

impl ParsedFile {
    /// Creates a parsed file record.
    #[must_use]
    pub fn new(path: PathBuf, program: Program) -> Self {
        Self { path, program }
    }
}

/// Lexically normalizes a path: drops `.` components and folds `..` into the
/// preceding component where possible.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// A per-run cache of parsed documents, keyed by normalized path.
///
/// Read-mostly; safe to share across documents linted in parallel.
#[derive(Debug, Default)]
pub struct ParseCache {
    files: RwLock<HashMap<PathBuf, Arc<ParsedFile>>>,
}

impl ParseCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an already-parsed document under its path.
    pub fn insert(&self, file: Arc<ParsedFile>) {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        files.insert(normalize(&file.path), file);
    }

    /// Returns the cached document for `path`, if present.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<Arc<ParsedFile>> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        files.get(&normalize(path)).cloned()
    }

    /// Returns the document at `path`, reading and parsing it on first use.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the file cannot be read or parsed.
    pub fn load(&self, path: &Path) -> Result<Arc<ParsedFile>, ResolveError> {
        let path = normalize(path);
        if let Some(file) = self.get(&path) {
            return Ok(file);
        }
        tracing::debug!(path = %path.display(), "parsing included file");
        let source = std::fs::read_to_string(&path).map_err(|source| ResolveError::Io {
            path: path.clone(),
            source,
        })?;
        let program = parser::parse(&source).map_err(|source| ResolveError::Parse {
            path: path.clone(),
            source,
        })?;
        let file = Arc::new(ParsedFile::new(path, program));
        self.insert(Arc::clone(&file));
        Ok(file)
    }
}

/// Where a resolution landed inside its file.
#[derive(Debug, Clone, Copy)]
enum Target {
    /// A top-level definition, by index.
    Definition(usize),
    /// One item of a top-level enum.
    EnumItem {
        /// Index of the enum definition.
        def: usize,
        /// Index of the item within it.
        item: usize,
    },
    /// The type aliased by a top-level typedef.
    TypedefTarget(usize),
    /// The declared type of a top-level constant.
    ConstantType(usize),
}

/// A successful resolution: the owning file plus the node within it.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The file the resolved node lives in.
    pub file: Arc<ParsedFile>,
    target: Target,
}

impl Resolution {
    /// The resolved node.
    ///
    /// # Panics
    ///
    /// Never panics in practice: the target indices are produced against
    /// `file` and the file is immutable once cached.
    #[must_use]
    pub fn node(&self) -> NodeRef<'_> {
        let definitions = &self.file.program.definitions;
        match self.target {
            Target::Definition(i) => NodeRef::from_definition(&definitions[i]),
            Target::EnumItem { def, item } => match &definitions[def] {
                Definition::Enum(e) => NodeRef::EnumItem(&e.items[item]),
                _ => unreachable!("enum item target points at an enum"),
            },
            Target::TypedefTarget(i) => match &definitions[i] {
                Definition::Typedef(td) => NodeRef::from_type(&td.target),
                _ => unreachable!("typedef target points at a typedef"),
            },
            Target::ConstantType(i) => match &definitions[i] {
                Definition::Constant(c) => NodeRef::from_type(&c.value_type),
                _ => unreachable!("constant target points at a constant"),
            },
        }
    }

    /// The resolved definition, when the target is a top-level definition.
    #[must_use]
    pub fn definition(&self) -> Option<&Definition> {
        match self.target {
            Target::Definition(i) => Some(&self.file.program.definitions[i]),
            _ => None,
        }
    }
}

/// The outcome of resolving a type to its terminal form.
#[derive(Debug)]
pub enum TypeResolution<'t> {
    /// The input type was already concrete; no resolution was needed.
    Direct(&'t Type),
    /// The terminal node reached by following references.
    Resolved(Resolution),
}

impl TypeResolution<'_> {
    /// The terminal node.
    #[must_use]
    pub fn node(&self) -> NodeRef<'_> {
        match self {
            Self::Direct(ty) => NodeRef::from_type(ty),
            Self::Resolved(resolution) => resolution.node(),
        }
    }
}

/// Resolves names and types across a run's documents.
#[derive(Debug, Clone)]
pub struct Resolver {
    cache: Arc<ParseCache>,
    includes: Arc<[PathBuf]>,
}

impl Resolver {
    /// Creates a resolver over `cache`, searching `includes` for included
    /// files.
    #[must_use]
    pub fn new(cache: Arc<ParseCache>, includes: Vec<PathBuf>) -> Self {
        Self {
            cache,
            includes: includes.into(),
        }
    }

    /// The shared parse cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<ParseCache> {
        &self.cache
    }

    /// The configured include search directories.
    #[must_use]
    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.includes
    }

    /// Locates the file named by an `include` header, searching the
    /// including file's own directory first and then each include directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when no candidate exists or the winning
    /// candidate cannot be loaded.
    pub fn load_include(
        &self,
        from: &ParsedFile,
        include: &Include,
    ) -> Result<Arc<ParsedFile>, ResolveError> {
        if let Some(path) = self.locate_include(from, include) {
            return self.cache.load(&path);
        }
        Err(ResolveError::IncludeNotFound {
            path: include.path.clone(),
        })
    }

    /// Returns the path an `include` header resolves to, if any candidate
    /// file exists.
    #[must_use]
    pub fn locate_include(&self, from: &ParsedFile, include: &Include) -> Option<PathBuf> {
        let mut candidates = Vec::with_capacity(self.includes.len() + 1);
        if let Some(parent) = from.path.parent() {
            candidates.push(parent.join(&include.path));
        }
        for dir in self.includes.iter() {
            candidates.push(dir.join(&include.path));
        }
        candidates
            .into_iter()
            .map(|c| normalize(&c))
            .find(|c| c.is_file() || self.cache.get(c).is_some())
    }

    /// Resolves a possibly-qualified name to a definition or enum item.
    ///
    /// Unqualified names are scanned against the file's own definitions.
    /// `file.Name` forms follow the matching `include` header; `Enum.Item`
    /// forms resolve the enum first and then scan its items.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when any step of the lookup fails.
    pub fn resolve(&self, name: &str, file: &Arc<ParsedFile>) -> Result<Resolution, ResolveError> {
        if let Some(resolution) = self.resolve_local(name, file) {
            return Ok(resolution);
        }
        if let Some((prefix, rest)) = name.split_once('.') {
            if let Some(include) = file.program.includes().find(|i| i.stem() == prefix) {
                let included = self.load_include(file, include)?;
                return self.resolve(rest, &included);
            }
        }
        Err(ResolveError::Unresolved {
            name: name.to_string(),
        })
    }

    /// Resolves a constant or enum-item reference.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Unresolved`] when the name resolves to
    /// something other than a constant or enum item, or not at all.
    pub fn resolve_constant(
        &self,
        name: &str,
        file: &Arc<ParsedFile>,
    ) -> Result<Resolution, ResolveError> {
        let resolution = self.resolve(name, file)?;
        match resolution.node() {
            NodeRef::Constant(_) | NodeRef::EnumItem(_) => Ok(resolution),
            _ => Err(ResolveError::Unresolved {
                name: name.to_string(),
            }),
        }
    }

    /// Resolves a type to its terminal form, following references through
    /// typedefs (which add nothing) and constants (which contribute their
    /// declared type).
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] on an unresolvable reference or a typedef
    /// cycle.
    pub fn resolve_type<'t>(
        &self,
        ty: &'t Type,
        file: &Arc<ParsedFile>,
    ) -> Result<TypeResolution<'t>, ResolveError> {
        match ty {
            Type::Reference(reference) => {
                let mut seen = HashSet::new();
                self.resolve_reference(&reference.name, file, &mut seen)
                    .map(TypeResolution::Resolved)
            }
            _ => Ok(TypeResolution::Direct(ty)),
        }
    }

    fn resolve_reference(
        &self,
        name: &str,
        file: &Arc<ParsedFile>,
        seen: &mut HashSet<(PathBuf, String)>,
    ) -> Result<Resolution, ResolveError> {
        enum Step {
            Done,
            TypedefTarget,
            ConstantType,
            Follow { next: String, via: String },
        }

        let resolution = self.resolve(name, file)?;
        let step = match resolution.node() {
            NodeRef::Typedef(td) => match &td.target {
                Type::Reference(r) => Step::Follow {
                    next: r.name.clone(),
                    via: td.name.clone(),
                },
                _ => Step::TypedefTarget,
            },
            NodeRef::Constant(c) => match &c.value_type {
                Type::Reference(r) => Step::Follow {
                    next: r.name.clone(),
                    via: c.name.clone(),
                },
                _ => Step::ConstantType,
            },
            _ => Step::Done,
        };

        match step {
            Step::Done => Ok(resolution),
            Step::TypedefTarget => {
                let Target::Definition(i) = resolution.target else {
                    return Ok(resolution);
                };
                Ok(Resolution {
                    file: resolution.file,
                    target: Target::TypedefTarget(i),
                })
            }
            Step::ConstantType => {
                let Target::Definition(i) = resolution.target else {
                    return Ok(resolution);
                };
                Ok(Resolution {
                    file: resolution.file,
                    target: Target::ConstantType(i),
                })
            }
            Step::Follow { next, via } => {
                if !seen.insert((resolution.file.path.clone(), via.clone())) {
                    return Err(ResolveError::TypedefCycle { name: via });
                }
                let owner = Arc::clone(&resolution.file);
                self.resolve_reference(&next, &owner, seen)
            }
        }
    }

    fn resolve_local(&self, name: &str, file: &Arc<ParsedFile>) -> Option<Resolution> {
        let definitions = &file.program.definitions;
        if let Some(index) = definitions.iter().position(|d| d.name() == name) {
            return Some(Resolution {
                file: Arc::clone(file),
                target: Target::Definition(index),
            });
        }
        // Enum.Item form within this file.
        let (enum_name, item_name) = name.split_once('.')?;
        let def = definitions.iter().position(|d| d.name() == enum_name)?;
        let Definition::Enum(e) = &definitions[def] else {
            return None;
        };
        let item = e.items.iter().position(|i| i.name == item_name)?;
        Some(Resolution {
            file: Arc::clone(file),
            target: Target::EnumItem { def, item },
        })
    }
}
