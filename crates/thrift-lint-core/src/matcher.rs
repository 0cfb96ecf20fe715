//! Named predicates over types, used by configurable allow/deny lists.

use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::ast::{BaseTypeId, NodeRef, StructureKind, Type};
use crate::resolve::{ParsedFile, ResolveError, Resolver};

/// Every valid matcher name, lexicographically sorted.
const VALID_NAMES: &[&str] = &[
    "base", "binary", "bool", "double", "enum", "exception", "i16", "i32", "i64", "i8", "list",
    "map", "set", "string", "struct", "union",
];

/// An unrecognized matcher name.
#[derive(Debug, Clone, Error)]
#[error("unknown type matcher {name:?} (valid names: {})", VALID_NAMES.join(", "))]
pub struct UnknownMatcher {
    /// The name that failed to parse.
    pub name: String,
}

/// A named predicate over a (possibly-reference) type.
///
/// References are resolved to their terminal form before testing, so a
/// typedef chain ending in `i64` matches the same matchers as a literal
/// `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMatcher {
    /// Any base type.
    Base,
    /// `bool`
    Bool,
    /// `byte` / `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `double`
    Double,
    /// `string`
    String,
    /// `binary`
    Binary,
    /// Any `list`.
    List,
    /// Any `map`.
    Map,
    /// Any `set`.
    Set,
    /// Any enum definition.
    Enum,
    /// A `struct` definition.
    Struct,
    /// A `union` definition.
    Union,
    /// An `exception` definition.
    Exception,
}

impl FromStr for TypeMatcher {
    type Err = UnknownMatcher;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Self::Base),
            "bool" => Ok(Self::Bool),
            "i8" => Ok(Self::I8),
            "i16" => Ok(Self::I16),
            "i32" => Ok(Self::I32),
            "i64" => Ok(Self::I64),
            "double" => Ok(Self::Double),
            "string" => Ok(Self::String),
            "binary" => Ok(Self::Binary),
            "list" => Ok(Self::List),
            "map" => Ok(Self::Map),
            "set" => Ok(Self::Set),
            "enum" => Ok(Self::Enum),
            "struct" => Ok(Self::Struct),
            "union" => Ok(Self::Union),
            "exception" => Ok(Self::Exception),
            other => Err(UnknownMatcher {
                name: other.to_string(),
            }),
        }
    }
}

impl TypeMatcher {
    /// The matcher's configuration name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Double => "double",
            Self::String => "string",
            Self::Binary => "binary",
            Self::List => "list",
            Self::Map => "map",
            Self::Set => "set",
            Self::Enum => "enum",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Exception => "exception",
        }
    }

    /// Tests whether `ty`, resolved to its terminal form, satisfies this
    /// matcher.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when a reference in `ty` cannot be
    /// resolved.
    pub fn matches(
        self,
        resolver: &Resolver,
        file: &Arc<ParsedFile>,
        ty: &Type,
    ) -> Result<bool, ResolveError> {
        let resolved = resolver.resolve_type(ty, file)?;
        Ok(self.matches_terminal(resolved.node()))
    }

    /// Tests an arbitrary node, resolving it first when it is a type
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the node is an unresolvable
    /// reference.
    pub fn matches_node(
        self,
        resolver: &Resolver,
        file: &Arc<ParsedFile>,
        node: NodeRef<'_>,
    ) -> Result<bool, ResolveError> {
        match node {
            NodeRef::TypeReference(r) => {
                let ty = Type::Reference(r.clone());
                let resolved = resolver.resolve_type(&ty, file)?;
                Ok(self.matches_terminal(resolved.node()))
            }
            other => Ok(self.matches_terminal(other)),
        }
    }

    fn matches_terminal(self, node: NodeRef<'_>) -> bool {
        match node {
            NodeRef::BaseType(base) => match self {
                Self::Base => true,
                Self::Bool => base.id == BaseTypeId::Bool,
                Self::I8 => base.id == BaseTypeId::I8,
                Self::I16 => base.id == BaseTypeId::I16,
                Self::I32 => base.id == BaseTypeId::I32,
                Self::I64 => base.id == BaseTypeId::I64,
                Self::Double => base.id == BaseTypeId::Double,
                Self::String => base.id == BaseTypeId::String,
                Self::Binary => base.id == BaseTypeId::Binary,
                _ => false,
            },
            NodeRef::ListType(_) => self == Self::List,
            NodeRef::MapType(_) => self == Self::Map,
            NodeRef::SetType(_) => self == Self::Set,
            NodeRef::Enum(_) => self == Self::Enum,
            NodeRef::Struct(s) => match s.kind {
                StructureKind::Struct => self == Self::Struct,
                StructureKind::Union => self == Self::Union,
                StructureKind::Exception => self == Self::Exception,
            },
            _ => false,
        }
    }
}

/// Parses a configured list of matcher names.
///
/// # Errors
///
/// Returns the first [`UnknownMatcher`] encountered.
pub fn parse_matchers<S: AsRef<str>>(names: &[S]) -> Result<Vec<TypeMatcher>, UnknownMatcher> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::resolve::ParseCache;
    use std::path::PathBuf;

    fn setup(source: &str) -> (Resolver, Arc<ParsedFile>) {
        let cache = Arc::new(ParseCache::new());
        let file = Arc::new(ParsedFile::new(
            PathBuf::from("t.thrift"),
            parse(source).unwrap(),
        ));
        cache.insert(Arc::clone(&file));
        (Resolver::new(cache, Vec::new()), file)
    }

    fn field_type(file: &Arc<ParsedFile>, def: usize) -> &Type {
        let crate::ast::Definition::Struct(s) = &file.program.definitions[def] else {
            panic!("expected a struct");
        };
        &s.fields[0].field_type
    }

    #[test]
    fn unknown_name_lists_valid_names() {
        let err = TypeMatcher::from_str("i128").unwrap_err();
        assert!(err.to_string().contains("i128"));
        assert!(err.to_string().contains("base, binary, bool"));
    }

    #[test]
    fn names_round_trip() {
        for name in VALID_NAMES {
            let matcher: TypeMatcher = name.parse().unwrap();
            assert_eq!(matcher.name(), *name);
        }
    }

    #[test]
    fn matches_concrete_types() {
        let (resolver, file) = setup(
            "struct A { 1: i64 x }\nstruct B { 1: map<string, i32> x }\nstruct C { 1: set<bool> x }",
        );
        assert!(TypeMatcher::I64
            .matches(&resolver, &file, field_type(&file, 0))
            .unwrap());
        assert!(TypeMatcher::Base
            .matches(&resolver, &file, field_type(&file, 0))
            .unwrap());
        assert!(!TypeMatcher::I32
            .matches(&resolver, &file, field_type(&file, 0))
            .unwrap());
        assert!(TypeMatcher::Map
            .matches(&resolver, &file, field_type(&file, 1))
            .unwrap());
        assert!(TypeMatcher::Set
            .matches(&resolver, &file, field_type(&file, 2))
            .unwrap());
    }

    #[test]
    fn resolves_through_typedefs_like_direct_types() {
        let (resolver, file) = setup(
            "typedef i64 UserId\ntypedef UserId AccountId\nstruct A { 1: AccountId x }\nstruct B { 1: i64 x }",
        );
        for matcher in [TypeMatcher::I64, TypeMatcher::Base, TypeMatcher::String] {
            let via_typedef = matcher
                .matches(&resolver, &file, field_type(&file, 2))
                .unwrap();
            let direct = matcher
                .matches(&resolver, &file, field_type(&file, 3))
                .unwrap();
            assert_eq!(via_typedef, direct, "matcher {}", matcher.name());
        }
    }

    #[test]
    fn matches_structure_kinds() {
        let (resolver, file) = setup(
            "union U {}\nexception X {}\nenum E { ONE }\nstruct A { 1: U u }\nstruct B { 1: X x }\nstruct C { 1: E e }",
        );
        assert!(TypeMatcher::Union
            .matches(&resolver, &file, field_type(&file, 3))
            .unwrap());
        assert!(!TypeMatcher::Struct
            .matches(&resolver, &file, field_type(&file, 3))
            .unwrap());
        assert!(TypeMatcher::Exception
            .matches(&resolver, &file, field_type(&file, 4))
            .unwrap());
        assert!(TypeMatcher::Enum
            .matches(&resolver, &file, field_type(&file, 5))
            .unwrap());
    }

    #[test]
    fn unresolved_reference_is_an_error() {
        let (resolver, file) = setup("struct A { 1: Missing x }");
        assert!(TypeMatcher::Struct
            .matches(&resolver, &file, field_type(&file, 0))
            .is_err());
    }
}
