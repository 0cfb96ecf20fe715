//! AST node model for parsed Thrift documents.
//!
//! The tree is immutable once produced by the parser. Checks never hold on
//! to nodes beyond a single lint invocation; cross-file references are kept
//! alive through [`crate::resolve::ParsedFile`] handles instead.

/// A 1-indexed source position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pos {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Pos {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A name/value annotation attached to a definition or type.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Annotation name.
    pub name: String,
    /// Annotation value. Empty for bare annotations.
    pub value: String,
    /// Source position.
    pub pos: Pos,
}

/// The root node of one parsed document.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Document headers, in declaration order.
    pub headers: Vec<Header>,
    /// Top-level definitions, in declaration order.
    pub definitions: Vec<Definition>,
}

impl Program {
    /// Returns the definition with the given name, if any.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name() == name)
    }

    /// Returns the `include` headers in declaration order.
    pub fn includes(&self) -> impl Iterator<Item = &Include> {
        self.headers.iter().filter_map(|h| match h {
            Header::Include(i) => Some(i),
            Header::Namespace(_) => None,
        })
    }
}

/// A document header.
#[derive(Debug, Clone)]
pub enum Header {
    /// An `include "file.thrift"` header.
    Include(Include),
    /// A `namespace scope name` header.
    Namespace(Namespace),
}

/// An `include` header.
#[derive(Debug, Clone)]
pub struct Include {
    /// The literal include path as written in the source.
    pub path: String,
    /// Source position.
    pub pos: Pos,
}

impl Include {
    /// Returns the include's file stem, used as its reference prefix.
    #[must_use]
    pub fn stem(&self) -> &str {
        let base = self
            .path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.path.as_str());
        base.strip_suffix(".thrift").unwrap_or(base)
    }
}

/// A `namespace` header.
#[derive(Debug, Clone)]
pub struct Namespace {
    /// Namespace scope (language tag or `*`).
    pub scope: String,
    /// Namespace name.
    pub name: String,
    /// Source position.
    pub pos: Pos,
}

/// A top-level definition.
#[derive(Debug, Clone)]
pub enum Definition {
    /// A struct, union, or exception.
    Struct(Struct),
    /// An enumeration.
    Enum(Enum),
    /// A typedef.
    Typedef(Typedef),
    /// A constant.
    Constant(Constant),
    /// A service.
    Service(Service),
}

impl Definition {
    /// Returns the definition's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Struct(s) => &s.name,
            Self::Enum(e) => &e.name,
            Self::Typedef(t) => &t.name,
            Self::Constant(c) => &c.name,
            Self::Service(s) => &s.name,
        }
    }

    /// Returns the definition's source position.
    #[must_use]
    pub fn pos(&self) -> Pos {
        match self {
            Self::Struct(s) => s.pos,
            Self::Enum(e) => e.pos,
            Self::Typedef(t) => t.pos,
            Self::Constant(c) => c.pos,
            Self::Service(s) => s.pos,
        }
    }
}

/// Distinguishes the three structure flavors sharing the [`Struct`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    /// `struct`
    Struct,
    /// `union`
    Union,
    /// `exception`
    Exception,
}

/// A struct, union, or exception definition.
#[derive(Debug, Clone)]
pub struct Struct {
    /// Definition name.
    pub name: String,
    /// Structure flavor.
    pub kind: StructureKind,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    /// Doc comment, if present.
    pub doc: Option<String>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// Field requiredness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requiredness {
    /// `required`
    Required,
    /// `optional`
    Optional,
    /// No explicit requiredness.
    Unspecified,
}

/// A field of a struct, union, exception, or function parameter list.
#[derive(Debug, Clone)]
pub struct Field {
    /// Explicit field ID, if present.
    pub id: Option<i64>,
    /// Field requiredness.
    pub requiredness: Requiredness,
    /// Field type.
    pub field_type: Type,
    /// Field name.
    pub name: String,
    /// Default value, if present.
    pub default: Option<ConstantValue>,
    /// Doc comment, if present.
    pub doc: Option<String>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// An enumeration definition.
#[derive(Debug, Clone)]
pub struct Enum {
    /// Definition name.
    pub name: String,
    /// Items in declaration order.
    pub items: Vec<EnumItem>,
    /// Doc comment, if present.
    pub doc: Option<String>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// One item of an enumeration.
#[derive(Debug, Clone)]
pub struct EnumItem {
    /// Item name.
    pub name: String,
    /// Explicit value, if present.
    pub value: Option<i64>,
    /// Doc comment, if present.
    pub doc: Option<String>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// A typedef definition.
#[derive(Debug, Clone)]
pub struct Typedef {
    /// Definition name.
    pub name: String,
    /// The aliased type.
    pub target: Type,
    /// Doc comment, if present.
    pub doc: Option<String>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// A constant definition.
#[derive(Debug, Clone)]
pub struct Constant {
    /// Definition name.
    pub name: String,
    /// The declared type.
    pub value_type: Type,
    /// The constant's value.
    pub value: ConstantValue,
    /// Doc comment, if present.
    pub doc: Option<String>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// A service definition.
#[derive(Debug, Clone)]
pub struct Service {
    /// Definition name.
    pub name: String,
    /// The extended service name, if any.
    pub extends: Option<String>,
    /// Functions in declaration order.
    pub functions: Vec<Function>,
    /// Doc comment, if present.
    pub doc: Option<String>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// One function of a service.
#[derive(Debug, Clone)]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Whether the function is `oneway`.
    pub oneway: bool,
    /// Return type; `None` for `void`.
    pub return_type: Option<Type>,
    /// Parameters.
    pub params: Vec<Field>,
    /// `throws` clause fields.
    pub throws: Vec<Field>,
    /// Doc comment, if present.
    pub doc: Option<String>,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// A type expression.
#[derive(Debug, Clone)]
pub enum Type {
    /// A primitive base type.
    Base(BaseType),
    /// A `map<K, V>`.
    Map(Box<MapType>),
    /// A `list<T>`.
    List(Box<ListType>),
    /// A `set<T>`.
    Set(Box<SetType>),
    /// A by-name reference to another definition.
    Reference(TypeReference),
}

impl Type {
    /// Returns the type's source position.
    #[must_use]
    pub fn pos(&self) -> Pos {
        match self {
            Self::Base(b) => b.pos,
            Self::Map(m) => m.pos,
            Self::List(l) => l.pos,
            Self::Set(s) => s.pos,
            Self::Reference(r) => r.pos,
        }
    }
}

/// Identifies a primitive base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseTypeId {
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
}

impl BaseTypeId {
    /// Returns the canonical source-level name of this base type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Double => "double",
            Self::String => "string",
            Self::Binary => "binary",
        }
    }
}

/// A primitive base type occurrence.
#[derive(Debug, Clone)]
pub struct BaseType {
    /// Which base type this is.
    pub id: BaseTypeId,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// A `map<K, V>` occurrence.
#[derive(Debug, Clone)]
pub struct MapType {
    /// Key type.
    pub key: Type,
    /// Value type.
    pub value: Type,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// A `list<T>` occurrence.
#[derive(Debug, Clone)]
pub struct ListType {
    /// Element type.
    pub value: Type,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// A `set<T>` occurrence.
#[derive(Debug, Clone)]
pub struct SetType {
    /// Element type.
    pub value: Type,
    /// Trailing annotations.
    pub annotations: Vec<Annotation>,
    /// Source position.
    pub pos: Pos,
}

/// A by-name type reference, possibly `file.Name`-qualified.
#[derive(Debug, Clone)]
pub struct TypeReference {
    /// The referenced name as written.
    pub name: String,
    /// Source position.
    pub pos: Pos,
}

/// A by-name constant reference, possibly qualified.
#[derive(Debug, Clone)]
pub struct ConstantReference {
    /// The referenced name as written.
    pub name: String,
    /// Source position.
    pub pos: Pos,
}

/// A constant value expression.
#[derive(Debug, Clone)]
pub struct ConstantValue {
    /// The value's shape.
    pub kind: ConstantValueKind,
    /// Source position.
    pub pos: Pos,
}

/// The shape of a constant value.
#[derive(Debug, Clone)]
pub enum ConstantValueKind {
    /// An integer literal.
    Integer(i64),
    /// A floating-point literal.
    Double(f64),
    /// A string literal.
    String(String),
    /// A boolean literal.
    Bool(bool),
    /// A reference to another constant or enum value.
    Reference(ConstantReference),
    /// A `[...]` list literal.
    List(Vec<ConstantValue>),
    /// A `{k: v, ...}` map literal.
    Map(Vec<(ConstantValue, ConstantValue)>),
}

/// The tag distinguishing node kinds within the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Document root.
    Program,
    /// `include` header.
    Include,
    /// `namespace` header.
    Namespace,
    /// Struct, union, or exception.
    Struct,
    /// Field.
    Field,
    /// Enumeration.
    Enum,
    /// Enumeration item.
    EnumItem,
    /// Typedef.
    Typedef,
    /// Constant definition.
    Constant,
    /// Service.
    Service,
    /// Service function.
    Function,
    /// Primitive base type.
    BaseType,
    /// Map type.
    MapType,
    /// List type.
    ListType,
    /// Set type.
    SetType,
    /// Type reference.
    TypeReference,
    /// Constant reference.
    ConstantReference,
    /// Constant value.
    ConstantValue,
    /// Annotation.
    Annotation,
}

/// A traversal-stable node identity, valid for one document walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(NodeKind, usize);

const NO_ANNOTATIONS: &[Annotation] = &[];

/// A tagged reference to any AST node.
///
/// This is the closed union the dispatcher matches rule signatures against.
/// Adding a node kind means adding a variant here; the dispatcher itself
/// never changes.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// Document root.
    Program(&'a Program),
    /// `include` header.
    Include(&'a Include),
    /// `namespace` header.
    Namespace(&'a Namespace),
    /// Struct, union, or exception.
    Struct(&'a Struct),
    /// Field.
    Field(&'a Field),
    /// Enumeration.
    Enum(&'a Enum),
    /// Enumeration item.
    EnumItem(&'a EnumItem),
    /// Typedef.
    Typedef(&'a Typedef),
    /// Constant definition.
    Constant(&'a Constant),
    /// Service.
    Service(&'a Service),
    /// Service function.
    Function(&'a Function),
    /// Primitive base type.
    BaseType(&'a BaseType),
    /// Map type.
    MapType(&'a MapType),
    /// List type.
    ListType(&'a ListType),
    /// Set type.
    SetType(&'a SetType),
    /// Type reference.
    TypeReference(&'a TypeReference),
    /// Constant reference.
    ConstantReference(&'a ConstantReference),
    /// Constant value.
    ConstantValue(&'a ConstantValue),
    /// Annotation.
    Annotation(&'a Annotation),
}

impl<'a> NodeRef<'a> {
    /// Wraps a type expression in the matching node reference.
    #[must_use]
    pub fn from_type(ty: &'a Type) -> Self {
        match ty {
            Type::Base(b) => Self::BaseType(b),
            Type::Map(m) => Self::MapType(m),
            Type::List(l) => Self::ListType(l),
            Type::Set(s) => Self::SetType(s),
            Type::Reference(r) => Self::TypeReference(r),
        }
    }

    /// Wraps a definition in the matching node reference.
    #[must_use]
    pub fn from_definition(def: &'a Definition) -> Self {
        match def {
            Definition::Struct(s) => Self::Struct(s),
            Definition::Enum(e) => Self::Enum(e),
            Definition::Typedef(t) => Self::Typedef(t),
            Definition::Constant(c) => Self::Constant(c),
            Definition::Service(s) => Self::Service(s),
        }
    }

    /// Returns this node's kind tag.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Program(_) => NodeKind::Program,
            Self::Include(_) => NodeKind::Include,
            Self::Namespace(_) => NodeKind::Namespace,
            Self::Struct(_) => NodeKind::Struct,
            Self::Field(_) => NodeKind::Field,
            Self::Enum(_) => NodeKind::Enum,
            Self::EnumItem(_) => NodeKind::EnumItem,
            Self::Typedef(_) => NodeKind::Typedef,
            Self::Constant(_) => NodeKind::Constant,
            Self::Service(_) => NodeKind::Service,
            Self::Function(_) => NodeKind::Function,
            Self::BaseType(_) => NodeKind::BaseType,
            Self::MapType(_) => NodeKind::MapType,
            Self::ListType(_) => NodeKind::ListType,
            Self::SetType(_) => NodeKind::SetType,
            Self::TypeReference(_) => NodeKind::TypeReference,
            Self::ConstantReference(_) => NodeKind::ConstantReference,
            Self::ConstantValue(_) => NodeKind::ConstantValue,
            Self::Annotation(_) => NodeKind::Annotation,
        }
    }

    /// Returns an identity for this node, unique within one walk.
    #[must_use]
    pub fn id(&self) -> NodeId {
        let addr = match *self {
            Self::Program(n) => std::ptr::from_ref(n) as usize,
            Self::Include(n) => std::ptr::from_ref(n) as usize,
            Self::Namespace(n) => std::ptr::from_ref(n) as usize,
            Self::Struct(n) => std::ptr::from_ref(n) as usize,
            Self::Field(n) => std::ptr::from_ref(n) as usize,
            Self::Enum(n) => std::ptr::from_ref(n) as usize,
            Self::EnumItem(n) => std::ptr::from_ref(n) as usize,
            Self::Typedef(n) => std::ptr::from_ref(n) as usize,
            Self::Constant(n) => std::ptr::from_ref(n) as usize,
            Self::Service(n) => std::ptr::from_ref(n) as usize,
            Self::Function(n) => std::ptr::from_ref(n) as usize,
            Self::BaseType(n) => std::ptr::from_ref(n) as usize,
            Self::MapType(n) => std::ptr::from_ref(n) as usize,
            Self::ListType(n) => std::ptr::from_ref(n) as usize,
            Self::SetType(n) => std::ptr::from_ref(n) as usize,
            Self::TypeReference(n) => std::ptr::from_ref(n) as usize,
            Self::ConstantReference(n) => std::ptr::from_ref(n) as usize,
            Self::ConstantValue(n) => std::ptr::from_ref(n) as usize,
            Self::Annotation(n) => std::ptr::from_ref(n) as usize,
        };
        NodeId(self.kind(), addr)
    }

    /// Returns this node's source position.
    #[must_use]
    pub fn pos(&self) -> Pos {
        match *self {
            Self::Program(_) => Pos::new(1, 1),
            Self::Include(n) => n.pos,
            Self::Namespace(n) => n.pos,
            Self::Struct(n) => n.pos,
            Self::Field(n) => n.pos,
            Self::Enum(n) => n.pos,
            Self::EnumItem(n) => n.pos,
            Self::Typedef(n) => n.pos,
            Self::Constant(n) => n.pos,
            Self::Service(n) => n.pos,
            Self::Function(n) => n.pos,
            Self::BaseType(n) => n.pos,
            Self::MapType(n) => n.pos,
            Self::ListType(n) => n.pos,
            Self::SetType(n) => n.pos,
            Self::TypeReference(n) => n.pos,
            Self::ConstantReference(n) => n.pos,
            Self::ConstantValue(n) => n.pos,
            Self::Annotation(n) => n.pos,
        }
    }

    /// Returns this node's name, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Self::Struct(n) => Some(&n.name),
            Self::Field(n) => Some(&n.name),
            Self::Enum(n) => Some(&n.name),
            Self::EnumItem(n) => Some(&n.name),
            Self::Typedef(n) => Some(&n.name),
            Self::Constant(n) => Some(&n.name),
            Self::Service(n) => Some(&n.name),
            Self::Function(n) => Some(&n.name),
            Self::Namespace(n) => Some(&n.name),
            Self::Annotation(n) => Some(&n.name),
            _ => None,
        }
    }

    /// Returns this node's doc string, if it has one.
    #[must_use]
    pub fn doc(&self) -> Option<&'a str> {
        match *self {
            Self::Struct(n) => n.doc.as_deref(),
            Self::Field(n) => n.doc.as_deref(),
            Self::Enum(n) => n.doc.as_deref(),
            Self::EnumItem(n) => n.doc.as_deref(),
            Self::Typedef(n) => n.doc.as_deref(),
            Self::Constant(n) => n.doc.as_deref(),
            Self::Service(n) => n.doc.as_deref(),
            Self::Function(n) => n.doc.as_deref(),
            _ => None,
        }
    }

    /// Returns this node's annotations. Empty for kinds without them.
    #[must_use]
    pub fn annotations(&self) -> &'a [Annotation] {
        match *self {
            Self::Struct(n) => &n.annotations,
            Self::Field(n) => &n.annotations,
            Self::Enum(n) => &n.annotations,
            Self::EnumItem(n) => &n.annotations,
            Self::Typedef(n) => &n.annotations,
            Self::Constant(n) => &n.annotations,
            Self::Service(n) => &n.annotations,
            Self::Function(n) => &n.annotations,
            Self::BaseType(n) => &n.annotations,
            Self::MapType(n) => &n.annotations,
            Self::ListType(n) => &n.annotations,
            Self::SetType(n) => &n.annotations,
            _ => NO_ANNOTATIONS,
        }
    }

    /// Returns this node's children in traversal (pre-order) order.
    #[must_use]
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match *self {
            Self::Program(p) => {
                for header in &p.headers {
                    out.push(match header {
                        Header::Include(i) => Self::Include(i),
                        Header::Namespace(n) => Self::Namespace(n),
                    });
                }
                for def in &p.definitions {
                    out.push(Self::from_definition(def));
                }
            }
            Self::Struct(s) => {
                out.extend(s.fields.iter().map(Self::Field));
                out.extend(s.annotations.iter().map(Self::Annotation));
            }
            Self::Field(f) => {
                out.push(Self::from_type(&f.field_type));
                if let Some(default) = &f.default {
                    out.push(Self::ConstantValue(default));
                }
                out.extend(f.annotations.iter().map(Self::Annotation));
            }
            Self::Enum(e) => {
                out.extend(e.items.iter().map(Self::EnumItem));
                out.extend(e.annotations.iter().map(Self::Annotation));
            }
            Self::EnumItem(i) => {
                out.extend(i.annotations.iter().map(Self::Annotation));
            }
            Self::Typedef(t) => {
                out.push(Self::from_type(&t.target));
                out.extend(t.annotations.iter().map(Self::Annotation));
            }
            Self::Constant(c) => {
                out.push(Self::from_type(&c.value_type));
                out.push(Self::ConstantValue(&c.value));
                out.extend(c.annotations.iter().map(Self::Annotation));
            }
            Self::Service(s) => {
                out.extend(s.functions.iter().map(Self::Function));
                out.extend(s.annotations.iter().map(Self::Annotation));
            }
            Self::Function(f) => {
                if let Some(ret) = &f.return_type {
                    out.push(Self::from_type(ret));
                }
                out.extend(f.params.iter().map(Self::Field));
                out.extend(f.throws.iter().map(Self::Field));
                out.extend(f.annotations.iter().map(Self::Annotation));
            }
            Self::BaseType(b) => {
                out.extend(b.annotations.iter().map(Self::Annotation));
            }
            Self::MapType(m) => {
                out.push(Self::from_type(&m.key));
                out.push(Self::from_type(&m.value));
                out.extend(m.annotations.iter().map(Self::Annotation));
            }
            Self::ListType(l) => {
                out.push(Self::from_type(&l.value));
                out.extend(l.annotations.iter().map(Self::Annotation));
            }
            Self::SetType(s) => {
                out.push(Self::from_type(&s.value));
                out.extend(s.annotations.iter().map(Self::Annotation));
            }
            Self::ConstantValue(v) => match &v.kind {
                ConstantValueKind::Reference(r) => out.push(Self::ConstantReference(r)),
                ConstantValueKind::List(values) => {
                    out.extend(values.iter().map(Self::ConstantValue));
                }
                ConstantValueKind::Map(entries) => {
                    for (k, v) in entries {
                        out.push(Self::ConstantValue(k));
                        out.push(Self::ConstantValue(v));
                    }
                }
                _ => {}
            },
            Self::Include(_)
            | Self::Namespace(_)
            | Self::TypeReference(_)
            | Self::ConstantReference(_)
            | Self::Annotation(_) => {}
        }
        out
    }

    /// Returns the struct if this node is one.
    #[must_use]
    pub fn as_struct(&self) -> Option<&'a Struct> {
        match *self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the field if this node is one.
    #[must_use]
    pub fn as_field(&self) -> Option<&'a Field> {
        match *self {
            Self::Field(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the enum if this node is one.
    #[must_use]
    pub fn as_enum(&self) -> Option<&'a Enum> {
        match *self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the include if this node is one.
    #[must_use]
    pub fn as_include(&self) -> Option<&'a Include> {
        match *self {
            Self::Include(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the namespace if this node is one.
    #[must_use]
    pub fn as_namespace(&self) -> Option<&'a Namespace> {
        match *self {
            Self::Namespace(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the map type if this node is one.
    #[must_use]
    pub fn as_map_type(&self) -> Option<&'a MapType> {
        match *self {
            Self::MapType(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the set type if this node is one.
    #[must_use]
    pub fn as_set_type(&self) -> Option<&'a SetType> {
        match *self {
            Self::SetType(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the constant reference if this node is one.
    #[must_use]
    pub fn as_constant_reference(&self) -> Option<&'a ConstantReference> {
        match *self {
            Self::ConstantReference(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the constant value if this node is one.
    #[must_use]
    pub fn as_constant_value(&self) -> Option<&'a ConstantValue> {
        match *self {
            Self::ConstantValue(v) => Some(v),
            _ => None,
        }
    }
}
