//! # thrift-lint-core
//!
//! Core framework for semantic linting of Thrift IDL documents.
//!
//! This crate provides the foundational types for building Thrift linters.
//! It includes:
//!
//! - [`Check`] for named, signature-dispatched diagnostic rules
//! - [`Checks`] for prefix-filterable rule sets
//! - [`Linter`] for walking documents and collecting [`Messages`]
//! - [`Resolver`] and [`ParseCache`] for cross-file name resolution
//! - [`TypeMatcher`] for config-driven type allow/deny lists
//!
//! ## Example
//!
//! ```ignore
//! use thrift_lint_core::{Check, Checks, KindConstraint, Linter, NodeKind};
//!
//! let check = Check::new(
//!     "field.id.missing",
//!     vec![KindConstraint::Kind(NodeKind::Field)],
//!     |ctx, nodes| { /* inspect nodes, report via ctx */ },
//! );
//! let linter = Linter::new([check].into_iter().collect())
//!     .with_include_dirs(["idl/"]);
//! let messages = linter.lint("example.thrift", source);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
mod check;
mod linter;
mod matcher;
mod message;
pub mod nolint;
mod parser;
mod resolve;

pub use ast::{NodeId, NodeKind, NodeRef};
pub use check::{Check, CheckContext, Checks, KindConstraint};
pub use linter::{LintError, Linter, PARSE_CHECK};
pub use matcher::{parse_matchers, TypeMatcher, UnknownMatcher};
pub use message::{Message, Messages, Severity};
pub use parser::{parse, ParseError, ParseErrorDetail};
pub use resolve::{
    normalize, ParseCache, ParsedFile, Resolution, ResolveError, Resolver, TypeResolution,
};
