//! # thrift-lint-checks
//!
//! The built-in checks for Thrift IDL linting. Each function returns a
//! configured [`thrift_lint_core::Check`]; assemble the ones you want into a
//! [`thrift_lint_core::Checks`] set and hand it to a
//! [`thrift_lint_core::Linter`].
//!
//! Check names are dot-segmented (`field.id.missing`, `include.cycle`) so
//! they can be filtered by prefix and targeted by `nolint` directives.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod constants;
mod depth;
mod enums;
mod fields;
mod includes;
mod ints;
mod maps;
mod names;
mod namespaces;
mod sets;
mod types;
mod unions;

pub use constants::constant_ref;
pub use depth::depth;
pub use enums::enum_size;
pub use fields::{
    field_doc_missing, field_id_missing, field_id_negative, field_id_zero, field_optional,
    field_requiredness,
};
pub use includes::{include_cycle, include_path, include_restricted};
pub use ints::int_64bit;
pub use maps::{map_key_type, map_value_type};
pub use names::names_reserved;
pub use namespaces::namespace_pattern;
pub use sets::set_value_type;
pub use types::types_disallowed;
pub use unions::union;
