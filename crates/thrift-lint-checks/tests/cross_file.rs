//! Integration test: cross-file resolution end-to-end via Linter.
//!
//! Writes multi-file Thrift trees into a temp directory and verifies that
//! checks which depend on the resolver (constants, depth, includes) behave
//! across document boundaries.

use std::path::PathBuf;

use thrift_lint_checks::{constant_ref, depth, include_cycle, include_path, map_key_type};
use thrift_lint_core::{Checks, Linter, Severity};

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("fixture write should succeed");
    path
}

#[test]
fn constants_resolve_across_includes() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "shared.thrift",
        "enum Level { LOW = 1, HIGH = 2 }\nconst i32 RETRIES = 3",
    );
    let main = write(
        &dir,
        "main.thrift",
        r#"
        include "shared.thrift"
        const Level DEFAULT = shared.Level.LOW
        const i32 COUNT = shared.RETRIES
        const i32 BAD = shared.Missing
        "#,
    );

    let linter = Linter::new([constant_ref()].into_iter().collect());
    let messages = linter.lint_files(&[&main]).unwrap();
    assert_eq!(messages.len(), 1);
    let m = messages.iter().next().unwrap();
    assert!(m.message.contains("shared.Missing"));
}

#[test]
fn map_keys_resolve_through_included_typedefs() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "shared.thrift",
        "typedef string Name\nstruct Blob {}",
    );
    let main = write(
        &dir,
        "main.thrift",
        r#"
        include "shared.thrift"
        struct T {
            1: map<shared.Name, i32> ok
            2: map<shared.Blob, i32> bad
        }
        "#,
    );

    let linter = Linter::new([map_key_type()].into_iter().collect());
    let messages = linter.lint_files(&[&main]).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages.iter().next().unwrap().line, 5);
}

#[test]
fn depth_follows_structs_across_files() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "inner.thrift",
        "struct Inner { 1: list<string> items }",
    );
    let main = write(
        &dir,
        "outer.thrift",
        "include \"inner.thrift\"\nstruct Outer { 1: inner.Inner i }",
    );

    // Outer(1) -> Inner(2) -> string inside the list (cumulative 3)
    let strict = Linter::new([depth(Some(2), true)].into_iter().collect());
    let messages = strict.lint_files(&[&main]).unwrap();
    assert_eq!(messages.len(), 1);
    let m = messages.iter().next().unwrap();
    assert_eq!(m.severity, Severity::Error);
    assert!(m.message.contains("Outer exceeded maximum depth of 2"));
    assert!(m.message.contains("inner.thrift"));

    let relaxed = Linter::new([depth(Some(3), true)].into_iter().collect());
    assert!(relaxed.lint_files(&[&main]).unwrap().is_empty());
}

#[test]
fn cross_file_struct_cycle_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "a.thrift",
        "include \"b.thrift\"\nstruct A { 1: b.B other }",
    );
    let b = write(
        &dir,
        "b.thrift",
        "include \"a.thrift\"\nstruct B { 1: a.A other }",
    );

    let linter = Linter::new([depth(None, false)].into_iter().collect());
    let messages = linter.lint_files(&[&b]).unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages.iter().next().unwrap().message.contains("led to a cycle"));
}

#[test]
fn include_checks_share_one_run() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "a.thrift", "include \"b.thrift\"\nstruct A {}");
    let b = write(&dir, "b.thrift", "include \"a.thrift\"\nstruct B {}");

    let checks: Checks = [include_path(), include_cycle()].into_iter().collect();
    let linter = Linter::new(checks);
    let messages = linter.lint_files(&[&a, &b]).unwrap();

    // Both includes resolve; only the cycle fires, once, on b's pass.
    assert_eq!(messages.len(), 1);
    let m = messages.iter().next().unwrap();
    assert_eq!(m.check, "include.cycle");
    assert!(m.filename.ends_with("b.thrift"));
}
