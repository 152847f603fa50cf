//! Suppression store policy and inline marker promotion.

use quell_conformance::{bundle, diagnostic, event, render, Fixture};
use quell_render::{Formatter, SeverityMap};
use quell_report::BundleParser;
use quell_suppress::{SuppressError, SuppressionStore};

#[test]
fn matching_is_basename_scoped() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = Fixture::new(tmp.path());
    let file = fx.write("quell.suppress", "H||a.c||\n");

    let store = SuppressionStore::new(Some(file), false).unwrap();
    assert!(store.is_suppressed("H", "/x/a.c"));
    assert!(store.is_suppressed("H", "/y/a.c"));
    assert!(!store.is_suppressed("H", "/x/b.c"));
}

#[test]
fn writable_store_requires_backing_file() {
    assert!(matches!(
        SuppressionStore::new(None, true),
        Err(SuppressError::MissingBackingFile)
    ));
}

#[test]
fn corrupt_store_is_a_hard_error() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = Fixture::new(tmp.path());
    let file = fx.write("quell.suppress", "H||a.c||ok\nbroken\n");
    assert!(matches!(
        SuppressionStore::new(Some(file), false),
        Err(SuppressError::Corrupt { line: 2, .. })
    ));
}

#[test]
fn inline_marker_suppresses_and_is_promoted() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = Fixture::new(tmp.path());
    let src = fx.write(
        "src/div.c",
        "int f(int y) {\n  // quell_suppress [core.DivideZero] y checked by caller\n  return 1 / y;\n}\n",
    );
    let doc = bundle(
        &[src.to_str().unwrap()],
        vec![diagnostic(
            vec![event(0, 3, 12, "Division by zero")],
            Some("core.DivideZero"),
            Some("d1v"),
        )],
    );
    let bundle_path = fx.bundle("div.c.json", &doc);
    let suppress_path = fx.root().join("quell.suppress");

    let store = SuppressionStore::new(Some(suppress_path.clone()), true).unwrap();
    let mut formatter = Formatter::new(SeverityMap::new()).with_suppressions(store);
    let (out, result) = render(&mut formatter, &bundle_path, None);

    let stats = result.unwrap();
    assert_eq!(out, "Found no defects while analyzing\n");
    assert_eq!(stats.report_count(), 0);

    let store = formatter.suppressions().unwrap();
    assert!(store.is_suppressed("d1v", src.to_str().unwrap()));
    assert_eq!(
        std::fs::read_to_string(&suppress_path).unwrap(),
        "d1v||div.c||y checked by caller\n"
    );

    // A fresh run consults the promoted record before looking at the source.
    let reopened = SuppressionStore::new(Some(suppress_path), false).unwrap();
    assert!(reopened.is_suppressed("d1v", "/elsewhere/div.c"));
}

#[test]
fn marker_does_not_reach_past_a_dereference_statement() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = Fixture::new(tmp.path());
    let src = fx.write(
        "src/ptr.c",
        "void f(int *p, int *q) {\n  // quell_suppress [core.NullDereference] p checked\n  *p = 1;\n  *q = 2;\n}\n",
    );
    let doc = bundle(
        &[src.to_str().unwrap()],
        vec![diagnostic(
            vec![event(0, 4, 3, "Dereference of null pointer")],
            Some("core.NullDereference"),
            Some("hq"),
        )],
    );
    let bundle_path = fx.bundle("ptr.c.json", &doc);
    let suppress_path = fx.root().join("quell.suppress");

    let store = SuppressionStore::new(Some(suppress_path.clone()), true).unwrap();
    let mut formatter = Formatter::new(SeverityMap::new()).with_suppressions(store);
    let (out, result) = render(&mut formatter, &bundle_path, None);

    assert_eq!(result.unwrap().report_count(), 1);
    assert!(out.contains("[core.NullDereference]"));
    assert!(!suppress_path.exists());
}

#[test]
fn inline_marker_for_other_checker_is_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = Fixture::new(tmp.path());
    let src = fx.write(
        "src/div.c",
        "int f(int y) {\n  return 1 / y; // quell_suppress [deadcode.DeadStores]\n}\n",
    );
    let doc = bundle(
        &[src.to_str().unwrap()],
        vec![diagnostic(
            vec![event(0, 2, 12, "Division by zero")],
            Some("core.DivideZero"),
            Some("d1v"),
        )],
    );
    let bundle_path = fx.bundle("div.c.json", &doc);

    let mut formatter = Formatter::new(SeverityMap::new())
        .with_parser(BundleParser::new().allow_rewrite(false));
    let (out, result) = render(&mut formatter, &bundle_path, None);
    assert_eq!(result.unwrap().report_count(), 1);
    assert!(out.contains("[core.DivideZero]"));
}

#[test]
fn read_only_store_drops_inline_suppressed_without_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = Fixture::new(tmp.path());
    let src = fx.write("a.c", "x = 1 / y; // quell_suppress [all]\n");
    let doc = bundle(
        &[src.to_str().unwrap()],
        vec![diagnostic(vec![event(0, 1, 7, "Division by zero")], Some("c"), Some("h"))],
    );
    let bundle_path = fx.bundle("a.c.json", &doc);
    let suppress_path = fx.write("quell.suppress", "");

    let store = SuppressionStore::new(Some(suppress_path.clone()), false).unwrap();
    let mut formatter = Formatter::new(SeverityMap::new()).with_suppressions(store);
    let (_, result) = render(&mut formatter, &bundle_path, None);

    assert_eq!(result.unwrap().report_count(), 0);
    assert_eq!(std::fs::read_to_string(&suppress_path).unwrap(), "");
}
