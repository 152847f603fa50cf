//! File exclusion keeps the file table stable.

use quell_conformance::{bundle, diagnostic, event, location, Fixture};
use quell_config::SkipList;
use quell_report::{filter_bundle, skip_reports_in_file, Bundle};
use quell_source::FileIndex;
use serde_json::json;

fn two_file_bundle() -> serde_json::Value {
    bundle(
        &["a.c", "b.c"],
        vec![
            diagnostic(vec![event(0, 1, 1, "in a")], Some("x.A"), Some("ha")),
            diagnostic(vec![event(1, 1, 1, "in b")], Some("x.B"), Some("hb")),
        ],
    )
}

#[test]
fn excluding_one_file_keeps_other_and_table() {
    let mut b = Bundle::from_json_str(&two_file_bundle().to_string(), "t").unwrap();
    let outcome = filter_bundle(&mut b, &|p: &str| p == "b.c");

    assert_eq!(b.diagnostics.len(), 1);
    assert_eq!(b.diagnostics[0].checker_name.as_deref(), Some("x.A"));
    assert_eq!(b.files.len(), 2);
    assert_eq!(b.files.get(FileIndex::from_raw(0)), Some("a.c"));
    assert_eq!(b.files.get(FileIndex::from_raw(1)), Some("b.c"));
    assert_eq!(outcome.removed, 1);
}

#[test]
fn exclusion_ignores_range_and_edge_only_files() {
    let mut step = event(0, 2, 1, "in a");
    step["ranges"] = json!([[location(1, 5, 1), location(1, 5, 9)]]);
    let control = json!({
        "kind": "control",
        "edges": [{"start": [location(2, 1, 1)], "end": [location(0, 2, 1)]}]
    });
    let doc = bundle(
        &["a.c", "b.c", "c.c"],
        vec![diagnostic(vec![control, step], Some("x.A"), Some("h"))],
    );
    let mut b = Bundle::from_json_str(&doc.to_string(), "t").unwrap();
    let outcome = filter_bundle(&mut b, &|p: &str| p != "a.c");

    assert_eq!(b.diagnostics.len(), 1);
    assert_eq!(b.files.len(), 3);
    assert_eq!(outcome.referenced_files.len(), 3);
}

#[test]
fn skip_list_filters_bundle_file_in_place() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = Fixture::new(tmp.path());
    let path = fx.bundle("r.json", &two_file_bundle());

    let list = SkipList::parse(&["-b.c"]).unwrap();
    skip_reports_in_file(&path, &list).unwrap();

    let after = fx.read_json(&path);
    assert_eq!(after["files"], json!(["a.c", "b.c"]));
    assert_eq!(after["diagnostics"].as_array().unwrap().len(), 1);
    assert_eq!(after["metadata"]["analyzer"]["name"], json!("clangsa"));
}

#[test]
fn malformed_bundle_file_is_left_alone() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = Fixture::new(tmp.path());
    let path = fx.write("r.json", "{\"files\": [");

    let list = SkipList::parse(&["-*"]).unwrap();
    skip_reports_in_file(&path, &list).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"files\": [");
}
