use dir_test::{dir_test, Fixture};
use navdoc_engine::{serialize, Collector, RawDecl};
use test_utils::snap_test;

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/tests/fixtures",
    glob: "*.json",
)]
fn collect_and_serialize(fixture: Fixture<&str>) {
    let decls: Vec<RawDecl> =
        serde_json::from_str(fixture.content()).expect("fixture is a JSON array of declarations");

    let outcome = Collector::new().collect(decls);
    let batch = serialize::serialize_all(&outcome.index);
    assert!(batch.failures.is_empty());

    let mut output = batch.json;
    if !outcome.warnings.is_empty() {
        output.push_str("\n\nwarnings:");
        for warning in &outcome.warnings {
            output.push_str(&format!("\n- {warning}"));
        }
    }

    snap_test!(output, fixture.path());
}
