//! Integration tests for manifest deserialization and error reporting
//!
//! Tests resolution driven by JSON and YAML manifests:
//! - Document order survives deserialization and breaks ties
//! - Wildcard declarations behave across formats
//! - Unsatisfiable graphs surface diagnosable, stable errors

use anyhow::Result;
use detangle::ResolveError;
use detangle_tests::{init_tracing, load_json_manifest, load_yaml_manifest};

#[test]
fn test_json_manifest_resolves_with_declaration_tiebreak() -> Result<()> {
    init_tracing();
    let mut resolver = load_json_manifest(
        r#"{
            "a": {},
            "b": {"depends_on": ["d", "c"]},
            "c": {},
            "d": {"depends_on": ["a"]}
        }"#,
    )?;

    let order: Vec<String> = resolver.solve()?.map(str::to_string).collect();
    assert_eq!(order, ["a", "c", "d", "b"]);
    Ok(())
}

#[test]
fn test_wildcard_teardown_node_orders_last() -> Result<()> {
    init_tracing();
    let mut resolver = load_yaml_manifest(
        "finalizer:\n  depends_on: \"*\"\nsetup: {}\npayload:\n  depends_on: [setup]\n",
    )?;

    let order: Vec<String> = resolver.solve()?.map(str::to_string).collect();
    assert_eq!(order, ["setup", "payload", "finalizer"]);
    Ok(())
}

#[test]
fn test_cycle_reports_the_unsatisfiable_set() -> Result<()> {
    init_tracing();
    let mut resolver = load_json_manifest(
        r#"{
            "a": {},
            "b": {"depends_on": ["d", "c"]},
            "c": {"depends_on": ["b"]},
            "d": {"depends_on": ["b"]}
        }"#,
    )?;

    let err = resolver.solve().err().expect("cycle should fail resolution");
    assert_eq!(
        err,
        ResolveError::CircularDependency {
            names: vec!["b".to_string(), "c".to_string(), "d".to_string()],
        }
    );
    // The message carries the unsatisfiable set for operator reports.
    assert!(err.to_string().contains("b, c, d"));
    Ok(())
}

#[test]
fn test_missing_reference_names_the_declaring_node() -> Result<()> {
    init_tracing();
    let mut resolver = load_yaml_manifest(
        "a:\n  depends_on: [b]\nb:\n  depends_on: [invalid]\n",
    )?;

    let err = resolver.solve().err().expect("missing reference should fail");
    assert_eq!(
        err,
        ResolveError::UnresolvableDependency {
            node: "b".to_string(),
            missing: vec!["invalid".to_string()],
        }
    );
    assert!(err.to_string().contains("invalid"));
    Ok(())
}

#[test]
fn test_same_graph_resolves_identically_across_formats() -> Result<()> {
    init_tracing();
    let mut from_yaml = load_yaml_manifest(
        "core:\n  required_by: \"*\"\ntools:\n  depends_on: [core]\ndocs: {}\n",
    )?;
    let mut from_json = load_json_manifest(
        r#"{"core": {"required_by": "*"}, "tools": {"depends_on": ["core"]}, "docs": {}}"#,
    )?;

    let yaml_order: Vec<String> = from_yaml.solve()?.map(str::to_string).collect();
    let json_order: Vec<String> = from_json.solve()?.map(str::to_string).collect();
    assert_eq!(yaml_order, json_order);
    assert_eq!(yaml_order, ["core", "tools", "docs"]);
    Ok(())
}
