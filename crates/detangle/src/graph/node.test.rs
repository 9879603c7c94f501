// Tests for the declared node data model

use super::*;

#[test]
fn test_default_spec_declares_nothing() {
    let spec = NodeSpec::new();
    assert!(spec.depends_on.is_none());
    assert!(spec.required_by.is_none());
}

#[test]
fn test_builder_sets_both_fields() {
    let spec = NodeSpec::new()
        .with_depends_on(DependencySet::names(["a", "b"]))
        .with_required_by(DependencySet::AllOthers);

    assert_eq!(
        spec.depends_on,
        Some(DependencySet::Names(vec!["a".to_string(), "b".to_string()]))
    );
    assert!(spec.required_by.is_some_and(|s| s.is_wildcard()));
}

#[test]
fn test_deserialize_name_list_from_json() {
    let spec: NodeSpec = serde_json::from_str(r#"{"depends_on": ["x", "y"]}"#).unwrap();
    assert_eq!(spec.depends_on, Some(DependencySet::names(["x", "y"])));
    assert!(spec.required_by.is_none());
}

#[test]
fn test_deserialize_wildcard_token_from_json() {
    let spec: NodeSpec = serde_json::from_str(r#"{"required_by": "*"}"#).unwrap();
    assert_eq!(spec.required_by, Some(DependencySet::AllOthers));
}

#[test]
fn test_deserialize_rejects_non_wildcard_string() {
    let result: Result<NodeSpec, _> = serde_json::from_str(r#"{"depends_on": "everything"}"#);
    assert!(result.is_err());
}

#[test]
fn test_deserialize_from_yaml() {
    let spec: NodeSpec = serde_saphyr::from_str(
        "depends_on:\n  - base\n  - config\nrequired_by: \"*\"\n",
    )
    .unwrap();
    assert_eq!(spec.depends_on, Some(DependencySet::names(["base", "config"])));
    assert_eq!(spec.required_by, Some(DependencySet::AllOthers));
}

#[test]
fn test_serialize_wildcard_as_token() {
    let spec = NodeSpec::new().with_depends_on(DependencySet::AllOthers);
    let json = serde_json::to_string(&spec).unwrap();
    assert_eq!(json, r#"{"depends_on":"*"}"#);
}

#[test]
fn test_serialize_skips_absent_fields() {
    let json = serde_json::to_string(&NodeSpec::new()).unwrap();
    assert_eq!(json, "{}");
}

#[test]
fn test_manifest_preserves_document_order() {
    let manifest: Manifest = serde_json::from_str(
        r#"{"zebra": {}, "apple": {"depends_on": ["zebra"]}, "mango": {}}"#,
    )
    .unwrap();

    let names: Vec<&str> = manifest.0.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["zebra", "apple", "mango"]);
    assert_eq!(manifest.len(), 3);
}

#[test]
fn test_manifest_from_yaml_with_wildcard() {
    let manifest: Manifest = serde_saphyr::from_str(
        "bootstrap:\n  required_by: \"*\"\nservice: {}\n",
    )
    .unwrap();

    assert_eq!(
        manifest.0,
        vec![
            (
                "bootstrap".to_string(),
                NodeSpec::new().with_required_by(DependencySet::AllOthers),
            ),
            ("service".to_string(), NodeSpec::new()),
        ]
    );
}
