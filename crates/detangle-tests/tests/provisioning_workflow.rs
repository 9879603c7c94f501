//! Integration tests for the full provision-from-manifest workflow
//!
//! Tests the complete consumption protocol:
//! - Load an ordered YAML manifest
//! - Resolve it into a processing order
//! - Pop each node as it is "processed" and re-query the shrinking order

use anyhow::Result;
use detangle_tests::{init_tracing, load_yaml_manifest};

const PROVISION_MANIFEST: &str = r#"
webserver:
  depends_on: [runtime, certificates]
database:
  depends_on: [runtime]
runtime: {}
certificates:
  depends_on: [runtime]
migrations:
  depends_on: [database]
monitoring:
  required_by: "*"
"#;

/// Test: resolve a realistic provisioning manifest
///
/// Workflow:
/// 1. Parse the manifest in document order
/// 2. Resolve; monitoring is required by everything and must come first
/// 3. Every node's dependencies appear before it
#[test]
fn test_provision_manifest_resolves_in_dependency_order() -> Result<()> {
    init_tracing();
    let mut resolver = load_yaml_manifest(PROVISION_MANIFEST)?;

    let order: Vec<String> = resolver.solve()?.map(str::to_string).collect();
    assert_eq!(order.first().map(String::as_str), Some("monitoring"));

    for name in &order {
        let position = order.iter().position(|n| n == name).unwrap();
        for dep in resolver.dependencies_of(name)? {
            let dep_position = order.iter().position(|n| n == dep).unwrap();
            assert!(dep_position < position, "{dep} must precede {name}");
        }
    }
    Ok(())
}

/// Test: pop-and-re-solve consumption loop
///
/// Workflow:
/// 1. Resolve the manifest
/// 2. Repeatedly take the first remaining name, "apply" it, pop it
/// 3. Each re-solve reflects the shrinking graph; the loop drains everything
#[test]
fn test_consumption_loop_drains_the_graph() -> Result<()> {
    init_tracing();
    let mut resolver = load_yaml_manifest(PROVISION_MANIFEST)?;
    let total = resolver.len();

    let mut applied = Vec::new();
    loop {
        let Some(next) = resolver.solve()?.next().map(str::to_string) else {
            break;
        };
        applied.push(next.clone());
        resolver.pop(&next)?;
        assert_eq!(resolver.len(), total - applied.len());
    }

    assert_eq!(applied.len(), total);
    assert!(resolver.is_empty());
    assert_eq!(resolver.solve()?.count(), 0);
    Ok(())
}

/// Test: partial consumption keeps the remainder stable
#[test]
fn test_remaining_order_is_a_suffix_of_the_original() -> Result<()> {
    init_tracing();
    let mut resolver = load_yaml_manifest(PROVISION_MANIFEST)?;

    let full: Vec<String> = resolver.solve()?.map(str::to_string).collect();
    for name in &full[..3] {
        resolver.pop(name)?;
    }

    let remaining: Vec<String> = resolver.solve()?.map(str::to_string).collect();
    assert_eq!(remaining, full[3..]);
    Ok(())
}
