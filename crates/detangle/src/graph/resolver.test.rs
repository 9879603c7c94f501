// Tests for dependency graph resolution

use super::*;

// ============================================================================
// Test Utilities
// ============================================================================

fn resolver(nodes: &[(&str, NodeSpec)]) -> Resolver {
    Resolver::new(nodes.iter().map(|(name, spec)| (*name, spec.clone())))
}

fn deps(names: &[&str]) -> NodeSpec {
    NodeSpec::new().with_depends_on(DependencySet::names(names.iter().copied()))
}

fn required_by(names: &[&str]) -> NodeSpec {
    NodeSpec::new().with_required_by(DependencySet::names(names.iter().copied()))
}

fn solve_names(resolver: &mut Resolver) -> Vec<String> {
    resolver
        .solve()
        .expect("graph should resolve")
        .map(str::to_string)
        .collect()
}

fn solve_err(resolver: &mut Resolver) -> ResolveError {
    resolver.solve().err().expect("resolution should fail")
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_invert_reverse_dependencies() {
    let mut r = resolver(&[
        ("a", deps(&["b"])),
        ("b", deps(&["c"])),
        ("c", required_by(&["a"])),
        ("d", deps(&["c"]).with_required_by(DependencySet::names(["a", "b"]))),
    ]);
    r.normalize();

    assert_eq!(r.dependencies_of("a").unwrap(), ["b", "c", "d"]);
    assert_eq!(r.dependencies_of("b").unwrap(), ["c", "d"]);
    assert!(r.dependencies_of("c").unwrap().is_empty());
    assert_eq!(r.dependencies_of("d").unwrap(), ["c"]);
    assert!(r.graph.node_weights().all(|node| node.required_by.is_none()));
}

#[test]
fn test_required_by_is_equivalent_to_inverted_depends_on() {
    let mut declared_forward = resolver(&[("x", NodeSpec::new()), ("y", deps(&["x"]))]);
    let mut declared_inverse = resolver(&[("x", required_by(&["y"])), ("y", NodeSpec::new())]);

    assert_eq!(solve_names(&mut declared_forward), solve_names(&mut declared_inverse));
    assert_eq!(declared_inverse.dependencies_of("y").unwrap(), ["x"]);
}

#[test]
fn test_normalization_is_idempotent_across_solve_calls() {
    let mut r = resolver(&[("a", required_by(&["b"])), ("b", NodeSpec::new())]);
    assert_eq!(solve_names(&mut r), ["a", "b"]);
    // A second solve must not re-invert and double the edge list.
    assert_eq!(solve_names(&mut r), ["a", "b"]);
    assert_eq!(r.dependencies_of("b").unwrap(), ["a"]);
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_order_simple() {
    let mut r = resolver(&[
        ("a", NodeSpec::new()),
        ("b", deps(&["d", "c"])),
        ("c", NodeSpec::new()),
        ("d", deps(&["a"])),
    ]);
    assert_eq!(solve_names(&mut r), ["a", "c", "d", "b"]);
}

#[test]
fn test_order_overlapping_dependencies() {
    let mut r = resolver(&[
        ("a", deps(&["c"])),
        ("b", deps(&["a", "c"])),
        ("c", NodeSpec::new()),
    ]);
    assert_eq!(solve_names(&mut r), ["c", "a", "b"]);
}

#[test]
fn test_order_multiple_deps_when_one_is_met_already() {
    let mut r = resolver(&[
        ("a", deps(&["b", "c"])),
        ("b", deps(&["c"])),
        ("c", NodeSpec::new()),
    ]);
    assert_eq!(solve_names(&mut r), ["c", "b", "a"]);
}

#[test]
fn test_independent_nodes_keep_declaration_order() {
    let mut r = resolver(&[
        ("gamma", NodeSpec::new()),
        ("alpha", NodeSpec::new()),
        ("beta", NodeSpec::new()),
    ]);
    assert_eq!(solve_names(&mut r), ["gamma", "alpha", "beta"]);
}

#[test]
fn test_every_dependency_precedes_its_dependent() {
    let mut r = resolver(&[
        ("app", deps(&["lib", "config"])),
        ("lib", deps(&["base"])),
        ("config", deps(&["base"])),
        ("base", NodeSpec::new()),
        ("extras", required_by(&["app"])),
    ]);
    let order = solve_names(&mut r);
    for node in ["app", "lib", "config", "base", "extras"] {
        let position = order.iter().position(|n| n == node).unwrap();
        for dep in r.dependencies_of(node).unwrap() {
            let dep_position = order.iter().position(|n| n == dep).unwrap();
            assert!(
                dep_position < position,
                "{dep} must precede {node} in {order:?}"
            );
        }
    }
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn test_circular_dependency() {
    let mut r = resolver(&[
        ("a", NodeSpec::new()),
        ("b", deps(&["d", "c"])),
        ("c", deps(&["b"])),
        ("d", deps(&["b"])),
    ]);
    assert_eq!(
        solve_err(&mut r),
        ResolveError::CircularDependency {
            names: vec!["b".to_string(), "c".to_string(), "d".to_string()],
        }
    );
}

#[test]
fn test_missing_dependency() {
    let mut r = resolver(&[("a", deps(&["b"])), ("b", deps(&["invalid"]))]);
    assert_eq!(
        solve_err(&mut r),
        ResolveError::UnresolvableDependency {
            node: "b".to_string(),
            missing: vec!["invalid".to_string()],
        }
    );
}

#[test]
fn test_required_by_naming_unknown_node() {
    let mut r = resolver(&[("a", NodeSpec::new()), ("c", required_by(&["ghost"]))]);
    assert_eq!(
        solve_err(&mut r),
        ResolveError::UnresolvableDependency {
            node: "c".to_string(),
            missing: vec!["ghost".to_string()],
        }
    );
}

#[test]
fn test_failed_resolution_repeats_on_every_solve() {
    let mut r = resolver(&[("a", deps(&["b"])), ("b", deps(&["a"]))]);
    let first = solve_err(&mut r);
    let second = solve_err(&mut r);
    assert_eq!(first, second);
}

// ============================================================================
// Wildcards
// ============================================================================

#[test]
fn test_required_by_all() {
    let mut r = resolver(&[
        ("a", NodeSpec::new()),
        ("b", NodeSpec::new()),
        ("c", NodeSpec::new().with_required_by(DependencySet::AllOthers)),
    ]);
    assert_eq!(solve_names(&mut r), ["c", "a", "b"]);
}

#[test]
fn test_required_by_all_multiple() {
    let mut r = resolver(&[
        ("a", NodeSpec::new()),
        ("b", NodeSpec::new().with_required_by(DependencySet::AllOthers)),
        ("c", NodeSpec::new().with_required_by(DependencySet::AllOthers)),
    ]);
    // b's wildcard expands first and cannot see c, which still holds its own
    // unexpanded wildcard; c's expansion then sees b. Hence c before b.
    assert_eq!(solve_names(&mut r), ["c", "b", "a"]);
}

#[test]
fn test_depends_on_all() {
    let mut r = resolver(&[
        ("a", NodeSpec::new().with_depends_on(DependencySet::AllOthers)),
        ("b", NodeSpec::new()),
        ("c", NodeSpec::new()),
    ]);
    assert_eq!(solve_names(&mut r), ["b", "c", "a"]);
}

#[test]
fn test_depends_on_all_multiple() {
    let mut r = resolver(&[
        ("a", NodeSpec::new().with_depends_on(DependencySet::AllOthers)),
        ("b", NodeSpec::new().with_depends_on(DependencySet::AllOthers)),
        ("c", NodeSpec::new()),
    ]);
    // Mutual exemption while both wildcards are unexpanded; b's later
    // expansion sees a, so a orders first.
    assert_eq!(solve_names(&mut r), ["c", "a", "b"]);
}

#[test]
fn test_wildcard_on_sole_node_expands_to_nothing() {
    let mut r = resolver(&[("only", NodeSpec::new().with_depends_on(DependencySet::AllOthers))]);
    assert_eq!(solve_names(&mut r), ["only"]);
}

#[test]
fn test_mixed_wildcard_fields() {
    let mut r = resolver(&[
        ("a", NodeSpec::new().with_depends_on(DependencySet::AllOthers)),
        ("b", NodeSpec::new().with_required_by(DependencySet::AllOthers)),
    ]);
    // a's expansion skips b (unexpanded wildcard); b's inversion then makes
    // a depend on b. Declaration order decides, no manufactured cycle.
    assert_eq!(solve_names(&mut r), ["b", "a"]);
}

// ============================================================================
// Consumption
// ============================================================================

#[test]
fn test_pop_node() {
    let mut r = resolver(&[
        ("a", NodeSpec::new()),
        ("b", NodeSpec::new()),
        ("c", NodeSpec::new()),
    ]);
    assert_eq!(solve_names(&mut r), ["a", "b", "c"]);
    r.pop("a").unwrap();
    assert_eq!(solve_names(&mut r), ["b", "c"]);
    r.pop("b").unwrap();
    assert_eq!(solve_names(&mut r), ["c"]);
    r.pop("c").unwrap();
    assert!(solve_names(&mut r).is_empty());
    assert!(r.is_empty());
}

#[test]
fn test_pop_every_yielded_node_in_order() {
    let mut r = resolver(&[
        ("app", deps(&["lib"])),
        ("lib", deps(&["base"])),
        ("base", NodeSpec::new()),
    ]);
    loop {
        let Some(next) = r.solve().unwrap().next().map(str::to_string) else {
            break;
        };
        r.pop(&next).unwrap();
    }
    assert!(r.is_empty());
}

#[test]
fn test_pop_unknown_node_is_an_error() {
    let mut r = resolver(&[("a", NodeSpec::new())]);
    assert_eq!(
        r.pop("nope"),
        Err(ResolveError::UnknownNode {
            name: "nope".to_string(),
        })
    );
}

// ============================================================================
// Construction and accessors
// ============================================================================

#[test]
fn test_empty_resolver_solves_to_empty() {
    let mut r = Resolver::default();
    assert!(r.is_empty());
    assert!(solve_names(&mut r).is_empty());
}

#[test]
fn test_duplicate_declaration_is_ignored() {
    let mut r = resolver(&[("a", deps(&["b"])), ("b", NodeSpec::new()), ("a", NodeSpec::new())]);
    assert_eq!(r.len(), 2);
    // First declaration wins.
    assert_eq!(r.dependencies_of("a").unwrap(), ["b"]);
    assert_eq!(solve_names(&mut r), ["b", "a"]);
}

#[test]
fn test_names_iterates_in_insertion_order() {
    let r = resolver(&[("z", NodeSpec::new()), ("m", NodeSpec::new()), ("a", NodeSpec::new())]);
    assert_eq!(r.names().collect::<Vec<_>>(), ["z", "m", "a"]);
    assert!(r.contains("m"));
    assert!(!r.contains("q"));
}

#[test]
fn test_dependents_of_after_solve() {
    let mut r = resolver(&[
        ("base", NodeSpec::new()),
        ("lib", deps(&["base"])),
        ("app", deps(&["base", "lib"])),
    ]);
    solve_names(&mut r);
    let mut dependents = r.dependents_of("base").unwrap();
    dependents.sort_unstable();
    assert_eq!(dependents, ["app", "lib"]);
    assert!(r.dependents_of("app").unwrap().is_empty());
    assert_eq!(r.edge_count(), 3);
}

#[test]
fn test_unknown_node_lookups_error() {
    let r = resolver(&[("a", NodeSpec::new())]);
    assert!(matches!(
        r.dependencies_of("ghost"),
        Err(ResolveError::UnknownNode { .. })
    ));
    assert!(matches!(
        r.dependents_of("ghost"),
        Err(ResolveError::UnknownNode { .. })
    ));
}
