//! Dependency graph resolution with wildcard expansion and deterministic ordering
//!
//! This module owns the resolution pipeline: declared relationships are
//! normalized (`required_by` inverted into `depends_on`, wildcards expanded),
//! then ordered with a stable repeated-scan pass so that every node appears
//! after all of its dependencies, with ties broken by declaration order.
//! Callers consume the result incrementally: `solve` yields the remaining
//! names in order and `pop` retires a node once it has been processed.

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, trace};

use super::node::{DependencySet, NodeSpec};

/// Errors that can occur during dependency resolution
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Circular dependency detected among: {}", .names.join(", "))]
    CircularDependency { names: Vec<String> },

    #[error("Unresolvable dependency: {node} references missing {}", .missing.join(", "))]
    UnresolvableDependency { node: String, missing: Vec<String> },

    #[error("Node not found: {name}")]
    UnknownNode { name: String },
}

/// Resolution pipeline phases. There is no way back: once ordered, the graph
/// only shrinks through `pop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Declared,
    Normalized,
    Ordered,
}

/// A node and its (progressively normalized) relationship declarations.
#[derive(Debug)]
struct Node {
    name: String,
    depends_on: Option<DependencySet>,
    required_by: Option<DependencySet>,
}

/// Dependency graph resolver.
///
/// Owns the node map outright; the caller hands over an insertion-ordered
/// sequence of `(name, NodeSpec)` pairs and reads results back through
/// [`Resolver::solve`] and the read-only accessors. Insertion order is
/// significant: it is the tie-break for the resolved order and the basis for
/// wildcard expansion.
#[derive(Debug)]
pub struct Resolver {
    /// Directed graph: nodes = named units, edges = dependency → dependent.
    graph: StableDiGraph<Node, ()>,
    /// Map from node name to stable index for fast lookup.
    node_map: HashMap<String, NodeIndex>,
    /// `required_by` declarations naming nodes absent from the graph.
    /// Normalization cannot invert these; ordering diagnoses them.
    orphans: HashMap<NodeIndex, Vec<String>>,
    /// Resolved order, valid in `Phase::Ordered`.
    order: Vec<NodeIndex>,
    phase: Phase,
}

impl Resolver {
    /// Create a resolver over the given nodes. No validation happens here;
    /// malformed graphs fail when ordering first runs.
    pub fn new<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = (S, NodeSpec)>,
        S: Into<String>,
    {
        let mut resolver = Self {
            graph: StableDiGraph::new(),
            node_map: HashMap::new(),
            orphans: HashMap::new(),
            order: Vec::new(),
            phase: Phase::Declared,
        };
        for (name, spec) in nodes {
            resolver.insert(name.into(), spec);
        }
        resolver
    }

    /// Add a node (idempotent - a duplicate declaration is dropped).
    fn insert(&mut self, name: String, spec: NodeSpec) {
        if self.node_map.contains_key(&name) {
            trace!("Node already declared, ignoring duplicate: {}", name);
            return;
        }
        let idx = self.graph.add_node(Node {
            name: name.clone(),
            depends_on: spec.depends_on,
            required_by: spec.required_by,
        });
        self.node_map.insert(name, idx);
    }

    /// Number of nodes remaining in the graph.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Check if a node exists in the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Remaining node names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|node| node.name.as_str())
    }

    /// Number of materialized dependency edges (zero until ordering runs).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Normalized dependency list of a node.
    ///
    /// Values are final once [`Resolver::solve`] has succeeded; before that
    /// they reflect the declarations as written (an unexpanded wildcard reads
    /// as empty).
    pub fn dependencies_of(&self, name: &str) -> Result<&[String], ResolveError> {
        let idx = self.index_of(name)?;
        Ok(match &self.graph[idx].depends_on {
            Some(DependencySet::Names(names)) => names.as_slice(),
            _ => &[],
        })
    }

    /// Nodes that depend on the named node (reverse edges). Useful for
    /// orphan detection; populated once ordering has run.
    pub fn dependents_of(&self, name: &str) -> Result<Vec<&str>, ResolveError> {
        let idx = self.index_of(name)?;
        Ok(self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|dep| self.graph[dep].name.as_str())
            .collect())
    }

    /// Resolve the graph (first call only; later calls reuse the result) and
    /// return the remaining node names in processing order.
    ///
    /// The iterator is lazy and restartable: each call reflects the current
    /// graph, so the sequence shrinks as nodes are [`Resolver::pop`]ped.
    /// A failed resolution leaves the graph untouched and is re-derived, and
    /// re-reported, on every subsequent call.
    pub fn solve(&mut self) -> Result<impl Iterator<Item = &str> + '_, ResolveError> {
        self.ensure_solved()?;
        Ok(self.order.iter().map(|&idx| self.graph[idx].name.as_str()))
    }

    /// Permanently remove a node, normally one just yielded by
    /// [`Resolver::solve`]. Remaining edges are not re-validated; popping
    /// out of resolved order is the caller's responsibility.
    ///
    /// Popping a name absent from the graph is an error.
    pub fn pop(&mut self, name: &str) -> Result<(), ResolveError> {
        let idx = self
            .node_map
            .remove(name)
            .ok_or_else(|| ResolveError::UnknownNode {
                name: name.to_string(),
            })?;
        self.graph.remove_node(idx);
        self.order.retain(|&o| o != idx);
        trace!(node = name, remaining = self.graph.node_count(), "Popped node");
        Ok(())
    }

    fn index_of(&self, name: &str) -> Result<NodeIndex, ResolveError> {
        self.node_map
            .get(name)
            .copied()
            .ok_or_else(|| ResolveError::UnknownNode {
                name: name.to_string(),
            })
    }

    fn ensure_solved(&mut self) -> Result<(), ResolveError> {
        if self.phase == Phase::Declared {
            self.normalize();
        }
        if self.phase == Phase::Normalized {
            self.order_nodes()?;
        }
        Ok(())
    }

    /// Rewrite declarations into pure forward `depends_on` lists.
    ///
    /// Runs a single pass in insertion order. A wildcard expands to every
    /// other node that does not still hold an unexpanded wildcard of its own,
    /// so earlier wildcard nodes are visible to later ones but not vice
    /// versa. `required_by` lists are inverted into the targets' `depends_on`
    /// and then cleared; entries naming unknown nodes are kept aside for
    /// ordering to diagnose. Never fails.
    fn normalize(&mut self) {
        debug!(nodes = self.graph.node_count(), "Normalizing declarations");

        let mut unexpanded: HashSet<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                let node = &self.graph[idx];
                node.depends_on.as_ref().is_some_and(DependencySet::is_wildcard)
                    || node.required_by.as_ref().is_some_and(DependencySet::is_wildcard)
            })
            .collect();

        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for &idx in &indices {
            unexpanded.remove(&idx);

            if self.graph[idx]
                .depends_on
                .as_ref()
                .is_some_and(DependencySet::is_wildcard)
            {
                let peers = self.visible_peers(idx, &indices, &unexpanded);
                trace!(node = %self.graph[idx].name, ?peers, "Expanded wildcard depends_on");
                self.graph[idx].depends_on = Some(DependencySet::Names(peers));
            }

            let Some(required_by) = self.graph[idx].required_by.take() else {
                continue;
            };
            let dependents = match required_by {
                DependencySet::Names(names) => names,
                DependencySet::AllOthers => self.visible_peers(idx, &indices, &unexpanded),
            };

            let own_name = self.graph[idx].name.clone();
            let mut missing = Vec::new();
            for dependent in dependents {
                let Some(&dep_idx) = self.node_map.get(&dependent) else {
                    missing.push(dependent);
                    continue;
                };
                match self.graph[dep_idx]
                    .depends_on
                    .get_or_insert_with(|| DependencySet::Names(Vec::new()))
                {
                    DependencySet::Names(names) => {
                        trace!(node = %dependent, gains = %own_name, "Inverted required_by");
                        names.push(own_name.clone());
                    }
                    // The dependent's own wildcard expands later in this pass
                    // and already covers this node.
                    DependencySet::AllOthers => {}
                }
            }
            if !missing.is_empty() {
                self.orphans.insert(idx, missing);
            }
        }

        self.phase = Phase::Normalized;
    }

    /// Every node other than `idx` that is not still awaiting wildcard
    /// expansion, in insertion order.
    fn visible_peers(
        &self,
        idx: NodeIndex,
        indices: &[NodeIndex],
        unexpanded: &HashSet<NodeIndex>,
    ) -> Vec<String> {
        indices
            .iter()
            .filter(|&&other| other != idx && !unexpanded.contains(&other))
            .map(|&other| self.graph[other].name.clone())
            .collect()
    }

    /// Compute the processing order with a stable repeated scan.
    ///
    /// A node is promoted once every dependency is already placed; a full
    /// pass that promotes nothing proves the remainder cyclic. Ties resolve
    /// to declaration order, which is an observable contract - this is why a
    /// zero-indegree queue (or `petgraph::algo::toposort`) is not used here.
    fn order_nodes(&mut self) -> Result<(), ResolveError> {
        // Idempotent re-entry after a failed attempt starts from scratch.
        self.graph.clear_edges();

        // Materialize edges dependency → dependent, diagnosing references to
        // absent names in declaration order as soon as they are examined.
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for &idx in &indices {
            let deps = match &self.graph[idx].depends_on {
                Some(DependencySet::Names(names)) => names.clone(),
                _ => Vec::new(),
            };
            let mut missing = Vec::new();
            for dep in deps {
                match self.node_map.get(&dep) {
                    Some(&dep_idx) => {
                        self.graph.update_edge(dep_idx, idx, ());
                    }
                    None => missing.push(dep),
                }
            }
            if let Some(orphaned) = self.orphans.get(&idx) {
                missing.extend(orphaned.iter().cloned());
            }
            if !missing.is_empty() {
                return Err(ResolveError::UnresolvableDependency {
                    node: self.graph[idx].name.clone(),
                    missing,
                });
            }
        }

        let mut pending: Vec<NodeIndex> = indices;
        let mut placed: HashSet<NodeIndex> = HashSet::with_capacity(pending.len());
        let mut order: Vec<NodeIndex> = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let mut promoted = 0;
            for idx in std::mem::take(&mut pending) {
                let ready = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .all(|dep| placed.contains(&dep));
                if ready {
                    placed.insert(idx);
                    order.push(idx);
                    promoted += 1;
                } else {
                    pending.push(idx);
                }
            }
            if promoted == 0 {
                let names: Vec<String> = pending
                    .iter()
                    .map(|&idx| self.graph[idx].name.clone())
                    .collect();
                debug!(?names, "Scan pass made no progress");
                return Err(ResolveError::CircularDependency { names });
            }
        }

        debug!(nodes = order.len(), "Dependency order resolved");
        self.order = order;
        self.phase = Phase::Ordered;
        Ok(())
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(std::iter::empty::<(String, NodeSpec)>())
    }
}

impl<S: Into<String>> FromIterator<(S, NodeSpec)> for Resolver {
    fn from_iter<I: IntoIterator<Item = (S, NodeSpec)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    include!("resolver.test.rs");
}
