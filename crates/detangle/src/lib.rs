//! # detangle Library
//!
//! Declarative dependency-graph resolution.
//!
//! Takes an insertion-ordered map of named nodes declaring `depends_on` /
//! `required_by` relationships (with `"*"` wildcard support), produces a
//! deterministic linear processing order, and lets the caller consume it
//! incrementally by popping nodes as they are processed. Unsatisfiable
//! graphs surface as typed errors: [`ResolveError::CircularDependency`] and
//! [`ResolveError::UnresolvableDependency`].
//!
//! ## Core Modules
//!
//! - [`graph`] - Node data model, normalization, ordering, and consumption
//!
//! ## Quick Start
//!
//! ```
//! use detangle::{DependencySet, NodeSpec, Resolver};
//!
//! let mut resolver = Resolver::new([
//!     ("app", NodeSpec::new().with_depends_on(DependencySet::names(["lib"]))),
//!     ("lib", NodeSpec::new()),
//! ]);
//!
//! let order: Vec<String> = resolver.solve()?.map(str::to_string).collect();
//! assert_eq!(order, ["lib", "app"]);
//!
//! for name in order {
//!     // ... process the node, then retire it ...
//!     resolver.pop(&name)?;
//! }
//! assert!(resolver.is_empty());
//! # Ok::<(), detangle::ResolveError>(())
//! ```

pub mod graph;

// Re-export commonly used types for convenience
pub use graph::{DependencySet, Manifest, NodeSpec, ResolveError, Resolver, WILDCARD};
