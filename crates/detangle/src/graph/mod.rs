//! # Graph Module
//!
//! Declarative dependency graph model and resolution.
//!
//! ## Modules
//!
//! - [`node`] - Declared node attributes (`depends_on` / `required_by`, wildcards)
//! - [`resolver`] - Normalization, deterministic ordering, and consumption

pub mod node;
pub mod resolver;

pub use node::{DependencySet, Manifest, NodeSpec, WILDCARD};
pub use resolver::{ResolveError, Resolver};
