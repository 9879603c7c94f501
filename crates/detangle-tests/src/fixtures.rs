//! Shared fixtures for end-to-end resolution tests

use anyhow::Result;
use detangle::{Manifest, Resolver};
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber honoring `RUST_LOG`. Safe to call from every
/// test; only the first call wins.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Build a resolver from a YAML manifest, preserving document order.
pub fn load_yaml_manifest(source: &str) -> Result<Resolver> {
    let manifest: Manifest = serde_saphyr::from_str(source)?;
    Ok(Resolver::new(manifest))
}

/// Build a resolver from a JSON manifest, preserving document order.
pub fn load_json_manifest(source: &str) -> Result<Resolver> {
    let manifest: Manifest = serde_json::from_str(source)?;
    Ok(Resolver::new(manifest))
}
