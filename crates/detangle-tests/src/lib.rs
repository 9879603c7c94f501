pub mod fixtures;

// Re-export key testing utilities
pub use fixtures::{init_tracing, load_json_manifest, load_yaml_manifest};
