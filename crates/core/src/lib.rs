//! runner-core: the generation pipeline for runner
//!
//! This crate turns a configuration tree (`common.yaml`, an environment
//! manifest, and a directory of templates) into rendered files on disk and
//! a handoff command for the caller to exec. The pipeline is a single
//! synchronous pass with no retries and no rollback.

mod config;
mod error;
mod layout;
mod output;
mod pipeline;

pub use config::{
    load_common, load_manifest, CommonConfig, EntrySpec, Manifest, ManifestEntry, DEFAULT_MODE,
    DEFAULT_OWNER,
};
pub use error::CoreError;
pub use layout::{Layout, BASE_VAR, DEFAULT_BASE, DEFAULT_ENVIRONMENT, ENVIRONMENT_VAR};
pub use output::{apply_ownership, write_rendered};
pub use pipeline::{run, Handoff};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
