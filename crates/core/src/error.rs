//! Error types for runner-core

use std::path::PathBuf;

use thiserror::Error;

use runner_platform::PlatformError;
use runner_tmpl::RenderError;

/// Errors that can occur in the generation pipeline
///
/// Every variant names the resource that failed; nothing is retried or
/// recovered, so one of these always means the run is over.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read configuration file '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse configuration file '{path}': {source}")]
    ParseConfig {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("manifest '{path}' has a non-string template key")]
    ManifestKey { path: PathBuf },

    #[error("invalid manifest entry for template '{template}': {source}")]
    InvalidEntry {
        template: String,
        source: serde_yaml::Error,
    },

    #[error("failed to read template '{template}' from '{path}': {source}")]
    TemplateRead {
        template: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("template '{template}' has no config mapping in the manifest")]
    MissingConfig { template: String },

    #[error("failed to render template '{template}': {source}")]
    Render {
        template: String,
        source: RenderError,
    },

    #[error("failed to write output file '{path}': {source}")]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}
