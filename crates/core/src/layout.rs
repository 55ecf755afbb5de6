//! Configuration root and environment resolution

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the configuration root.
pub const BASE_VAR: &str = "runner_base";

/// Environment variable overriding the environment name.
pub const ENVIRONMENT_VAR: &str = "environment";

/// Default configuration root.
pub const DEFAULT_BASE: &str = "/etc/runner";

/// Default environment name.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Resolved configuration root and environment name.
///
/// Resolution happens once at startup and the result is passed explicitly
/// to every later stage; nothing re-reads the process environment. Values
/// are not validated here - a base directory that does not exist surfaces
/// as a load error in the next stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Configuration root directory
    pub base: PathBuf,

    /// Active environment name
    pub environment: String,
}

impl Layout {
    /// Create a layout from explicit values.
    pub fn new(base: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            environment: environment.into(),
        }
    }

    /// Resolve the layout: explicit override, then environment variable,
    /// then built-in default, per value.
    pub fn resolve(base: Option<PathBuf>, environment: Option<String>) -> Self {
        let base = base
            .or_else(|| env::var(BASE_VAR).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE));

        let environment = environment
            .or_else(|| env::var(ENVIRONMENT_VAR).ok())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        Self { base, environment }
    }

    /// Resolve from the process environment alone.
    pub fn from_env() -> Self {
        Self::resolve(None, None)
    }

    /// Path of the common configuration document.
    pub fn common_path(&self) -> PathBuf {
        self.base.join("common.yaml")
    }

    /// Path of the environment manifest document.
    pub fn manifest_path(&self) -> PathBuf {
        self.base
            .join("environments")
            .join(format!("{}.yaml", self.environment))
    }

    /// Path of a named template file.
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.base.join("templates").join(name)
    }
}
