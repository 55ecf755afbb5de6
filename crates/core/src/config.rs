//! Configuration documents: common configuration and environment manifest
//!
//! Two YAML documents drive a run. `common.yaml` holds settings shared by
//! every environment, most importantly the handoff command. The environment
//! manifest maps template names to per-template parameters; its document
//! order is the processing order.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::layout::Layout;

/// Default owner and group for generated files.
pub const DEFAULT_OWNER: &str = "root";

/// Default file mode for generated files.
pub const DEFAULT_MODE: u32 = 0o644;

/// The common configuration, shared by every environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommonConfig {
    /// Command line to hand the process over to once generation completes
    pub exec: String,

    /// Remaining top-level keys, kept as loaded
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Per-template descriptor from the environment manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntrySpec {
    /// Variable bindings exposed to the template as `config`. Required for
    /// rendering; an entry without it fails fast.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_yaml::Mapping>,

    /// Output file path
    pub target: PathBuf,

    /// Owner applied when running privileged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Group applied when running privileged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// File mode applied when running privileged, e.g. `0o640`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perms: Option<u32>,
}

impl EntrySpec {
    /// Owner to apply, falling back to the default.
    pub fn owner(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_OWNER)
    }

    /// Group to apply, falling back to the default.
    pub fn owner_group(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_OWNER)
    }

    /// File mode to apply, falling back to the default.
    pub fn mode(&self) -> u32 {
        self.perms.unwrap_or(DEFAULT_MODE)
    }
}

/// One template-name to [`EntrySpec`] pair from the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    /// Template path relative to `<base>/templates`
    pub template: String,

    /// Rendering and output parameters
    pub spec: EntrySpec,
}

/// The environment manifest: templates to render, in document order.
///
/// Order is observable: entries are processed top to bottom, so when two
/// entries write the same target the later one wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    /// Entries in document order
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the manifest declares no templates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load and parse `<base>/common.yaml`.
pub fn load_common(layout: &Layout) -> Result<CommonConfig, CoreError> {
    let path = layout.common_path();
    let text = fs::read_to_string(&path).map_err(|source| CoreError::ReadConfig {
        path: path.clone(),
        source,
    })?;

    serde_yaml::from_str(&text).map_err(|source| CoreError::ParseConfig { path, source })
}

/// Load and parse `<base>/environments/<environment>.yaml`.
pub fn load_manifest(layout: &Layout) -> Result<Manifest, CoreError> {
    let path = layout.manifest_path();
    let text = fs::read_to_string(&path).map_err(|source| CoreError::ReadConfig {
        path: path.clone(),
        source,
    })?;

    let document: serde_yaml::Mapping =
        serde_yaml::from_str(&text).map_err(|source| CoreError::ParseConfig {
            path: path.clone(),
            source,
        })?;

    let mut entries = Vec::with_capacity(document.len());
    for (key, value) in document {
        let template = key
            .as_str()
            .ok_or_else(|| CoreError::ManifestKey { path: path.clone() })?
            .to_string();

        let spec: EntrySpec =
            serde_yaml::from_value(value).map_err(|source| CoreError::InvalidEntry {
                template: template.clone(),
                source,
            })?;

        entries.push(ManifestEntry { template, spec });
    }

    Ok(Manifest { entries })
}
