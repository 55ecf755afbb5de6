//! Pipeline orchestration
//!
//! The stages run strictly in sequence: load both configuration documents,
//! then render and write each manifest entry in document order, then hand
//! the caller the replacement command. Every failure aborts the run
//! immediately; files written before the failure stay on disk.

use std::fs;

use tracing::info;

use runner_tmpl::Bindings;

use crate::config::{load_common, load_manifest, ManifestEntry};
use crate::error::CoreError;
use crate::layout::Layout;
use crate::output;

/// The command to replace the process with once generation completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    /// Full shell command line from the common configuration
    pub exec: String,
}

/// Run the full generation pipeline for `layout`.
///
/// Returns the handoff command on success; performing the actual process
/// replacement is the caller's job, which keeps the pipeline interceptable
/// from tests and other embedders.
pub fn run(layout: &Layout) -> Result<Handoff, CoreError> {
    let common = load_common(layout)?;
    let manifest = load_manifest(layout)?;

    info!(
        base = %layout.base.display(),
        environment = %layout.environment,
        templates = manifest.len(),
        "configuration loaded"
    );

    for entry in &manifest.entries {
        process_entry(layout, entry)?;
    }

    info!(exec = %common.exec, "template generation complete");
    Ok(Handoff { exec: common.exec })
}

/// Render one manifest entry and write its output file.
fn process_entry(layout: &Layout, entry: &ManifestEntry) -> Result<(), CoreError> {
    let path = layout.template_path(&entry.template);
    info!(template = %path.display(), "parsing template");

    let source = fs::read_to_string(&path).map_err(|source| CoreError::TemplateRead {
        template: entry.template.clone(),
        path: path.clone(),
        source,
    })?;

    // An entry with no config mapping fails here rather than rendering
    // against an implicit empty context.
    let config = entry
        .spec
        .config
        .clone()
        .ok_or_else(|| CoreError::MissingConfig {
            template: entry.template.clone(),
        })?;

    let bindings = Bindings::new().with("config", serde_yaml::Value::Mapping(config));

    let rendered =
        runner_tmpl::render(&entry.template, &source, &bindings).map_err(|source| {
            CoreError::Render {
                template: entry.template.clone(),
                source,
            }
        })?;

    output::write_rendered(&entry.spec.target, &rendered)?;
    output::apply_ownership(&entry.spec)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Build a full configuration tree: common.yaml, one environment
    /// manifest, and any number of template files.
    fn base_tree(common: &str, manifest: &str, templates: &[(&str, &str)]) -> (Layout, TempDir) {
        let temp = TempDir::new().unwrap();
        let layout = Layout::new(temp.path(), "test");

        fs::write(layout.common_path(), common).unwrap();

        fs::create_dir_all(temp.path().join("environments")).unwrap();
        fs::write(layout.manifest_path(), manifest).unwrap();

        fs::create_dir_all(temp.path().join("templates")).unwrap();
        for (name, content) in templates {
            let path = layout.template_path(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }

        (layout, temp)
    }

    fn manifest_entry(template: &str, target: &Path, config: &str) -> String {
        format!("{template}:\n  config: {config}\n  target: {}\n", target.display())
    }

    #[test]
    fn run_renders_writes_and_returns_handoff() {
        let out = TempDir::new().unwrap();
        let target = out.path().join("app.conf");

        let (layout, _temp) = base_tree(
            "exec: /bin/true\n",
            &manifest_entry("app.conf", &target, "{port: 8080}"),
            &[("app.conf", "listen=<%= config.port %>")],
        );

        let handoff = run(&layout).unwrap();

        assert_eq!(handoff.exec, "/bin/true");
        assert_eq!(fs::read_to_string(&target).unwrap(), "listen=8080\n");
    }

    #[test]
    fn entries_process_in_document_order_last_write_wins() {
        let out = TempDir::new().unwrap();
        let target = out.path().join("shared.conf");

        let manifest = format!(
            "{}{}",
            manifest_entry("first.conf", &target, "{tag: first}"),
            manifest_entry("second.conf", &target, "{tag: second}"),
        );

        let (layout, _temp) = base_tree(
            "exec: /bin/true\n",
            &manifest,
            &[
                ("first.conf", "from=<%= config.tag %>"),
                ("second.conf", "from=<%= config.tag %>"),
            ],
        );

        run(&layout).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "from=second\n");
    }

    #[test]
    fn one_output_file_per_entry() {
        let out = TempDir::new().unwrap();
        let target_a = out.path().join("a.conf");
        let target_b = out.path().join("b.conf");

        let manifest = format!(
            "{}{}",
            manifest_entry("a.conf", &target_a, "{v: 1}"),
            manifest_entry("b.conf", &target_b, "{v: 2}"),
        );

        let (layout, _temp) = base_tree(
            "exec: /bin/true\n",
            &manifest,
            &[("a.conf", "v=<%= config.v %>"), ("b.conf", "v=<%= config.v %>")],
        );

        run(&layout).unwrap();

        assert_eq!(fs::read_to_string(&target_a).unwrap(), "v=1\n");
        assert_eq!(fs::read_to_string(&target_b).unwrap(), "v=2\n");
    }

    #[test]
    fn missing_common_aborts_before_any_output() {
        let out = TempDir::new().unwrap();
        let target = out.path().join("app.conf");

        let (layout, _temp) = base_tree(
            "exec: /bin/true\n",
            &manifest_entry("app.conf", &target, "{port: 1}"),
            &[("app.conf", "port=<%= config.port %>")],
        );
        fs::remove_file(layout.common_path()).unwrap();

        let result = run(&layout);

        assert!(matches!(result, Err(CoreError::ReadConfig { .. })));
        assert!(!target.exists());
    }

    #[test]
    fn missing_template_aborts_but_keeps_earlier_outputs() {
        let out = TempDir::new().unwrap();
        let target_a = out.path().join("a.conf");
        let target_b = out.path().join("b.conf");

        let manifest = format!(
            "{}{}",
            manifest_entry("a.conf", &target_a, "{v: 1}"),
            manifest_entry("gone.conf", &target_b, "{v: 2}"),
        );

        // Only the first template exists on disk.
        let (layout, _temp) = base_tree(
            "exec: /bin/true\n",
            &manifest,
            &[("a.conf", "v=<%= config.v %>")],
        );

        let result = run(&layout);

        assert!(
            matches!(result, Err(CoreError::TemplateRead { ref template, .. }) if template == "gone.conf")
        );
        // No rollback: the first entry's output persists, the second never
        // came into existence.
        assert_eq!(fs::read_to_string(&target_a).unwrap(), "v=1\n");
        assert!(!target_b.exists());
    }

    #[test]
    fn entry_without_config_fails_fast() {
        let out = TempDir::new().unwrap();
        let target = out.path().join("app.conf");

        let manifest = format!("app.conf:\n  target: {}\n", target.display());

        let (layout, _temp) = base_tree(
            "exec: /bin/true\n",
            &manifest,
            &[("app.conf", "static content")],
        );

        let result = run(&layout);

        assert!(
            matches!(result, Err(CoreError::MissingConfig { ref template }) if template == "app.conf")
        );
        assert!(!target.exists());
    }

    #[test]
    fn render_failure_names_the_template() {
        let out = TempDir::new().unwrap();
        let target = out.path().join("app.conf");

        let (layout, _temp) = base_tree(
            "exec: /bin/true\n",
            &manifest_entry("app.conf", &target, "{port: 1}"),
            &[("app.conf", "<%= undefined_thing %>")],
        );

        let result = run(&layout);

        assert!(
            matches!(result, Err(CoreError::Render { ref template, .. }) if template == "app.conf")
        );
        assert!(!target.exists());
    }

    #[test]
    fn unwritable_target_aborts() {
        let (layout, _temp) = base_tree(
            "exec: /bin/true\n",
            &manifest_entry(
                "app.conf",
                &PathBuf::from("/nonexistent-dir-for-runner-tests/app.conf"),
                "{port: 1}",
            ),
            &[("app.conf", "port=<%= config.port %>")],
        );

        let result = run(&layout);
        assert!(matches!(result, Err(CoreError::WriteOutput { .. })));
    }

    #[test]
    fn templates_in_subdirectories_resolve() {
        let out = TempDir::new().unwrap();
        let target = out.path().join("site.conf");

        let (layout, _temp) = base_tree(
            "exec: /bin/true\n",
            &manifest_entry("nginx/site.conf", &target, "{host: example.com}"),
            &[("nginx/site.conf", "server_name <%= config.host %>;")],
        );

        run(&layout).unwrap();

        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "server_name example.com;\n"
        );
    }

    #[test]
    fn empty_manifest_skips_straight_to_handoff() {
        let (layout, _temp) = base_tree("exec: /bin/date\n", "{}\n", &[]);

        let handoff = run(&layout).unwrap();
        assert_eq!(handoff.exec, "/bin/date");
    }
}
