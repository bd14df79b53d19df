//! Run Directory Scaffolding
//!
//! Prepares one directory per configuration from a template directory and
//! rewrites the simulator configuration for that configuration's shape.

use anyhow::Context;
use satrun_stats::{ConfigurationId, Study};
use std::path::{Path, PathBuf};

/// Simulator configuration rewritten per configuration
pub const SIMULATOR_CONFIG: &str = "satacc_config.toml";

/// Files copied from the template directory, in copy order
pub const TEMPLATE_FILES: [&str; 3] = [SIMULATOR_CONFIG, "checkpoint_start.py", "run.py"];

/// Options for a scaffolding pass
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Directory holding [`TEMPLATE_FILES`]
    pub template_dir: PathBuf,
    /// Value written to `l3_cache_type`
    pub l3_cache_type: String,
    /// Value written to `ramu_cache_config`
    pub ramu_cache_config: String,
}

/// Scaffold every configuration directory of the study.
///
/// Returns the directories in configuration order.
pub fn scaffold_study(study: &Study, options: &ScaffoldOptions) -> anyhow::Result<Vec<PathBuf>> {
    let mut dirs = Vec::with_capacity(study.configurations().len());
    for configuration in study.configurations() {
        let dir = study.configuration_dir(configuration);
        scaffold_configuration(&dir, configuration, options)?;
        tracing::info!(
            configuration = configuration.label(),
            dir = %dir.display(),
            "scaffolded run directory"
        );
        dirs.push(dir);
    }
    Ok(dirs)
}

/// Scaffold one configuration directory
pub fn scaffold_configuration(
    dir: &Path,
    configuration: &ConfigurationId,
    options: &ScaffoldOptions,
) -> anyhow::Result<()> {
    if !dir.is_dir() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create directory {}", dir.display()))?;
    }

    for name in TEMPLATE_FILES {
        let from = options.template_dir.join(name);
        let to = dir.join(name);
        std::fs::copy(&from, &to)
            .with_context(|| format!("cannot copy {} to {}", from.display(), to.display()))?;
    }

    let config_path = dir.join(SIMULATOR_CONFIG);
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("cannot read {}", config_path.display()))?;
    let rewritten = rewrite_simulator_config(&content, configuration, options)
        .with_context(|| format!("cannot rewrite {}", config_path.display()))?;
    std::fs::write(&config_path, rewritten)
        .with_context(|| format!("cannot write {}", config_path.display()))?;

    Ok(())
}

/// Set the four configuration-dependent keys, keeping every other key
pub fn rewrite_simulator_config(
    content: &str,
    configuration: &ConfigurationId,
    options: &ScaffoldOptions,
) -> anyhow::Result<String> {
    let mut table: toml::Table = content.parse().context("invalid TOML")?;

    table.insert(
        "n_watchers".to_string(),
        toml::Value::Integer(i64::from(configuration.watchers())),
    );
    table.insert(
        "n_clauses".to_string(),
        toml::Value::Integer(i64::from(configuration.clauses_per_watcher())),
    );
    table.insert(
        "l3_cache_type".to_string(),
        toml::Value::String(options.l3_cache_type.clone()),
    );
    table.insert(
        "ramu_cache_config".to_string(),
        toml::Value::String(options.ramu_cache_config.clone()),
    );

    Ok(toml::to_string(&table)?)
}
