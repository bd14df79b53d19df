//! Study Planner
//!
//! Builds the study a command runs over by narrowing the configured grid.
//!
//! Narrowing options:
//! - Configuration selection by label (`--config`, repeatable)
//! - Regex pattern matching on instance names (`--filter`)
//!
//! Ordering: the declared order of the configuration file is kept, whatever
//! order the selection was given in.

use anyhow::{Context, bail};
use regex::Regex;
use satrun_stats::Study;
use std::path::Path;

/// Selection requested on the command line
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    /// Configuration labels to keep; empty keeps all
    pub configurations: &'a [String],
    /// Regex an instance name must match
    pub filter: Option<&'a str>,
}

/// Build the study for a command from the declared lists and a selection
pub fn build_study(
    runs_dir: &Path,
    configurations: &[String],
    instances: &[String],
    selection: &Selection<'_>,
) -> anyhow::Result<Study> {
    for label in selection.configurations {
        if !configurations.contains(label) {
            bail!(
                "unknown configuration `{}` (declared: {})",
                label,
                configurations.join(", ")
            );
        }
    }

    let selected_configurations: Vec<&String> = configurations
        .iter()
        .filter(|c| selection.configurations.is_empty() || selection.configurations.contains(c))
        .collect();

    let selected_instances: Vec<String> = match selection.filter {
        Some(pattern) => {
            let re = Regex::new(pattern)
                .with_context(|| format!("invalid instance filter `{}`", pattern))?;
            let kept: Vec<String> = instances
                .iter()
                .filter(|name| re.is_match(name))
                .cloned()
                .collect();
            if kept.is_empty() {
                bail!("instance filter `{}` matches no instance", pattern);
            }
            kept
        }
        None => instances.to_vec(),
    };

    tracing::debug!(
        configurations = selected_configurations.len(),
        instances = selected_instances.len(),
        "planned study"
    );

    Ok(Study::new(
        runs_dir,
        selected_configurations,
        selected_instances,
    )?)
}
