//! Configuration loading from satrun.toml
//!
//! SatRun configuration can be specified in a `satrun.toml` file next to the
//! run directories. The configuration is automatically discovered by walking up
//! from the current directory. Every key has a default, so an empty file (or no
//! file at all) describes the full five-configuration, 21-instance study.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up during discovery
pub const CONFIG_FILE_NAME: &str = "satrun.toml";

/// SatRun configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SatrunConfig {
    /// Which runs make up the study
    #[serde(default)]
    pub study: StudyConfig,
    /// Report output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Directory scaffolding configuration
    #[serde(default)]
    pub scaffold: ScaffoldConfig,
}

/// Study grid: configurations x instances under a runs directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudyConfig {
    /// Directory holding one sub-directory per configuration
    #[serde(default = "default_runs_dir")]
    pub runs_dir: String,
    /// Configuration labels (`<watchers>x<clauses>`), in report column order
    #[serde(default = "default_configurations")]
    pub configurations: Vec<String>,
    /// Instance file names, in report row order
    #[serde(default = "default_instances")]
    pub instances: Vec<String>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            runs_dir: default_runs_dir(),
            configurations: default_configurations(),
            instances: default_instances(),
        }
    }
}

fn default_runs_dir() -> String {
    ".".to_string()
}

fn default_configurations() -> Vec<String> {
    ["1x1", "1x4", "4x4", "4x16", "16x16"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_instances() -> Vec<String> {
    [
        "b1904P1-8x8c6h5SAT.cnf",
        "b1904P3-8x8c11h0SAT.cnf",
        "eqsparcl10bpwtrc10.cnf",
        "eqspdtlf14bpwtrc14.cnf",
        "eqspwtrc16bparrc16.cnf",
        "Grain_no_init_ver1_out200_known_last104_0.cnf",
        "Haystacks-ext-12_c18.cnf",
        "hcp_bij16_16.cnf",
        "hcp_CP20_20.cnf",
        "hcp_CP24_24.cnf",
        "knight_20.cnf",
        "Mickey_out250_known_last146_0.cnf",
        "MM-23-2-2-2-2-3.cnf",
        "QuasiGroup-4-12_c18.cnf",
        "sha1r17m145ABCD.cnf",
        "sha1r17m72a.cnf",
        "size_4_4_4_i0418_r8.cnf",
        "size_5_5_5_i003_r12.cnf",
        "toughsat_28bits_0.cnf",
        "toughsat_30bits_0.cnf",
        "Trivium_no_init_out350_known_last142_1.cnf",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Default output format: "text", "json", "csv", "markdown"
    #[serde(default = "default_format")]
    pub format: String,
    /// Write the report to this file instead of stdout
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "text".to_string()
}

/// Scaffolding configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScaffoldConfig {
    /// Directory holding the template files
    #[serde(default = "default_template_dir")]
    pub template_dir: String,
    /// Value written to `l3_cache_type`
    #[serde(default = "default_l3_cache_type")]
    pub l3_cache_type: String,
    /// Value written to `ramu_cache_config`
    #[serde(default = "default_ramu_cache_config")]
    pub ramu_cache_config: String,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            l3_cache_type: default_l3_cache_type(),
            ramu_cache_config: default_ramu_cache_config(),
        }
    }
}

fn default_template_dir() -> String {
    "template".to_string()
}
fn default_l3_cache_type() -> String {
    "Ramu".to_string()
}
fn default_ramu_cache_config() -> String {
    "HBM".to_string()
}

impl SatrunConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover a configuration file by walking up from `start`
    pub fn discover_from(start: impl AsRef<Path>) -> Option<PathBuf> {
        let mut dir = start.as_ref().to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Try to discover and locate a configuration file from the current directory
    pub fn discover() -> Option<PathBuf> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(dir)
    }

    /// Resolve the configuration: an explicit file must load, a discovered one
    /// must load too, and no file at all yields the defaults.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };
        match path {
            Some(path) => {
                let config = Self::load(&path)
                    .with_context(|| format!("cannot load config file {}", path.display()))?;
                Ok((config, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        let mut out = String::from(
            r#"# SatRun Configuration

[study]
# Directory holding one sub-directory per configuration
runs_dir = "."
# Configuration labels: <watchers>x<clauses>
"#,
        );
        out.push_str(&toml_list("configurations", &default_configurations()));
        out.push_str("# Instance files, one statistics.json each per configuration\n");
        out.push_str(&toml_list("instances", &default_instances()));
        out.push_str(
            r#"
[output]
# Default output format: text, json, csv, markdown
format = "text"
# Write the report to a file instead of stdout (uncomment to enable)
# path = "report.txt"

[scaffold]
# Directory with satacc_config.toml, checkpoint_start.py and run.py
template_dir = "template"
# Values written into every scaffolded satacc_config.toml
l3_cache_type = "Ramu"
ramu_cache_config = "HBM"
"#,
        );
        out
    }
}

fn toml_list(key: &str, items: &[String]) -> String {
    let mut out = format!("{} = [\n", key);
    for item in items {
        out.push_str(&format!("    \"{}\",\n", item));
    }
    out.push_str("]\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SatrunConfig::default();
        assert_eq!(config.study.runs_dir, ".");
        assert_eq!(
            config.study.configurations,
            ["1x1", "1x4", "4x4", "4x16", "16x16"]
        );
        assert_eq!(config.study.instances.len(), 21);
        assert_eq!(config.study.instances[0], "b1904P1-8x8c6h5SAT.cnf");
        assert_eq!(config.output.format, "text");
        assert_eq!(config.scaffold.l3_cache_type, "Ramu");
        assert_eq!(config.scaffold.ramu_cache_config, "HBM");
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [study]
            runs_dir = "runs"
            configurations = ["2x8"]

            [output]
            format = "csv"
        "#;

        let config: SatrunConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.study.runs_dir, "runs");
        assert_eq!(config.study.configurations, ["2x8"]);
        assert_eq!(config.output.format, "csv");
        // Defaults should still apply
        assert_eq!(config.study.instances.len(), 21);
        assert_eq!(config.scaffold.template_dir, "template");
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: SatrunConfig = toml::from_str("").unwrap();
        assert_eq!(config, SatrunConfig::default());
    }

    #[test]
    fn test_default_toml_parses() {
        let config: SatrunConfig = toml::from_str(&SatrunConfig::default_toml()).unwrap();
        assert_eq!(config, SatrunConfig::default());
    }

    #[test]
    fn test_discover_walks_up() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "[output]\nformat = \"json\"\n").unwrap();

        let found = SatrunConfig::discover_from(&nested).unwrap();
        assert_eq!(found, temp.path().join(CONFIG_FILE_NAME));
        assert_eq!(SatrunConfig::load(&found).unwrap().output.format, "json");
    }

    #[test]
    fn test_resolve_explicit_missing_file_fails() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope.toml");
        assert!(SatrunConfig::resolve(Some(&missing)).is_err());
    }

    #[test]
    fn test_resolve_keeps_parse_error_chain() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[study\nruns_dir = 1\n").unwrap();

        let err = SatrunConfig::resolve(Some(&path)).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("cannot load config file {}", path.display())
        );
        // The TOML error stays a separate source
        assert!(err.chain().count() >= 2);
        assert!(err.chain().nth(1).unwrap().downcast_ref::<toml::de::Error>().is_some());
    }
}
