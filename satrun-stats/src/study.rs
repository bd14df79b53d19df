//! Study Definition
//!
//! A study is the grid of runs being reported on: an ordered list of
//! accelerator configurations crossed with an ordered list of input
//! instances, rooted at a runs directory laid out as
//! `<runs_dir>/<configuration>/<instance>/statistics.json`.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::STATISTICS_FILE_NAME;

/// Errors raised while building a study
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudyError {
    /// A configuration label is not of the form `<watchers>x<clauses>`
    #[error("invalid configuration label `{label}`: {reason}")]
    InvalidConfiguration {
        /// The rejected label
        label: String,
        /// What is wrong with it
        reason: String,
    },

    /// The same configuration label appears twice
    #[error("duplicate configuration `{0}`")]
    DuplicateConfiguration(String),

    /// The same instance name appears twice
    #[error("duplicate instance `{0}`")]
    DuplicateInstance(String),

    /// No configurations were given
    #[error("study has no configurations")]
    NoConfigurations,

    /// No instances were given
    #[error("study has no instances")]
    NoInstances,
}

/// Accelerator configuration label `<watchers>x<clauses>`, e.g. `4x16`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigurationId {
    label: String,
    watchers: u32,
    clauses: u32,
}

impl ConfigurationId {
    /// The label as written, e.g. `4x16`
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of watcher units (W)
    pub fn watchers(&self) -> u32 {
        self.watchers
    }

    /// Total clause units (N)
    pub fn clauses(&self) -> u32 {
        self.clauses
    }

    /// Clause units attached to each watcher (`N / W`, rounded down)
    pub fn clauses_per_watcher(&self) -> u32 {
        self.clauses / self.watchers
    }
}

impl FromStr for ConfigurationId {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| StudyError::InvalidConfiguration {
            label: s.to_string(),
            reason: reason.to_string(),
        };

        let (watchers, clauses) = s
            .split_once('x')
            .ok_or_else(|| invalid("expected <watchers>x<clauses>"))?;
        let watchers: u32 = watchers
            .parse()
            .map_err(|_| invalid("watcher count is not a number"))?;
        let clauses: u32 = clauses
            .parse()
            .map_err(|_| invalid("clause count is not a number"))?;

        if watchers == 0 {
            return Err(invalid("watcher count must be positive"));
        }
        if clauses == 0 {
            return Err(invalid("clause count must be positive"));
        }

        Ok(Self {
            label: s.to_string(),
            watchers,
            clauses,
        })
    }
}

impl fmt::Display for ConfigurationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Ordered configurations x instances, rooted at a runs directory
#[derive(Debug, Clone)]
pub struct Study {
    runs_dir: PathBuf,
    configurations: Vec<ConfigurationId>,
    instances: Vec<String>,
}

impl Study {
    /// Build a study, validating labels and rejecting duplicates or empty lists
    pub fn new<C, I>(
        runs_dir: impl Into<PathBuf>,
        configurations: C,
        instances: I,
    ) -> Result<Self, StudyError>
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut parsed = Vec::new();
        for label in configurations {
            let id: ConfigurationId = label.as_ref().parse()?;
            if !seen.insert(id.label.clone()) {
                return Err(StudyError::DuplicateConfiguration(id.label));
            }
            parsed.push(id);
        }
        if parsed.is_empty() {
            return Err(StudyError::NoConfigurations);
        }

        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for name in instances {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(StudyError::DuplicateInstance(name));
            }
            names.push(name);
        }
        if names.is_empty() {
            return Err(StudyError::NoInstances);
        }

        Ok(Self {
            runs_dir: runs_dir.into(),
            configurations: parsed,
            instances: names,
        })
    }

    /// Directory holding one sub-directory per configuration
    pub fn runs_dir(&self) -> &Path {
        &self.runs_dir
    }

    /// Configurations in declared order
    pub fn configurations(&self) -> &[ConfigurationId] {
        &self.configurations
    }

    /// Instance names in declared order
    pub fn instances(&self) -> &[String] {
        &self.instances
    }

    /// Directory of one configuration
    pub fn configuration_dir(&self, configuration: &ConfigurationId) -> PathBuf {
        self.runs_dir.join(configuration.label())
    }

    /// Statistics file of one run
    pub fn statistics_path(&self, configuration: &ConfigurationId, instance: &str) -> PathBuf {
        self.configuration_dir(configuration)
            .join(instance)
            .join(STATISTICS_FILE_NAME)
    }
}
