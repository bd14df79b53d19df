//! Study Aggregation
//!
//! Loads every statistics document of a study and folds the derived metrics
//! into one table per metric (rows = instances, columns = configurations).
//!
//! The pass is all-or-nothing: the first unreadable document, malformed
//! document or degenerate metric aborts it, and no tables are returned.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::document::{DocumentError, StatisticsDocument};
use crate::metrics::{Metric, MetricError, MetricValue, RunMetrics};
use crate::study::{ConfigurationId, Study};

/// Errors that abort an aggregation pass
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A statistics document could not be read or parsed
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A document parsed but one of its metrics is undefined
    #[error("invalid statistics in {}: {source}", path.display())]
    Metric {
        /// Offending document
        path: PathBuf,
        /// Underlying arithmetic failure
        #[source]
        source: MetricError,
    },
}

/// One metric across the whole study
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    /// Metric held by this table
    pub metric: Metric,
    /// `values[instance][configuration]`, both in study order
    pub values: Vec<Vec<MetricValue>>,
}

impl MetricTable {
    /// Value for one (instance, configuration) cell, by index
    pub fn get(&self, instance: usize, configuration: usize) -> Option<MetricValue> {
        self.values.get(instance)?.get(configuration).copied()
    }
}

/// The eight metric tables of a study
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Column labels in study order
    pub configurations: Vec<String>,
    /// Row labels in study order
    pub instances: Vec<String>,
    /// One table per metric, in [`Metric::ALL`] order
    pub tables: Vec<MetricTable>,
}

impl Aggregate {
    /// Table for one metric
    pub fn table(&self, metric: Metric) -> &MetricTable {
        // tables are built from Metric::ALL, so the index always matches
        &self.tables[metric as usize]
    }

    /// Value by labels
    pub fn value(&self, metric: Metric, instance: &str, configuration: &str) -> Option<MetricValue> {
        let row = self.instances.iter().position(|i| i == instance)?;
        let column = self.configurations.iter().position(|c| c == configuration)?;
        self.table(metric).get(row, column)
    }
}

/// Aggregate a study using its default `<cfg>/<instance>/statistics.json` layout
pub fn aggregate_study(study: &Study) -> Result<Aggregate, AggregateError> {
    aggregate_with(study.configurations(), study.instances(), |cfg, instance| {
        study.statistics_path(cfg, instance)
    })
}

/// Aggregate an explicit grid with a custom location function.
///
/// Documents are visited configuration by configuration, instance by
/// instance; each one is read to completion before the next is opened.
pub fn aggregate_with<F>(
    configurations: &[ConfigurationId],
    instances: &[String],
    locate: F,
) -> Result<Aggregate, AggregateError>
where
    F: Fn(&ConfigurationId, &str) -> PathBuf,
{
    // metrics[configuration][instance]
    let mut runs: Vec<Vec<RunMetrics>> = Vec::with_capacity(configurations.len());

    for configuration in configurations {
        let mut column = Vec::with_capacity(instances.len());
        for instance in instances {
            let path = locate(configuration, instance);
            let metrics = load_run_metrics(&path)?;
            tracing::debug!(
                configuration = configuration.label(),
                instance = instance.as_str(),
                cycles = metrics.cycles,
                "loaded {}",
                path.display()
            );
            column.push(metrics);
        }
        runs.push(column);
    }

    let tables = Metric::ALL
        .iter()
        .map(|&metric| MetricTable {
            metric,
            values: (0..instances.len())
                .map(|row| runs.iter().map(|column| column[row].get(metric)).collect())
                .collect(),
        })
        .collect();

    tracing::info!(
        configurations = configurations.len(),
        instances = instances.len(),
        "aggregated {} runs",
        configurations.len() * instances.len()
    );

    Ok(Aggregate {
        configurations: configurations.iter().map(|c| c.label().to_string()).collect(),
        instances: instances.to_vec(),
        tables,
    })
}

/// Load one document and derive its metrics
pub fn load_run_metrics(path: &Path) -> Result<RunMetrics, AggregateError> {
    let doc = StatisticsDocument::load(path)?;
    RunMetrics::from_document(&doc).map_err(|source| AggregateError::Metric {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn write_run(root: &Path, configuration: &str, instance: &str, cycles: u64, assignments: u64) {
        let dir = root.join(configuration).join(instance);
        fs::create_dir_all(&dir).unwrap();
        let doc = json!({
            "total_cycle": cycles,
            "average_assignments": { "total": assignments, "count": 4 },
            "average_watchers": { "total": 8, "count": 4 },
            "average_clauses": { "total": 4, "count": 4 },
            "l3_cache_statistics": { "cache_hits": 3, "cache_misses": 1 },
            "private_cache_statistics": [ { "cache_hits": 1, "cache_misses": 1 } ],
            "watcher_statistics": [ { "idle_cycle": 1, "busy_cycle": 3 } ],
            "clause_statistics": [ { "single_clause": [ { "idle_cycle": 1, "busy_cycle": 1 } ] } ]
        });
        fs::write(dir.join("statistics.json"), doc.to_string()).unwrap();
    }

    #[test]
    fn test_aggregate_fills_every_cell() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write_run(root, "1x1", "a.cnf", 100, 4);
        write_run(root, "1x1", "b.cnf", 200, 8);
        write_run(root, "4x4", "a.cnf", 300, 12);
        write_run(root, "4x4", "b.cnf", 400, 16);

        let study = Study::new(root, ["1x1", "4x4"], ["a.cnf", "b.cnf"]).unwrap();
        let aggregate = aggregate_study(&study).unwrap();

        assert_eq!(aggregate.tables.len(), 8);
        for table in &aggregate.tables {
            assert_eq!(table.values.len(), 2);
            assert!(table.values.iter().all(|row| row.len() == 2));
        }

        assert_eq!(
            aggregate.value(Metric::Cycles, "b.cnf", "4x4"),
            Some(MetricValue::Integer(400))
        );
        assert_eq!(
            aggregate.value(Metric::AverageAssignments, "a.cnf", "4x4"),
            Some(MetricValue::Real(3.0))
        );
        assert_eq!(
            aggregate.table(Metric::WatcherIdleRate).get(0, 0),
            Some(MetricValue::Real(0.25))
        );
    }

    #[test]
    fn test_table_order_matches_metric_order() {
        let temp = tempfile::tempdir().unwrap();
        write_run(temp.path(), "1x1", "a.cnf", 1, 4);

        let study = Study::new(temp.path(), ["1x1"], ["a.cnf"]).unwrap();
        let aggregate = aggregate_study(&study).unwrap();

        let order: Vec<_> = aggregate.tables.iter().map(|t| t.metric).collect();
        assert_eq!(order, Metric::ALL);
    }

    #[test]
    fn test_missing_document_aborts() {
        let temp = tempfile::tempdir().unwrap();
        write_run(temp.path(), "1x1", "a.cnf", 1, 4);

        let study = Study::new(temp.path(), ["1x1"], ["a.cnf", "missing.cnf"]).unwrap();
        let err = aggregate_study(&study).unwrap_err();

        assert!(matches!(err, AggregateError::Document(DocumentError::Io { .. })));
        assert!(err.to_string().contains("missing.cnf"));
    }

    #[test]
    fn test_zero_count_aborts_with_path() {
        let temp = tempfile::tempdir().unwrap();
        write_run(temp.path(), "1x1", "a.cnf", 1, 4);
        let path = temp.path().join("1x1").join("a.cnf").join("statistics.json");
        let mut doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        doc["average_watchers"]["count"] = json!(0);
        fs::write(&path, doc.to_string()).unwrap();

        let study = Study::new(temp.path(), ["1x1"], ["a.cnf"]).unwrap();
        match aggregate_study(&study).unwrap_err() {
            AggregateError::Metric { path: bad, source } => {
                assert_eq!(bad, path);
                assert!(matches!(source, MetricError::ZeroCount { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_location_function() {
        let temp = tempfile::tempdir().unwrap();
        write_run(temp.path(), "flat", "1x1-a.cnf", 77, 4);

        let configurations = vec!["1x1".parse::<ConfigurationId>().unwrap()];
        let instances = vec!["a.cnf".to_string()];
        let aggregate = aggregate_with(&configurations, &instances, |cfg, instance| {
            temp.path()
                .join("flat")
                .join(format!("{}-{}", cfg, instance))
                .join("statistics.json")
        })
        .unwrap();

        assert_eq!(
            aggregate.value(Metric::Cycles, "a.cnf", "1x1"),
            Some(MetricValue::Integer(77))
        );
    }
}
