#![warn(missing_docs)]
//! SatRun Statistics Engine
//!
//! Turns the per-run `statistics.json` files of an accelerator simulation
//! study into aggregate tables:
//! - Typed schema for the statistics document
//! - Eight derived metrics per run (cycles, three per-round averages, L3/L1
//!   miss rates, watcher/clause idle rates)
//! - Study definition (configurations x instances) and the all-or-nothing
//!   aggregation pass over it

mod aggregate;
mod document;
mod metrics;
mod study;

pub use aggregate::{
    Aggregate, AggregateError, MetricTable, aggregate_study, aggregate_with, load_run_metrics,
};
pub use document::{
    AverageStat, CacheStatistics, ClauseGroup, DocumentError, StatisticsDocument, UnitCycles,
};
pub use metrics::{
    Metric, MetricError, MetricValue, RunMetrics, average, clause_idle_rate, l1_miss_rate,
    l3_miss_rate, watcher_idle_rate,
};
pub use study::{ConfigurationId, Study, StudyError};

/// File name of the per-run statistics document
pub const STATISTICS_FILE_NAME: &str = "statistics.json";
