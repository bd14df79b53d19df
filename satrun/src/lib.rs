#![warn(missing_docs)]
//! # SatRun
//!
//! Run tooling for accelerator SAT-solver simulation studies.
//!
//! A study crosses an ordered list of accelerator configurations
//! (`<watchers>x<clauses>`) with an ordered list of input instances. SatRun:
//! - **Scaffolds** one run directory per configuration from templates
//! - **Aggregates** every `<cfg>/<instance>/statistics.json` into eight
//!   per-metric tables (cycles, per-round averages, cache miss rates, idle rates)
//! - **Renders** those tables as text, JSON, CSV or Markdown
//! - **Archives** finished run directories
//!
//! ## Quick Start
//!
//! ```no_run
//! use satrun::{OutputFormat, Study, aggregate_study, generate_report};
//!
//! let study = Study::new("runs", ["1x1", "4x4"], ["knight_20.cnf"])?;
//! let aggregate = aggregate_study(&study)?;
//! print!("{}", generate_report(&aggregate, OutputFormat::Text)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export stats
pub use satrun_stats::{
    Aggregate, AggregateError, ConfigurationId, DocumentError, Metric, MetricError, MetricTable,
    MetricValue, RunMetrics, STATISTICS_FILE_NAME, StatisticsDocument, Study, StudyError,
    aggregate_study, aggregate_with, load_run_metrics,
};

// Re-export report
pub use satrun_report::{OutputFormat, SinkError, TableSink, TableView, emit, generate_report};

// Re-export CLI entry points
pub use satrun_cli::{Cli, Commands, SatrunConfig, run, run_with_cli};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Aggregate, Metric, MetricValue, OutputFormat, Study, aggregate_study};
}
