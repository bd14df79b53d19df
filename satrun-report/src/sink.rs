//! Table Sinks
//!
//! A sink accepts named tables of rows x columns x values. Aggregation knows
//! nothing about sinks; [`emit`] walks an [`Aggregate`] and hands every metric
//! table to the sink in report order.

use satrun_stats::{Aggregate, MetricValue};
use thiserror::Error;

/// Errors raised while writing tables
#[derive(Debug, Error)]
pub enum SinkError {
    /// The underlying writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV record could not be written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One named table, borrowed from an aggregate
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    /// Machine-readable table name
    pub name: &'a str,
    /// Human-readable title
    pub title: &'a str,
    /// Column labels
    pub columns: &'a [String],
    /// Row labels
    pub rows: &'a [String],
    /// `values[row][column]`
    pub values: &'a [Vec<MetricValue>],
}

impl<'a> TableView<'a> {
    /// Iterate `(row label, row values)` pairs
    pub fn iter_rows(&self) -> impl Iterator<Item = (&'a str, &'a [MetricValue])> + 'a {
        self.rows
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }
}

/// Destination for named tables
pub trait TableSink {
    /// Accept one table
    fn write_table(&mut self, table: &TableView<'_>) -> Result<(), SinkError>;

    /// Called once after the last table
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Feed every metric table of an aggregate to a sink, then finish it
pub fn emit(aggregate: &Aggregate, sink: &mut dyn TableSink) -> Result<(), SinkError> {
    for table in &aggregate.tables {
        let view = TableView {
            name: table.metric.key(),
            title: table.metric.title(),
            columns: &aggregate.configurations,
            rows: &aggregate.instances,
            values: &table.values,
        };
        sink.write_table(&view)?;
    }
    sink.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use satrun_stats::{Metric, MetricTable};

    #[derive(Default)]
    struct Recorder {
        names: Vec<String>,
        shapes: Vec<(usize, usize)>,
        finished: bool,
    }

    impl TableSink for Recorder {
        fn write_table(&mut self, table: &TableView<'_>) -> Result<(), SinkError> {
            self.names.push(table.name.to_string());
            self.shapes.push((table.rows.len(), table.columns.len()));
            Ok(())
        }

        fn finish(&mut self) -> Result<(), SinkError> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn test_emit_visits_tables_in_metric_order() {
        let aggregate = Aggregate {
            configurations: vec!["1x1".to_string(), "4x4".to_string()],
            instances: vec!["a.cnf".to_string()],
            tables: Metric::ALL
                .iter()
                .map(|&metric| MetricTable {
                    metric,
                    values: vec![vec![MetricValue::Integer(1), MetricValue::Integer(2)]],
                })
                .collect(),
        };

        let mut recorder = Recorder::default();
        emit(&aggregate, &mut recorder).unwrap();

        let expected: Vec<_> = Metric::ALL.iter().map(|m| m.key().to_string()).collect();
        assert_eq!(recorder.names, expected);
        assert!(recorder.shapes.iter().all(|&shape| shape == (1, 2)));
        assert!(recorder.finished);
    }
}
