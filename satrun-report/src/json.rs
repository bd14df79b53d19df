//! JSON Output

use crate::sink::{SinkError, TableSink, TableView, emit};
use satrun_stats::{Aggregate, MetricValue};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Complete JSON document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonReport {
    /// Column labels
    pub configurations: Vec<String>,
    /// Row labels
    pub instances: Vec<String>,
    /// One entry per metric
    pub tables: Vec<JsonTable>,
}

/// One metric table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonTable {
    /// Metric key
    pub metric: String,
    /// Metric title
    pub title: String,
    /// One entry per instance
    pub rows: Vec<JsonRow>,
}

/// One instance row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRow {
    /// Instance name
    pub instance: String,
    /// One value per configuration
    pub values: Vec<MetricValue>,
}

/// Collects tables and writes one pretty-printed document on finish
pub struct JsonSink<W: Write> {
    writer: W,
    report: JsonReport,
}

impl<W: Write> JsonSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            report: JsonReport::default(),
        }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TableSink for JsonSink<W> {
    fn write_table(&mut self, table: &TableView<'_>) -> Result<(), SinkError> {
        if self.report.tables.is_empty() {
            self.report.configurations = table.columns.to_vec();
            self.report.instances = table.rows.to_vec();
        }
        self.report.tables.push(JsonTable {
            metric: table.name.to_string(),
            title: table.title.to_string(),
            rows: table
                .iter_rows()
                .map(|(instance, values)| JsonRow {
                    instance: instance.to_string(),
                    values: values.to_vec(),
                })
                .collect(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(&mut self.writer, &self.report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Generate a prettified JSON report.
pub fn generate_json_report(aggregate: &Aggregate) -> Result<String, SinkError> {
    let mut sink = JsonSink::new(Vec::new());
    emit(aggregate, &mut sink)?;
    Ok(String::from_utf8_lossy(&sink.into_inner()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_aggregate;

    #[test]
    fn test_json_round_trips_values() {
        let output = generate_json_report(&sample_aggregate()).unwrap();
        let report: JsonReport = serde_json::from_str(&output).unwrap();

        assert_eq!(report.configurations, ["1x1", "4x4"]);
        assert_eq!(report.instances, ["a.cnf", "b.cnf"]);
        assert_eq!(report.tables.len(), 8);
        assert_eq!(report.tables[0].metric, "cycles");
        assert_eq!(
            report.tables[0].rows[1].values,
            [MetricValue::Integer(300), MetricValue::Integer(210)]
        );
        assert_eq!(report.tables[1].rows[0].values[0], MetricValue::Real(3.0));
    }

    #[test]
    fn test_json_keeps_integer_and_real_shapes() {
        let output = generate_json_report(&sample_aggregate()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert!(value["tables"][0]["rows"][0]["values"][0].is_u64());
        assert!(value["tables"][1]["rows"][0]["values"][0].is_f64());
    }
}
