//! CSV Output
//!
//! One block per metric: a `# title` comment line, a header line and one line
//! per instance. Blocks are separated by a blank line.

use crate::sink::{SinkError, TableSink, TableView, emit};
use satrun_stats::Aggregate;
use std::io::Write;

/// Writes comma-separated tables
pub struct CsvSink<W: Write> {
    writer: Option<csv::Writer<W>>,
}

impl<W: Write> CsvSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(Self::build(writer)),
        }
    }

    fn build(writer: W) -> csv::Writer<W> {
        csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer)
    }

    fn csv(&mut self) -> &mut csv::Writer<W> {
        self.writer.as_mut().expect("csv writer present")
    }

    /// Write directly to the underlying writer, bypassing the record writer
    fn raw(&mut self, f: impl FnOnce(&mut W) -> std::io::Result<()>) -> Result<(), SinkError> {
        let mut inner = self
            .writer
            .take()
            .expect("csv writer present")
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))?;
        let result = f(&mut inner);
        self.writer = Some(Self::build(inner));
        result?;
        Ok(())
    }

    /// Flush buffered records and recover the writer
    pub fn into_inner(mut self) -> Result<W, SinkError> {
        self.writer
            .take()
            .expect("csv writer present")
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }
}

impl<W: Write> TableSink for CsvSink<W> {
    fn write_table(&mut self, table: &TableView<'_>) -> Result<(), SinkError> {
        // Comment and separator lines bypass the record writer
        self.csv().flush()?;
        self.raw(|w| writeln!(w, "# {}", table.title))?;

        self.csv().write_record(
            std::iter::once("instance").chain(table.columns.iter().map(String::as_str)),
        )?;
        for (row, values) in table.iter_rows() {
            let fields: Vec<String> = std::iter::once(row.to_string())
                .chain(values.iter().map(|v| v.to_string()))
                .collect();
            self.csv().write_record(&fields)?;
        }

        self.csv().flush()?;
        self.raw(|w| writeln!(w))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.csv().flush()?;
        Ok(())
    }
}

/// Render every metric table as CSV
pub fn generate_csv_report(aggregate: &Aggregate) -> Result<String, SinkError> {
    let mut sink = CsvSink::new(Vec::new());
    emit(aggregate, &mut sink)?;
    Ok(String::from_utf8_lossy(&sink.into_inner()?).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_aggregate;

    #[test]
    fn test_csv_quotes_instance_names() {
        let mut aggregate = sample_aggregate();
        aggregate.instances = vec!["a,b.cnf".to_string(), "say \"hi\".cnf".to_string()];

        let output = generate_csv_report(&aggregate).unwrap();
        let first: Vec<&str> = output.split("\n\n").next().unwrap().lines().collect();

        assert_eq!(
            first,
            [
                "# Total cycles",
                "instance,1x1,4x4",
                "\"a,b.cnf\",120,96",
                "\"say \"\"hi\"\".cnf\",300,210",
            ]
        );
    }

    #[test]
    fn test_csv_layout() {
        let output = generate_csv_report(&sample_aggregate()).unwrap();
        let first: Vec<&str> = output.split("\n\n").next().unwrap().lines().collect();

        assert_eq!(
            first,
            ["# Total cycles", "instance,1x1,4x4", "a.cnf,120,96", "b.cnf,300,210"]
        );
        assert_eq!(output.matches("instance,1x1,4x4").count(), 8);
        assert!(output.ends_with(",0.125\n\n"));
    }
}
