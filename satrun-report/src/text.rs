//! Plain Text Output
//!
//! ```text
//! configs: 1x1 4x4
//! a.cnf 120 96
//! b.cnf 300 210
//!
//! ```

use crate::sink::{SinkError, TableSink, TableView, emit};
use satrun_stats::Aggregate;
use std::io::Write;

/// Writes space-separated tables, each followed by a blank line
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TableSink for TextSink<W> {
    fn write_table(&mut self, table: &TableView<'_>) -> Result<(), SinkError> {
        writeln!(self.writer, "configs: {}", table.columns.join(" "))?;
        for (row, values) in table.iter_rows() {
            write!(self.writer, "{}", row)?;
            for value in values {
                write!(self.writer, " {}", value)?;
            }
            writeln!(self.writer)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Render every metric table as plain text
pub fn generate_text_report(aggregate: &Aggregate) -> Result<String, SinkError> {
    let mut sink = TextSink::new(Vec::new());
    emit(aggregate, &mut sink)?;
    Ok(String::from_utf8_lossy(&sink.into_inner()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_aggregate;

    #[test]
    fn test_text_layout() {
        let output = generate_text_report(&sample_aggregate()).unwrap();
        let tables: Vec<&str> = output.split("\n\n").filter(|t| !t.is_empty()).collect();
        assert_eq!(tables.len(), 8);

        let first: Vec<&str> = tables[0].lines().collect();
        assert_eq!(first, ["configs: 1x1 4x4", "a.cnf 120 96", "b.cnf 300 210"]);

        let second: Vec<&str> = tables[1].lines().collect();
        assert_eq!(second[1], "a.cnf 3.0 2.5");
    }

    #[test]
    fn test_every_table_has_header_and_one_line_per_instance() {
        let aggregate = sample_aggregate();
        let output = generate_text_report(&aggregate).unwrap();

        for table in output.split("\n\n").filter(|t| !t.is_empty()) {
            let lines: Vec<&str> = table.lines().collect();
            assert_eq!(lines.len(), 1 + aggregate.instances.len());
            for line in &lines[1..] {
                assert_eq!(
                    line.split(' ').count(),
                    1 + aggregate.configurations.len()
                );
            }
        }
    }

    #[test]
    fn test_no_trailing_whitespace() {
        let output = generate_text_report(&sample_aggregate()).unwrap();
        assert!(output.lines().all(|l| !l.ends_with(' ')));
        assert!(output.ends_with("\n\n"));
    }
}
