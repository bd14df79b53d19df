//! Markdown Output

use crate::sink::{SinkError, TableSink, TableView, emit};
use satrun_stats::Aggregate;
use std::io::Write;

/// Writes one `###` section with a pipe table per metric
pub struct MarkdownSink<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TableSink for MarkdownSink<W> {
    fn write_table(&mut self, table: &TableView<'_>) -> Result<(), SinkError> {
        writeln!(self.writer, "### {}", table.title)?;
        writeln!(self.writer)?;

        write!(self.writer, "| instance |")?;
        for column in table.columns {
            write!(self.writer, " {} |", column)?;
        }
        writeln!(self.writer)?;

        write!(self.writer, "|----------|")?;
        for column in table.columns {
            write!(self.writer, "{}:|", "-".repeat(column.len() + 1))?;
        }
        writeln!(self.writer)?;

        for (row, values) in table.iter_rows() {
            write!(self.writer, "| {} |", row.replace('|', "\\|"))?;
            for value in values {
                write!(self.writer, " {} |", value)?;
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

/// Render every metric table as Markdown
pub fn generate_markdown_report(aggregate: &Aggregate) -> Result<String, SinkError> {
    let mut sink = MarkdownSink::new(Vec::new());
    emit(aggregate, &mut sink)?;
    Ok(String::from_utf8_lossy(&sink.into_inner()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_aggregate;

    #[test]
    fn test_markdown_layout() {
        let output = generate_markdown_report(&sample_aggregate()).unwrap();

        assert!(output.starts_with("### Total cycles\n\n"));
        assert!(output.contains("| instance | 1x1 | 4x4 |\n"));
        assert!(output.contains("|----------|----:|----:|\n"));
        assert!(output.contains("| a.cnf | 120 | 96 |\n"));
        assert!(output.contains("### Clause idle rate"));
        assert_eq!(output.matches("### ").count(), 8);
    }
}
