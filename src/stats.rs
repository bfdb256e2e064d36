//! Per-archive statistics and the CSV table they are written to.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::error::{Error, Result};

/// Column names, in serialization order.
pub const HEADER: [&str; 5] = [
    "file",
    "num_words",
    "num_paragraphs",
    "num_chars",
    "extraction_time",
];

/// One row of the statistics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRecord {
    /// Archive file name.
    pub file: String,
    /// Whitespace-separated tokens in the cleaned text.
    pub num_words: usize,
    /// Occurrences of `\n\n` plus one; an empty text counts as one paragraph.
    pub num_paragraphs: usize,
    /// Unicode scalar values in the cleaned text.
    pub num_chars: usize,
    /// Wall-clock seconds from extraction start to text ready.
    pub extraction_time: f64,
}

impl StatsRecord {
    /// Compute the counts for `text`.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use tex2corpus::StatsRecord;
    ///
    /// let record = StatsRecord::from_text("2401.00001.tar.gz", "One two.\n\nThree.", Duration::ZERO);
    /// assert_eq!((record.num_words, record.num_paragraphs, record.num_chars), (3, 2, 16));
    /// ```
    #[must_use]
    pub fn from_text(file: impl Into<String>, text: &str, elapsed: Duration) -> Self {
        Self {
            file: file.into(),
            num_words: text.split_whitespace().count(),
            num_paragraphs: text.matches("\n\n").count() + 1,
            num_chars: text.chars().count(),
            extraction_time: elapsed.as_secs_f64(),
        }
    }
}

/// In-memory statistics table, flushed once at the end of a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
    records: Vec<StatsRecord>,
}

impl StatsTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn push(&mut self, record: StatsRecord) {
        self.records.push(record);
    }

    /// Rows in insertion order.
    #[must_use]
    pub fn records(&self) -> &[StatsRecord] {
        &self.records
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no rows were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the header row followed by every record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Csv`] if serialization or the underlying writer fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(HEADER)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Write the table to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be created, and the errors
    /// of [`StatsTable::write_csv`].
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        self.write_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_csv(table: &StatsTable) -> String {
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn counts_follow_text_shape() {
        let record = StatsRecord::from_text("a.tar.gz", "Alpha beta\n\ngamma.\n\nDelta", Duration::ZERO);
        assert_eq!(record.num_words, 4);
        assert_eq!(record.num_paragraphs, 3);
        assert_eq!(record.num_chars, 25);
    }

    #[test]
    fn empty_text_is_one_paragraph() {
        let record = StatsRecord::from_text("e.tar.gz", "", Duration::ZERO);
        assert_eq!((record.num_words, record.num_paragraphs, record.num_chars), (0, 1, 0));
    }

    #[test]
    fn chars_not_bytes_are_counted() {
        let record = StatsRecord::from_text("u.tar.gz", "naïve", Duration::ZERO);
        assert_eq!(record.num_chars, 5);
    }

    #[test]
    fn empty_table_writes_header_only() {
        assert_eq!(
            to_csv(&StatsTable::new()),
            "file,num_words,num_paragraphs,num_chars,extraction_time\n"
        );
    }

    #[test]
    fn rows_follow_header() {
        let mut table = StatsTable::new();
        table.push(StatsRecord::from_text("x.tar.gz", "a b", Duration::from_millis(1500)));
        let csv = to_csv(&table);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "x.tar.gz,2,1,3,1.5");
    }
}
