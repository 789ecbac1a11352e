//! One row of the monitor's CSV export.

use std::io::BufRead;

use csv::StringRecord;

use rzw_common::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Exact header the monitor writes for its default column set.
pub const EXPECTED_HEADER: [&str; 7] = [
    "Time of Day",
    "Process Name",
    "PID",
    "Operation",
    "Path",
    "Result",
    "Detail",
];

/// A raw, unvalidated monitor event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub time_of_day: String,
    pub process_name: String,
    pub pid: String,
    pub operation: String,
    pub path: String,
    pub result: String,
    pub detail: String,
}

impl RawRecord {
    /// Build a record from a CSV row; `None` unless it has exactly 7 fields.
    pub fn from_csv(row: &StringRecord) -> Option<Self> {
        if row.len() != EXPECTED_HEADER.len() {
            return None;
        }
        Some(RawRecord {
            time_of_day: row[0].to_string(),
            process_name: row[1].to_string(),
            pid: row[2].to_string(),
            operation: row[3].to_string(),
            path: row[4].to_string(),
            result: row[5].to_string(),
            detail: row[6].to_string(),
        })
    }
}

/// Whether a header row matches [`EXPECTED_HEADER`] exactly.
///
/// A UTF-8 byte-order mark on the first column is tolerated.
pub fn header_matches(row: &StringRecord) -> bool {
    row.len() == EXPECTED_HEADER.len()
        && row.iter().zip(EXPECTED_HEADER).enumerate().all(|(idx, (got, want))| {
            let got = if idx == 0 {
                got.trim_start_matches('\u{feff}')
            } else {
                got
            };
            got == want
        })
}

/// Splits an export into CSV records, tracking physical line numbers.
///
/// A record continues onto the next line while it holds an unbalanced
/// quote, so quoted Detail text may contain line breaks. A blank line is a
/// record with no fields. A UTF-8 byte-order mark before the header is
/// dropped.
pub struct RecordReader<R> {
    input: R,
    source_name: String,
    line: u64,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(input: R, source_name: impl Into<String>) -> Self {
        RecordReader {
            input,
            source_name: source_name.into(),
            line: 0,
        }
    }

    /// Next record and the 1-based line it starts on; `None` at end of input.
    pub fn next_record(&mut self) -> Result<Option<(u64, StringRecord)>> {
        let start = self.line + 1;
        let mut text = Vec::new();
        let mut quotes = 0usize;
        loop {
            let before = text.len();
            if self.input.read_until(b'\n', &mut text)? == 0 {
                break;
            }
            if self.line == 0 && text.starts_with(UTF8_BOM) {
                text.drain(..UTF8_BOM.len());
            }
            self.line += 1;
            quotes += text[before..].iter().filter(|&&b| b == b'"').count();
            if quotes % 2 == 0 {
                break;
            }
        }
        if text.is_empty() {
            return Ok(None);
        }

        let text = String::from_utf8(text)
            .map_err(|e| Error::format_at(self.source_name.as_str(), start, e.to_string()))?;
        if text.trim_end_matches(|c| c == '\r' || c == '\n').is_empty() {
            return Ok(Some((start, StringRecord::new())));
        }

        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut record = StringRecord::new();
        csv.read_record(&mut record)
            .map_err(|e| Error::format_at(self.source_name.as_str(), start, e.to_string()))?;
        Ok(Some((start, record)))
    }
}
