//! Delimited text output: one header line, one line per row.
//!
//! # Format
//!
//! ```text
//! Timestamp;Framecount;SessionID;Email;speed
//! 2026-10-19 10:02:11.0420;118;8f2c…;anonymous;3.5000
//! 2026-10-19 10:02:11.0581;119;8f2c…;anonymous;NULL
//! ```
//!
//! Fields are never quoted or escaped: a value that contains the field
//! separator will shift the columns of its line.  Callers that log free text
//! should pick a separator that cannot occur in it.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::LogResult;

/// Literal written for a column that received no value in a row.
pub const NULL: &str = "NULL";

/// Separators used when rendering a table as text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextFormat {
    /// Byte between two fields.  Default `;`.
    pub field_separator: u8,
    /// Byte ending every line.  Default `\n`.
    pub line_terminator: u8,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self { field_separator: b';', line_terminator: b'\n' }
    }
}

impl TextFormat {
    /// A format with a custom field separator and the default `\n` terminator.
    pub fn with_separator(field_separator: u8) -> Self {
        Self { field_separator, ..Self::default() }
    }

    /// Fresh line writer for this format.
    pub fn writer(&self) -> LineWriter {
        LineWriter::new(*self)
    }

    /// Join `fields` into one line *without* the trailing terminator.
    pub fn join<I, T>(&self, fields: I) -> LogResult<String>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let fields: Vec<T> = fields.into_iter().collect();
        if fields.is_empty() {
            return Ok(String::new());
        }
        let mut writer = self.writer();
        writer.write_line(fields)?;
        let mut line = writer.into_text()?;
        if line.as_bytes().last() == Some(&self.line_terminator) {
            line.pop();
        }
        Ok(line)
    }
}

// ── LineWriter ────────────────────────────────────────────────────────────────

/// Accumulates delimited lines in memory.
///
/// Wraps a `csv::Writer<Vec<u8>>` configured for [`TextFormat`] with quoting
/// disabled.  Records may differ in length; alignment is the caller's job.
pub struct LineWriter {
    inner:  csv::Writer<Vec<u8>>,
    format: TextFormat,
    lines:  usize,
}

impl LineWriter {
    pub fn new(format: TextFormat) -> Self {
        Self { inner: Self::encoder(format, Vec::new()), format, lines: 0 }
    }

    fn encoder(format: TextFormat, buf: Vec<u8>) -> csv::Writer<Vec<u8>> {
        WriterBuilder::new()
            .delimiter(format.field_separator)
            .terminator(Terminator::Any(format.line_terminator))
            .quote_style(QuoteStyle::Never)
            .flexible(true)
            .from_writer(buf)
    }

    pub fn format(&self) -> TextFormat {
        self.format
    }

    /// Number of lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Append one terminated line.
    ///
    /// A line with no content (zero fields, or a single empty one) is just the
    /// terminator.  `csv` would write it as `""`.
    pub fn write_line<I, T>(&mut self, fields: I) -> LogResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let fields: Vec<T> = fields.into_iter().collect();
        match fields.as_slice() {
            [] => self.write_bare_terminator()?,
            [only] if only.as_ref().is_empty() => self.write_bare_terminator()?,
            _ => self.inner.write_record(&fields)?,
        }
        self.lines += 1;
        Ok(())
    }

    fn write_bare_terminator(&mut self) -> LogResult<()> {
        let done = std::mem::replace(&mut self.inner, Self::encoder(self.format, Vec::new()));
        let mut bytes = done.into_inner().map_err(into_csv_error)?;
        bytes.push(self.format.line_terminator);
        self.inner = Self::encoder(self.format, bytes);
        Ok(())
    }

    /// Copy of everything written so far.
    pub fn text(&mut self) -> LogResult<String> {
        self.inner.flush().map_err(csv::Error::from)?;
        Ok(String::from_utf8(self.inner.get_ref().clone())?)
    }

    /// Consume the writer and return its text.
    pub fn into_text(self) -> LogResult<String> {
        let bytes = self.inner.into_inner().map_err(into_csv_error)?;
        Ok(String::from_utf8(bytes)?)
    }
}

fn into_csv_error<W>(e: csv::IntoInnerError<W>) -> csv::Error {
    csv::Error::from(std::io::Error::new(e.error().kind(), e.error().to_string()))
}

impl std::fmt::Debug for LineWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineWriter")
            .field("format", &self.format)
            .field("lines", &self.lines)
            .finish()
    }
}
