//! Output formatting for DNS rows.
//!
//! Rows arrive in batches of [`KeyedRecord`]s. Every format prints the key
//! as a leading `key` column followed by the nine record fields.

use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use pcapdns_core::{FieldDescriptor, FieldValue, KeyedRecord, OutputRecord};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table (default)
    Table,
    /// Comma-separated values
    Csv,
    /// JSON Lines (one JSON object per row)
    Json,
}

impl OutputFormat {
    /// Infer the format from a file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "json" | "jsonl" | "ndjson" => Some(OutputFormat::Json),
                "csv" => Some(OutputFormat::Csv),
                "txt" => Some(OutputFormat::Table),
                _ => None,
            })
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    key: i64,
    #[serde(flatten)]
    record: &'a OutputRecord,
}

/// Formats batches of rows.
pub struct OutputFormatter {
    format: OutputFormat,
    header_written: bool,
}

impl OutputFormatter {
    /// Create a new formatter with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            header_written: false,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Column names, key first.
    pub fn column_names() -> Vec<&'static str> {
        std::iter::once(FieldDescriptor::key())
            .chain(OutputRecord::schema())
            .map(|f| f.name)
            .collect()
    }

    /// Format a batch of rows and write it to the given writer.
    ///
    /// CSV writes its header once, before the first batch.
    pub fn write<W: Write>(&mut self, rows: &[KeyedRecord], writer: &mut W) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Table => self.write_table(rows, writer),
            OutputFormat::Csv => self.write_csv(rows, writer),
            OutputFormat::Json => self.write_json(rows, writer),
        }
    }

    /// Render one cell. NULL renders as an empty string.
    fn format_value(value: FieldValue<'_>) -> String {
        if value.is_null() {
            String::new()
        } else {
            value.to_string()
        }
    }

    fn cells(key: i64, record: &OutputRecord) -> Vec<String> {
        std::iter::once(FieldValue::Int64(key))
            .chain(record.values())
            .map(Self::format_value)
            .collect()
    }

    fn write_table<W: Write>(&self, rows: &[KeyedRecord], writer: &mut W) -> std::io::Result<()> {
        use comfy_table::{Cell, Table};

        if rows.is_empty() {
            return Ok(());
        }

        let mut table = Table::new();
        table.set_header(Self::column_names().into_iter().map(Cell::new));

        for (key, record) in rows {
            table.add_row(Self::cells(*key, record).into_iter().map(Cell::new));
        }

        writeln!(writer, "{table}")
    }

    fn write_csv<W: Write>(&mut self, rows: &[KeyedRecord], writer: &mut W) -> std::io::Result<()> {
        if !self.header_written {
            writeln!(writer, "{}", Self::column_names().join(","))?;
            self.header_written = true;
        }

        for (key, record) in rows {
            let values: Vec<String> = Self::cells(*key, record)
                .into_iter()
                .map(|value| {
                    // Escape commas and quotes
                    if value.contains(',') || value.contains('"') || value.contains('\n') {
                        format!("\"{}\"", value.replace('"', "\"\""))
                    } else {
                        value
                    }
                })
                .collect();
            writeln!(writer, "{}", values.join(","))?;
        }

        Ok(())
    }

    fn write_json<W: Write>(&self, rows: &[KeyedRecord], writer: &mut W) -> std::io::Result<()> {
        for (key, record) in rows {
            serde_json::to_writer(&mut *writer, &JsonRow { key: *key, record })?;
            writeln!(writer)?;
        }
        Ok(())
    }
}
