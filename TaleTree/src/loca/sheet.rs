//! Translation sheet workflow
//!
//! Export a language to TSV for translators, import the filled sheet back.
//!
//! # Sheet Format
//!
//! Tab-separated (or comma-separated) values, easy to edit in any
//! spreadsheet application.
//!
//! Columns:
//! 1. Key
//! 2. Source text (the exported language's value)
//! 3. Translation (empty on export, filled by the translator)
//!
//! # Example
//!
//! ```tsv
//! Key\tSource\tTranslation
//! GREETING\tHello\t
//! FAREWELL\tGoodbye\t
//! ```

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::TranslationStore;
use crate::error::Result;

/// Export format for translation sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Tab-separated values (recommended for spreadsheets)
    Tsv,
    /// Comma-separated values
    Csv,
}

impl SheetFormat {
    /// Get the file extension for this format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Csv => "csv",
        }
    }

    /// Get the delimiter character
    #[must_use]
    pub fn delimiter(&self) -> char {
        match self {
            Self::Tsv => '\t',
            Self::Csv => ',',
        }
    }
}

/// Result of importing a translation sheet
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// Number of entries updated with translations
    pub translated: usize,
    /// Number of rows with an empty translation column
    pub skipped: usize,
    /// Number of keys not found in the target store
    pub not_found: usize,
    /// Keys that were not found
    pub missing_keys: Vec<String>,
}

/// Export a language to a translation sheet
///
/// Writes one row per entry with the translation column empty, ready for
/// a translator to fill.
///
/// # Returns
/// The number of rows written.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn export_sheet<P: AsRef<Path>>(
    source: &TranslationStore,
    path: P,
    format: SheetFormat,
) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    let delimiter = format.delimiter();

    // Write header
    writeln!(writer, "Key{delimiter}Source{delimiter}Translation")?;

    // Write entries
    for entry in source.entries() {
        let escaped = escape_for_delimited(&entry.value, delimiter);
        writeln!(writer, "{}{delimiter}{}{delimiter}", entry.key, escaped)?;
    }

    writer.flush()?;
    Ok(source.len())
}

/// Export a sheet with the target language's existing translations filled in
///
/// Useful for review passes: the source column carries the source
/// language, the translation column whatever the target already has.
///
/// # Returns
/// The number of rows written.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn export_sheet_with_existing<P: AsRef<Path>>(
    source: &TranslationStore,
    target: &TranslationStore,
    path: P,
    format: SheetFormat,
) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    let delimiter = format.delimiter();

    writeln!(writer, "Key{delimiter}Source{delimiter}Translation")?;

    for entry in source.entries() {
        let escaped_source = escape_for_delimited(&entry.value, delimiter);
        let translation = target
            .get(&entry.key)
            .map(|value| escape_for_delimited(value, delimiter))
            .unwrap_or_default();

        writeln!(
            writer,
            "{}{delimiter}{}{delimiter}{}",
            entry.key, escaped_source, translation
        )?;
    }

    writer.flush()?;
    Ok(source.len())
}

/// Import translations from a sheet into a store
///
/// Only rows with a non-empty translation column update the store; keys
/// missing from the store are reported, not created (adding keys stays
/// an explicit editing operation).
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn import_sheet<P: AsRef<Path>>(
    store: &mut TranslationStore,
    path: P,
    format: SheetFormat,
) -> Result<ImportReport> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let delimiter = format.delimiter();

    let mut report = ImportReport {
        translated: 0,
        skipped: 0,
        not_found: 0,
        missing_keys: Vec::new(),
    };

    let mut lines = reader.lines();

    // Skip header
    if lines.next().is_none() {
        return Ok(report);
    }

    for line_result in lines {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(delimiter).collect();
        if parts.len() < 3 {
            continue; // Skip malformed lines
        }

        let key = parts[0].trim();
        let translation = unescape_from_delimited(parts[2].trim());

        if translation.is_empty() {
            report.skipped += 1;
            continue;
        }

        if store.has_key(key) {
            store.set_value(key, translation)?;
            report.translated += 1;
        } else {
            report.not_found += 1;
            report.missing_keys.push(key.to_string());
        }
    }

    tracing::info!(
        "imported sheet into '{}': {} translated, {} skipped, {} unknown keys",
        store.name(),
        report.translated,
        report.skipped,
        report.not_found
    );
    Ok(report)
}

// ============================================================================
// Helper functions
// ============================================================================

/// Escape text for TSV/CSV output
fn escape_for_delimited(text: &str, delimiter: char) -> String {
    // If text contains delimiter, newlines, or quotes, wrap in quotes and escape quotes
    if text.contains(delimiter) || text.contains('\n') || text.contains('\r') || text.contains('"')
    {
        let escaped = text.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        text.to_string()
    }
}

/// Unescape text from TSV/CSV input
fn unescape_from_delimited(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        // Remove surrounding quotes and unescape internal quotes
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_unescape() {
        let original = "Hello\tworld";
        let escaped = escape_for_delimited(original, '\t');
        assert!(escaped.starts_with('"'));

        let unescaped = unescape_from_delimited(&escaped);
        assert_eq!(original, unescaped);
    }

    #[test]
    fn test_escape_quotes() {
        let original = "Say \"hello\"";
        let escaped = escape_for_delimited(original, '\t');
        assert_eq!(escaped, "\"Say \"\"hello\"\"\"");

        let unescaped = unescape_from_delimited(&escaped);
        assert_eq!(original, unescaped);
    }
}
