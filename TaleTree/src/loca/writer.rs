//! Language file writing

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::borrow::Cow;
use std::path::Path;

use super::TranslationStore;
use crate::error::Result;

/// Escape only the characters required in XML text content (not attributes).
/// In text content, only < and & need escaping. Apostrophes and quotes are fine.
fn escape_text_minimal(s: &str) -> Cow<'_, str> {
    if s.contains('&') || s.contains('<') {
        Cow::Owned(s.replace('&', "&amp;").replace('<', "&lt;"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Write a language file to disk
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub fn write_language<P: AsRef<Path>>(path: P, store: &TranslationStore) -> Result<()> {
    let xml = language_to_xml(store)?;
    std::fs::write(path, xml)?;
    Ok(())
}

/// Serialize a [`TranslationStore`] to an XML string
///
/// Entries are written in authoring order; empty values become
/// self-closing elements.
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn language_to_xml(store: &TranslationStore) -> Result<String> {
    let mut output = Vec::new();
    let mut writer = Writer::new_with_indent(&mut output, b'\t', 1);

    // XML declaration
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    // <language name="...">
    let mut root = BytesStart::new("language");
    root.push_attribute(("name", store.name()));
    writer.write_event(Event::Start(root))?;

    for entry in store.entries() {
        let mut element = BytesStart::new("entry");
        element.push_attribute(("key", entry.key.as_str()));

        if entry.value.is_empty() {
            // Self-closing for empty values
            writer.write_event(Event::Empty(element))?;
        } else {
            writer.write_event(Event::Start(element.borrow()))?;
            // Use minimal escaping - only < and & need escaping in text content.
            let escaped = escape_text_minimal(&entry.value);
            writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
            writer.write_event(Event::End(BytesEnd::new("entry")))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("language")))?;

    let mut xml = String::from_utf8(output)?;
    // Add trailing newline
    xml.push('\n');
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::super::parse_language_xml;
    use super::*;

    #[test]
    fn test_round_trip_preserves_order_and_empty_values() {
        let mut store = TranslationStore::new("english");
        store.add("GREETING", "Hello");
        store.add("FAREWELL", "");
        store.add("QUOTE", "a & b < c");

        let xml = language_to_xml(&store).unwrap();
        let reread = parse_language_xml(&xml, "x").unwrap();

        assert_eq!(reread.name(), "english");
        assert_eq!(
            reread.keys().collect::<Vec<_>>(),
            vec!["GREETING", "FAREWELL", "QUOTE"]
        );
        assert_eq!(reread.lookup("FAREWELL"), "");
        assert_eq!(reread.lookup("QUOTE"), "a & b < c");
    }
}
