//! Language file reading and parsing
//!
//! Language assets are XML files with one `<entry>` per key:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <language name="english">
//!     <entry key="GREETING">Hello</entry>
//!     <entry key="FAREWELL"/>
//! </language>
//! ```

use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs;
use std::path::Path;

use super::{TranslationEntry, TranslationStore};
use crate::error::{Error, Result};

/// Read a language file from disk
///
/// The store name comes from the `name` attribute of the root element,
/// falling back to the file stem when absent.
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Xml`] if
/// it is not well-formed XML.
pub fn read_language<P: AsRef<Path>>(path: P) -> Result<TranslationStore> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_language_xml(&content, &fallback)
}

/// Parse language XML into a [`TranslationStore`]
///
/// Text content keeps leading/trailing whitespace; duplicate keys keep
/// the first occurrence (see [`TranslationStore::from_entries`]).
///
/// # Errors
/// Returns [`Error::Xml`] on malformed XML.
pub fn parse_language_xml(content: &str, fallback_name: &str) -> Result<TranslationStore> {
    let mut reader = Reader::from_str(content);
    // Don't trim text - preserve trailing/leading whitespace in localization strings
    reader.trim_text(false);

    let mut name = String::new();
    let mut entries = Vec::new();
    let mut buf = Vec::new();

    // Current entry being parsed
    let mut current_key: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"language" => {
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.as_ref() == b"name" {
                            name = String::from_utf8_lossy(&attr.value).into_owned();
                        }
                    }
                }
                b"entry" => {
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.as_ref() == b"key" {
                            current_key = Some(String::from_utf8_lossy(&attr.value).into_owned());
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                // Text content inside <entry> element
                if let Some(key) = current_key.take() {
                    let value = e.unescape().map_err(Error::Xml)?;
                    entries.push(TranslationEntry {
                        key,
                        value: value.into_owned(),
                    });
                }
            }
            Ok(Event::Empty(e)) => {
                // Self-closing <entry key="..."/> element (empty value)
                if e.name().as_ref() == b"entry" {
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.as_ref() == b"key" {
                            entries.push(TranslationEntry {
                                key: String::from_utf8_lossy(&attr.value).into_owned(),
                                value: String::new(),
                            });
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                // Handle </entry> with no text content
                if e.name().as_ref() == b"entry"
                    && let Some(key) = current_key.take()
                {
                    entries.push(TranslationEntry {
                        key,
                        value: String::new(),
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if name.is_empty() {
        name = fallback_name.to_string();
    }

    Ok(TranslationStore::from_entries(name, entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<language name="english">
	<entry key="GREETING">Hello</entry>
	<entry key="FAREWELL"/>
</language>
"#;
        let store = parse_language_xml(xml, "fallback").unwrap();
        assert_eq!(store.name(), "english");
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("GREETING"), "Hello");
        assert_eq!(store.lookup("FAREWELL"), "");
    }

    #[test]
    fn test_parse_falls_back_to_file_stem_name() {
        let xml = "<language><entry key=\"K\">v</entry></language>";
        let store = parse_language_xml(xml, "german").unwrap();
        assert_eq!(store.name(), "german");
    }

    #[test]
    fn test_parse_preserves_whitespace_and_escapes() {
        let xml = "<language name=\"english\"><entry key=\"K\"> a &amp; b </entry></language>";
        let store = parse_language_xml(xml, "x").unwrap();
        assert_eq!(store.lookup("K"), " a & b ");
    }
}
