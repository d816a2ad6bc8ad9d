//! Language registry and key-set synchronization
//!
//! The registry owns every known [`TranslationStore`] and keeps their key
//! sets aligned: after [`LanguageRegistry::sync_from`], every other store
//! carries exactly the source store's keys (new keys arrive with empty
//! values, stale keys are dropped, surviving values are untouched).
//! The invariant is only recomputed on explicit sync calls, so stores may
//! diverge between syncs.

use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{read_language, write_language, TranslationStore};
use crate::error::{Error, Result};

/// Result of a key-set synchronization pass
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Name of the store the others were matched against
    pub source: String,
    /// Number of other stores visited
    pub languages_synced: usize,
    /// Keys added across all other stores
    pub keys_added: usize,
    /// Keys removed across all other stores
    pub keys_removed: usize,
}

/// The set of all known languages
///
/// Stores are kept in insertion order and addressed by language name.
/// Loading from source directories is cached until
/// [`invalidate_cache`](LanguageRegistry::invalidate_cache) is called.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    languages: IndexMap<String, TranslationStore>,
    sources: Vec<PathBuf>,
    loaded: bool,
    selected: Option<String>,
}

impl LanguageRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of registered languages
    #[must_use]
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Check if no languages are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Register a store, replacing any store with the same name
    pub fn insert(&mut self, store: TranslationStore) {
        self.languages.insert(store.name().to_string(), store);
    }

    /// Remove a language by name
    ///
    /// Clears the selection if the removed language was selected.
    pub fn remove(&mut self, name: &str) -> Option<TranslationStore> {
        let removed = self.languages.shift_remove(name);
        if removed.is_some() && self.selected.as_deref() == Some(name) {
            self.selected = None;
        }
        removed
    }

    /// Get a store by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TranslationStore> {
        self.languages.get(name)
    }

    /// Get a mutable store by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TranslationStore> {
        self.languages.get_mut(name)
    }

    /// Registered language names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Registered stores in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &TranslationStore> {
        self.languages.values()
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// The language designated as selected for editing operations
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Designate a language as selected
    ///
    /// # Errors
    /// Returns [`Error::LanguageNotFound`] if no such language exists.
    pub fn set_selected(&mut self, name: &str) -> Result<()> {
        if !self.languages.contains_key(name) {
            return Err(Error::LanguageNotFound {
                name: name.to_string(),
            });
        }
        self.selected = Some(name.to_string());
        Ok(())
    }

    /// Clear the selection
    pub fn clear_selected(&mut self) {
        self.selected = None;
    }

    // ========================================================================
    // Key-set synchronization
    // ========================================================================

    /// Make every other store's key set match the named store's
    ///
    /// Keys missing elsewhere are added with an empty value; keys absent
    /// from the source are removed. Values of surviving keys are never
    /// touched — only key presence is synchronized.
    ///
    /// # Errors
    /// Returns [`Error::LanguageNotFound`] if the source name is unknown.
    pub fn sync_from(&mut self, source: &str) -> Result<SyncReport> {
        let Some(source_store) = self.languages.get(source) else {
            return Err(Error::LanguageNotFound {
                name: source.to_string(),
            });
        };

        let source_keys: Vec<String> = source_store.keys().map(String::from).collect();
        let key_set: HashSet<&str> = source_keys.iter().map(String::as_str).collect();

        let mut report = SyncReport {
            source: source.to_string(),
            languages_synced: 0,
            keys_added: 0,
            keys_removed: 0,
        };

        let names: Vec<String> = self
            .languages
            .keys()
            .filter(|n| n.as_str() != source)
            .cloned()
            .collect();

        for name in names {
            let Some(store) = self.languages.get_mut(&name) else {
                continue;
            };

            // Ensure every source key is present
            for key in &source_keys {
                if !store.has_key(key) {
                    store.add(key.clone(), "");
                    report.keys_added += 1;
                }
            }

            // Remove keys that no longer exist in the source
            let stale: Vec<String> = store
                .keys()
                .filter(|k| !key_set.contains(k))
                .map(String::from)
                .collect();
            for key in stale {
                store.remove(&key);
                report.keys_removed += 1;
            }

            report.languages_synced += 1;
        }

        tracing::info!(
            "synced {} languages against '{}': +{} keys, -{} keys",
            report.languages_synced,
            report.source,
            report.keys_added,
            report.keys_removed
        );
        Ok(report)
    }

    /// [`sync_from`](Self::sync_from) against the selected language
    ///
    /// # Errors
    /// Returns [`Error::NoLanguageSelected`] if nothing is selected, or
    /// [`Error::LanguageNotFound`] if the selected language has since
    /// disappeared.
    pub fn sync_selected(&mut self) -> Result<SyncReport> {
        let Some(selected) = self.selected.clone() else {
            return Err(Error::NoLanguageSelected);
        };
        self.sync_from(&selected)
    }

    /// Union of keys across all stores, as a flat listing
    ///
    /// Duplicates across languages are preserved; this matches the
    /// flat-concatenation semantics selection UIs expect.
    #[must_use]
    pub fn all_keys(&self) -> Vec<String> {
        self.languages
            .values()
            .flat_map(|store| store.keys().map(String::from))
            .collect()
    }

    // ========================================================================
    // Loading and saving
    // ========================================================================

    /// Add a directory to scan for `*.xml` language files
    pub fn add_source<P: AsRef<Path>>(&mut self, dir: P) {
        let dir = dir.as_ref().to_path_buf();
        if !self.sources.contains(&dir) {
            self.sources.push(dir);
        }
    }

    /// Load every language file from the registered source directories
    ///
    /// Cached: after the first successful load this is a no-op until
    /// [`invalidate_cache`](Self::invalidate_cache). Files load in path
    /// order; a language name seen twice keeps the first file.
    ///
    /// # Returns
    /// The number of registered languages.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if a source directory cannot be read, or a
    /// parse error for a malformed language file.
    pub fn load_all(&mut self) -> Result<usize> {
        if self.loaded {
            return Ok(self.languages.len());
        }

        let mut paths = Vec::new();
        for dir in &self.sources {
            for dir_entry in std::fs::read_dir(dir)? {
                let path = dir_entry?.path();
                if path.extension().is_some_and(|ext| ext == "xml") {
                    paths.push(path);
                }
            }
        }
        paths.sort();

        for path in paths {
            let store = read_language(&path)?;
            if self.languages.contains_key(store.name()) {
                tracing::warn!(
                    "language '{}' already loaded, skipping {}",
                    store.name(),
                    path.display()
                );
                continue;
            }
            tracing::debug!("loaded language '{}' from {}", store.name(), path.display());
            self.insert(store);
        }

        self.loaded = true;
        tracing::info!("loaded {} languages", self.languages.len());
        Ok(self.languages.len())
    }

    /// Drop all loaded stores and force a reload on the next
    /// [`load_all`](Self::load_all)
    ///
    /// Unsaved edits are discarded. The selected-language *name* survives
    /// and is re-validated when next used.
    pub fn invalidate_cache(&mut self) {
        self.languages.clear();
        self.loaded = false;
    }

    /// Write every store to `dir` as `<name>.xml`
    ///
    /// # Returns
    /// The number of files written.
    ///
    /// # Errors
    /// Returns an error if any write fails.
    pub fn save_all<P: AsRef<Path>>(&self, dir: P) -> Result<usize> {
        let dir = dir.as_ref();
        for store in self.languages.values() {
            write_language(dir.join(format!("{}.xml", store.name())), store)?;
        }
        Ok(self.languages.len())
    }
}
