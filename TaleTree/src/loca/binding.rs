//! Key-bound text labels
//!
//! [`TextBindings`] associates localization keys with resolved display
//! strings, the way in-scene text objects bind to keys in the original
//! tooling. A binding re-resolves when its key changes and when the
//! active language changes (via [`watch`] + [`refresh_all`]).
//!
//! [`watch`]: TextBindings::watch
//! [`refresh_all`]: TextBindings::refresh_all

use std::cell::Cell;
use std::rc::Rc;

use super::{LocalizationBroadcaster, SubscriberId};

/// Handle to one bound label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingId(usize);

#[derive(Debug)]
struct Label {
    key: String,
    resolved: String,
}

/// A set of key→text bindings that follow the active language
#[derive(Debug, Default)]
pub struct TextBindings {
    labels: Vec<Option<Label>>,
    dirty: Rc<Cell<bool>>,
}

impl TextBindings {
    /// Create an empty binding set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live bindings
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if no bindings are live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind a key, resolving it immediately
    pub fn bind(
        &mut self,
        key: impl Into<String>,
        broadcaster: &LocalizationBroadcaster,
    ) -> BindingId {
        let key = key.into();
        let resolved = broadcaster.translate(&key).to_string();
        self.labels.push(Some(Label { key, resolved }));
        BindingId(self.labels.len() - 1)
    }

    /// Drop a binding; its id becomes invalid
    pub fn release(&mut self, id: BindingId) {
        if let Some(slot) = self.labels.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Change a binding's key and re-resolve it
    ///
    /// Setting the same key again is a no-op.
    pub fn set_key(
        &mut self,
        id: BindingId,
        key: impl Into<String>,
        broadcaster: &LocalizationBroadcaster,
    ) {
        let key = key.into();
        if let Some(Some(label)) = self.labels.get_mut(id.0) {
            if label.key == key {
                return;
            }
            label.resolved = broadcaster.translate(&key).to_string();
            label.key = key;
        }
    }

    /// The resolved display text for a binding
    #[must_use]
    pub fn text(&self, id: BindingId) -> Option<&str> {
        match self.labels.get(id.0) {
            Some(Some(label)) => Some(label.resolved.as_str()),
            _ => None,
        }
    }

    /// The key a binding resolves
    #[must_use]
    pub fn key(&self, id: BindingId) -> Option<&str> {
        match self.labels.get(id.0) {
            Some(Some(label)) => Some(label.key.as_str()),
            _ => None,
        }
    }

    /// Subscribe to the broadcaster so language changes mark this set dirty
    ///
    /// The bindings cannot re-resolve from inside the callback (resolution
    /// needs the broadcaster itself), so the callback raises a flag and the
    /// owner calls [`refresh_all`](Self::refresh_all) on its next tick.
    pub fn watch(&self, broadcaster: &LocalizationBroadcaster) -> SubscriberId {
        let dirty = self.dirty.clone();
        broadcaster.subscribe(move || dirty.set(true))
    }

    /// Check whether a watched language change is pending
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Re-resolve every binding against the active language
    pub fn refresh_all(&mut self, broadcaster: &LocalizationBroadcaster) {
        for label in self.labels.iter_mut().flatten() {
            label.resolved = broadcaster.translate(&label.key).to_string();
        }
        self.dirty.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::super::{LanguageRegistry, TranslationStore};
    use super::*;

    fn broadcaster() -> LocalizationBroadcaster {
        let mut registry = LanguageRegistry::new();
        let mut english = TranslationStore::new("english");
        english.add("GREETING", "Hello");
        let mut german = TranslationStore::new("german");
        german.add("GREETING", "Hallo");
        registry.insert(english);
        registry.insert(german);
        LocalizationBroadcaster::with_default(registry, "english")
    }

    #[test]
    fn test_bind_resolves_immediately() {
        let broadcaster = broadcaster();
        let mut bindings = TextBindings::new();
        let id = bindings.bind("GREETING", &broadcaster);
        assert_eq!(bindings.text(id), Some("Hello"));

        // Unknown keys fall back to themselves
        let miss = bindings.bind("MISSING", &broadcaster);
        assert_eq!(bindings.text(miss), Some("MISSING"));
    }

    #[test]
    fn test_language_change_marks_dirty_and_refresh_reresolves() {
        let mut broadcaster = broadcaster();
        let mut bindings = TextBindings::new();
        let id = bindings.bind("GREETING", &broadcaster);
        bindings.watch(&broadcaster);
        assert!(!bindings.is_dirty());

        broadcaster.set_language("german");
        assert!(bindings.is_dirty());
        assert_eq!(bindings.text(id), Some("Hello"));

        bindings.refresh_all(&broadcaster);
        assert!(!bindings.is_dirty());
        assert_eq!(bindings.text(id), Some("Hallo"));
    }

    #[test]
    fn test_set_key_reresolves() {
        let broadcaster = broadcaster();
        let mut bindings = TextBindings::new();
        let id = bindings.bind("GREETING", &broadcaster);
        bindings.set_key(id, "MISSING", &broadcaster);
        assert_eq!(bindings.text(id), Some("MISSING"));
        assert_eq!(bindings.key(id), Some("MISSING"));
    }

    #[test]
    fn test_release_invalidates_id() {
        let broadcaster = broadcaster();
        let mut bindings = TextBindings::new();
        let id = bindings.bind("GREETING", &broadcaster);
        bindings.release(id);
        assert_eq!(bindings.text(id), None);
        assert!(bindings.is_empty());
    }
}
