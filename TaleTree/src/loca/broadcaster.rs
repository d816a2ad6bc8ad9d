//! Current-language state and change broadcasting
//!
//! [`LocalizationBroadcaster`] is an explicitly constructed, explicitly
//! owned service: it holds the [`LanguageRegistry`], the name of the
//! active language, and the subscriber set. Construct it once at startup
//! and pass it by reference to whatever resolves text.
//!
//! Notification is synchronous and registration-ordered: every subscriber
//! runs to completion before [`set_language`] returns, so a caller that
//! switches language and immediately resolves a key sees the new value.
//!
//! [`set_language`]: LocalizationBroadcaster::set_language

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{LanguageRegistry, TranslationStore};

/// Handle returned by [`ListenerSet::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

#[derive(Default)]
struct ListenerInner {
    next_id: u64,
    listeners: Vec<(SubscriberId, Rc<dyn Fn()>)>,
}

/// Shared registry of zero-argument change callbacks
///
/// The set is a cheap cloneable handle; clones observe the same
/// subscribers. Notification iterates a snapshot and re-checks liveness
/// before each call, so a callback may unsubscribe itself (or any other
/// subscriber) mid-dispatch without corrupting iteration.
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Rc<RefCell<ListenerInner>>,
}

impl ListenerSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback, invoked on every language change
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> SubscriberId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriberId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(callback)));
        id
    }

    /// Remove a callback
    ///
    /// # Returns
    /// `true` if the subscriber was present.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
        inner.listeners.len() != before
    }

    /// Invoke every live subscriber in registration order
    pub fn notify(&self) {
        // Snapshot first: callbacks may mutate the set while we dispatch.
        let snapshot: Vec<(SubscriberId, Rc<dyn Fn()>)> =
            self.inner.borrow().listeners.clone();

        for (id, callback) in snapshot {
            let alive = self
                .inner
                .borrow()
                .listeners
                .iter()
                .any(|(listener_id, _)| *listener_id == id);
            if alive {
                callback();
            }
        }
    }

    /// Get the number of subscribers
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Check if the set has no subscribers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().listeners.is_empty()
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// Process-wide current-language state with change notification
#[derive(Debug, Default)]
pub struct LocalizationBroadcaster {
    registry: LanguageRegistry,
    current: Option<String>,
    listeners: ListenerSet,
}

impl LocalizationBroadcaster {
    /// Create a broadcaster with no active language
    #[must_use]
    pub fn new(registry: LanguageRegistry) -> Self {
        Self {
            registry,
            current: None,
            listeners: ListenerSet::new(),
        }
    }

    /// Create a broadcaster and activate the default language
    ///
    /// An unknown default leaves no language active (lookups fall back to
    /// the key) rather than failing startup.
    #[must_use]
    pub fn with_default(registry: LanguageRegistry, default_language: &str) -> Self {
        let mut broadcaster = Self::new(registry);
        if broadcaster.registry.get(default_language).is_some() {
            broadcaster.current = Some(default_language.to_string());
        } else {
            tracing::warn!("default language '{default_language}' is not registered");
        }
        broadcaster
    }

    /// The owned language registry
    #[must_use]
    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Mutable access to the registry for editing operations
    pub fn registry_mut(&mut self) -> &mut LanguageRegistry {
        &mut self.registry
    }

    /// Name of the active language, if any
    #[must_use]
    pub fn current_language(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The active store, if a registered language is active
    #[must_use]
    pub fn current_store(&self) -> Option<&TranslationStore> {
        self.current.as_deref().and_then(|name| self.registry.get(name))
    }

    /// Switch the active language and notify subscribers
    ///
    /// A no-op when the name is unknown or already current. Subscribers
    /// run synchronously, in registration order, before this returns.
    pub fn set_language(&mut self, name: &str) {
        if self.current.as_deref() == Some(name) {
            return;
        }
        if self.registry.get(name).is_none() {
            tracing::warn!("cannot switch to unknown language '{name}'");
            return;
        }

        self.current = Some(name.to_string());
        tracing::info!("language changed to: {name}");
        self.listeners.notify();
    }

    /// Resolve a key through the active language
    ///
    /// Falls back to the key itself when no language is active or the key
    /// is missing from the active store.
    #[must_use]
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        match self.current_store() {
            Some(store) => store.lookup(key),
            None => key,
        }
    }

    /// A cloneable handle to the subscriber set
    ///
    /// Callbacks that need to unsubscribe themselves capture a clone of
    /// this handle.
    #[must_use]
    pub fn listeners(&self) -> ListenerSet {
        self.listeners.clone()
    }

    /// Register a language-change callback
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> SubscriberId {
        self.listeners.subscribe(callback)
    }

    /// Remove a language-change callback
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::super::TranslationStore;
    use super::*;

    fn broadcaster_with(languages: &[(&str, &[(&str, &str)])]) -> LocalizationBroadcaster {
        let mut registry = LanguageRegistry::new();
        for (name, entries) in languages {
            let mut store = TranslationStore::new(*name);
            for (key, value) in *entries {
                store.add(*key, *value);
            }
            registry.insert(store);
        }
        LocalizationBroadcaster::new(registry)
    }

    #[test]
    fn test_translate_without_language_returns_key() {
        let broadcaster = broadcaster_with(&[]);
        assert_eq!(broadcaster.translate("GREETING"), "GREETING");
    }

    #[test]
    fn test_set_language_is_immediately_visible() {
        let mut broadcaster = broadcaster_with(&[
            ("english", &[("GREETING", "Hello")]),
            ("german", &[("GREETING", "Hallo")]),
        ]);

        broadcaster.set_language("english");
        assert_eq!(broadcaster.translate("GREETING"), "Hello");

        broadcaster.set_language("german");
        assert_eq!(broadcaster.translate("GREETING"), "Hallo");
    }

    #[test]
    fn test_set_language_ignores_unknown_and_same() {
        let mut broadcaster = broadcaster_with(&[("english", &[])]);
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        broadcaster.subscribe(move || seen.set(seen.get() + 1));

        broadcaster.set_language("klingon");
        assert_eq!(broadcaster.current_language(), None);
        assert_eq!(count.get(), 0);

        broadcaster.set_language("english");
        assert_eq!(count.get(), 1);

        // Re-selecting the current language does not notify
        broadcaster.set_language("english");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_notification_order_is_registration_order() {
        let mut broadcaster = broadcaster_with(&[("english", &[])]);
        let order = Rc::new(RefCell::new(Vec::new()));
        for label in ["first", "second", "third"] {
            let order = order.clone();
            broadcaster.subscribe(move || order.borrow_mut().push(label));
        }

        broadcaster.set_language("english");
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_during_own_callback() {
        let mut broadcaster =
            broadcaster_with(&[("english", &[]), ("german", &[])]);
        let listeners = broadcaster.listeners();
        let count = Rc::new(Cell::new(0));

        let own_id = Rc::new(Cell::new(None));
        let id = {
            let count = count.clone();
            let own_id = own_id.clone();
            let listeners = listeners.clone();
            broadcaster.subscribe(move || {
                count.set(count.get() + 1);
                if let Some(id) = own_id.get() {
                    listeners.unsubscribe(id);
                }
            })
        };
        own_id.set(Some(id));

        broadcaster.set_language("english");
        assert_eq!(count.get(), 1);

        // The self-removed subscriber never fires again
        broadcaster.set_language("german");
        assert_eq!(count.get(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_unsubscribing_a_later_subscriber_skips_it_this_round() {
        let set = ListenerSet::new();
        let second_calls = Rc::new(Cell::new(0));

        let second_id = Rc::new(Cell::new(None));
        {
            let set = set.clone();
            let second_id = second_id.clone();
            set.clone().subscribe(move || {
                if let Some(id) = second_id.get() {
                    set.unsubscribe(id);
                }
            });
        }
        let id = {
            let second_calls = second_calls.clone();
            set.subscribe(move || second_calls.set(second_calls.get() + 1))
        };
        second_id.set(Some(id));

        set.notify();
        assert_eq!(second_calls.get(), 0);
    }
}
