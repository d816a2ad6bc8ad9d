//! # TaleTree
//!
//! A branching-dialogue runtime and localization toolkit for games.
//!
//! ## What's Here
//!
//! - **Dialogue graphs** - arena-indexed node graphs with response wiring,
//!   loaded from JSON
//! - **Dialogue sessions** - a state machine that walks a graph, renders
//!   nodes through the active language, and follows response selections
//! - **Translation stores** - per-language key→value tables with
//!   duplicate-key resolution and fallback-to-key lookup
//! - **Language registry** - keeps every language's key set synchronized,
//!   loads/saves XML language files
//! - **Localization broadcaster** - current-language state with
//!   synchronous change notification
//! - **Translation sheets** - TSV/CSV export/import for translators
//!
//! ## Quick Start
//!
//! ### Resolving localized text
//!
//! ```
//! use taletree::loca::{LanguageRegistry, LocalizationBroadcaster, TranslationStore};
//!
//! let mut english = TranslationStore::new("english");
//! english.add("GREETING", "Hello");
//! let mut german = TranslationStore::new("german");
//! german.add("GREETING", "Hallo");
//!
//! let mut registry = LanguageRegistry::new();
//! registry.insert(english);
//! registry.insert(german);
//!
//! let mut localization = LocalizationBroadcaster::with_default(registry, "english");
//! assert_eq!(localization.translate("GREETING"), "Hello");
//!
//! localization.set_language("german");
//! assert_eq!(localization.translate("GREETING"), "Hallo");
//! // Missing keys fall back to themselves
//! assert_eq!(localization.translate("MISSING"), "MISSING");
//! ```
//!
//! ### Keeping language key sets aligned
//!
//! ```
//! use taletree::loca::{LanguageRegistry, TranslationStore};
//!
//! let mut registry = LanguageRegistry::new();
//! let mut english = TranslationStore::new("english");
//! english.add("GREETING", "Hello");
//! registry.insert(english);
//! registry.insert(TranslationStore::new("german"));
//!
//! let report = registry.sync_from("english")?;
//! assert_eq!(report.keys_added, 1);
//! assert!(registry.get("german").unwrap().has_key("GREETING"));
//! # Ok::<(), taletree::Error>(())
//! ```
//!
//! ### Walking a dialogue graph
//!
//! See [`dialogue`] for the session state machine and the
//! [`DialoguePresenter`](dialogue::DialoguePresenter) surface contract.

pub mod dialogue;
pub mod error;
pub mod loca;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::loca::{
        LanguageRegistry, ListenerSet, LocalizationBroadcaster, SubscriberId, SyncReport,
        TextBindings, TranslationEntry, TranslationStore,
    };
    pub use crate::loca::{export_sheet, import_sheet, ImportReport, SheetFormat};
    pub use crate::loca::{read_language, write_language};

    pub use crate::dialogue::{
        read_graph, DialogueGraph, DialogueNode, DialoguePresenter, DialogueSession, DisplayPoll,
        NodeId, Response, SessionState, Step,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
