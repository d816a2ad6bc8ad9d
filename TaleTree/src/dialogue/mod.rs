//! Dialogue graph model and runtime
//!
//! # Overview
//!
//! Dialogue is authored as a directed graph:
//! - each node carries a speaker, a prompt key, and ordered responses
//! - each response optionally wires to a successor node by arena index
//! - an entry flag (or a designated init node) marks where play starts
//!
//! A [`DialogueSession`] walks the graph at runtime, resolving every
//! visible string through the [`LocalizationBroadcaster`] so the active
//! language can change mid-dialogue.
//!
//! # Usage
//!
//! ```no_run
//! use taletree::dialogue::{read_graph, DialogueSession};
//! use taletree::loca::{LanguageRegistry, LocalizationBroadcaster};
//! # struct Ui;
//! # impl taletree::dialogue::DialoguePresenter for Ui {
//! #     fn show_dialogue(&mut self, _: &str, _: &str, _: &[String]) {}
//! #     fn hide(&mut self) {}
//! # }
//!
//! let graph = read_graph("barkeep.json")?;
//! let mut registry = LanguageRegistry::new();
//! registry.add_source("languages/");
//! registry.load_all()?;
//! let localization = LocalizationBroadcaster::with_default(registry, "english");
//!
//! let mut ui = Ui;
//! let mut session = DialogueSession::new(&graph);
//! session.start(&localization, &mut ui)?;
//! session.select_response(0, &localization, &mut ui)?;
//! # Ok::<(), taletree::Error>(())
//! ```
//!
//! [`LocalizationBroadcaster`]: crate::loca::LocalizationBroadcaster

mod parser;
mod session;
mod types;

pub use parser::{parse_graph, read_graph};
pub use session::{
    DialoguePresenter, DialogueSession, DisplayPoll, RenderTicket, SessionState, Step,
};
pub use types::{DialogueGraph, DialogueNode, NodeId, Response};
