//! Error types for `TaleTree`

use thiserror::Error;

/// The error type for `TaleTree` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Translation Store Errors ====================
    /// The key does not exist in the store; `add` is the only operation
    /// that creates keys.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The key that was looked up.
        key: String,
    },

    // ==================== Language Registry Errors ====================
    /// No language with this name is registered.
    #[error("language not found: {name}")]
    LanguageNotFound {
        /// The requested language name.
        name: String,
    },

    /// A registry operation that requires a selected language was called
    /// without one.
    #[error("no language selected")]
    NoLanguageSelected,

    // ==================== Dialogue Graph Errors ====================
    /// Two nodes in a graph file share the same name.
    #[error("duplicate node name: {name}")]
    DuplicateNode {
        /// The duplicated node name.
        name: String,
    },

    /// A response points at a node name that does not exist in the graph.
    #[error("node '{from}' wires a response to unknown node '{to}'")]
    UnknownSuccessor {
        /// Name of the node holding the response.
        from: String,
        /// The missing successor name.
        to: String,
    },

    /// A node name referenced outside of response wiring (e.g. the
    /// designated init node) does not exist in the graph.
    #[error("unknown node: {name}")]
    UnknownNode {
        /// The missing node name.
        name: String,
    },

    // ==================== Dialogue Session Errors ====================
    /// The graph has no discoverable entry node; the session cannot start.
    #[error("graph has no entry node")]
    MissingEntryNode,

    /// The selected response has no wired successor; the session has
    /// ended and the presentation surface was hidden.
    #[error("response {index} of node {node} has no wired successor")]
    DanglingResponse {
        /// Arena index of the node that was displaying.
        node: usize,
        /// The selected response index.
        index: usize,
    },

    /// A response was selected while the session was not displaying a node.
    #[error("session is not displaying a node")]
    SessionNotActive,

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttr(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

// Add conversion from quick_xml::events::attributes::AttrError
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(err.to_string())
    }
}

/// A specialized Result type for `TaleTree` operations.
pub type Result<T> = std::result::Result<T, Error>;
