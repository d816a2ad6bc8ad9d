//! Dialogue graph file parsing
//!
//! Graphs are authored as JSON with name-wired nodes; parsing resolves
//! names to arena indices and rejects broken wiring up front, so play
//! never encounters an unknown node reference.
//!
//! ```json
//! {
//!     "init_node": "intro",
//!     "nodes": [
//!         {
//!             "name": "intro",
//!             "speaker": "BARKEEP",
//!             "prompt": "INTRO_PROMPT",
//!             "entry": true,
//!             "responses": [
//!                 { "key": "R_YES", "next": "cellar" },
//!                 { "key": "R_NO" }
//!             ]
//!         },
//!         { "name": "cellar", "speaker": "BARKEEP", "prompt": "CELLAR_PROMPT" }
//!     ]
//! }
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::types::{DialogueGraph, DialogueNode, NodeId, Response};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct GraphFile {
    #[serde(default)]
    init_node: Option<String>,
    #[serde(default)]
    nodes: Vec<NodeFile>,
}

#[derive(Debug, Deserialize)]
struct NodeFile {
    name: String,
    speaker: String,
    prompt: String,
    #[serde(default)]
    entry: bool,
    #[serde(default)]
    responses: Vec<ResponseFile>,
}

#[derive(Debug, Deserialize)]
struct ResponseFile {
    key: String,
    #[serde(default)]
    next: Option<String>,
}

/// Parse a dialogue graph from JSON
///
/// # Errors
/// Returns [`Error::Json`] on malformed JSON, [`Error::DuplicateNode`]
/// when two nodes share a name, [`Error::UnknownSuccessor`] when a
/// response wires to a missing node, and [`Error::UnknownNode`] when the
/// designated init node does not exist.
pub fn parse_graph(content: &str) -> Result<DialogueGraph> {
    let file: GraphFile = serde_json::from_str(content)?;

    // Name → arena index, rejecting duplicates
    let mut ids: HashMap<&str, NodeId> = HashMap::with_capacity(file.nodes.len());
    for (id, node) in file.nodes.iter().enumerate() {
        if ids.insert(node.name.as_str(), id).is_some() {
            return Err(Error::DuplicateNode {
                name: node.name.clone(),
            });
        }
    }

    let init_node = match &file.init_node {
        Some(name) => Some(*ids.get(name.as_str()).ok_or_else(|| Error::UnknownNode {
            name: name.clone(),
        })?),
        None => None,
    };

    let mut nodes = Vec::with_capacity(file.nodes.len());
    for node in &file.nodes {
        let mut responses = Vec::with_capacity(node.responses.len());
        for response in &node.responses {
            let next = match &response.next {
                Some(target) => {
                    Some(*ids.get(target.as_str()).ok_or_else(|| {
                        Error::UnknownSuccessor {
                            from: node.name.clone(),
                            to: target.clone(),
                        }
                    })?)
                }
                None => None,
            };
            responses.push(Response {
                key: response.key.clone(),
                next,
            });
        }

        nodes.push(DialogueNode {
            name: node.name.clone(),
            speaker: node.speaker.clone(),
            prompt_key: node.prompt.clone(),
            responses,
            entry: node.entry,
        });
    }

    tracing::debug!("parsed dialogue graph with {} nodes", nodes.len());
    Ok(DialogueGraph::from_nodes(nodes, init_node))
}

/// Read a dialogue graph from a JSON file
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read, plus everything
/// [`parse_graph`] can return.
pub fn read_graph<P: AsRef<Path>>(path: P) -> Result<DialogueGraph> {
    let content = std::fs::read_to_string(path)?;
    parse_graph(&content)
}
