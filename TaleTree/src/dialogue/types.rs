//! Dialogue graph data types
//!
//! A graph is an arena of nodes; successors are addressed by arena index
//! rather than by name, so response wiring is an explicit
//! `response index → optional node` mapping on each node. Graphs are
//! authored offline and never mutated during play.

/// Arena index identifying a node within its graph
pub type NodeId = usize;

/// One selectable player choice, optionally wired to a successor node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Localization key of the choice text
    pub key: String,
    /// The node this choice leads to; `None` means unwired
    pub next: Option<NodeId>,
}

/// One unit of dialogue: a speaker, a prompt, and its response options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueNode {
    /// Authoring name, kept for diagnostics
    pub name: String,
    /// Speaker name; resolved through the broadcaster like any key
    pub speaker: String,
    /// Localization key of the prompt text
    pub prompt_key: String,
    /// Ordered response options
    pub responses: Vec<Response>,
    /// Whether this node is a graph-start candidate
    pub entry: bool,
}

/// A directed graph of dialogue nodes with an optional designated start
#[derive(Debug, Clone, Default)]
pub struct DialogueGraph {
    nodes: Vec<DialogueNode>,
    init_node: Option<NodeId>,
}

impl DialogueGraph {
    /// Build a graph from an arena of nodes
    ///
    /// Successor indices are the caller's responsibility here; the JSON
    /// parser validates name wiring before constructing the arena.
    #[must_use]
    pub fn from_nodes(nodes: Vec<DialogueNode>, init_node: Option<NodeId>) -> Self {
        Self { nodes, init_node }
    }

    /// Count total nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by arena index
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    /// Nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &DialogueNode> {
        self.nodes.iter()
    }

    /// Find a node's arena index by its authoring name
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|node| node.name == name)
    }

    /// The designated init node, if any
    #[must_use]
    pub fn init_node(&self) -> Option<NodeId> {
        self.init_node
    }

    /// Find the node a session should start on
    ///
    /// The first node in declaration order with the entry flag wins;
    /// without one, the designated init node is used. `None` on an empty
    /// or unmarked graph — the caller decides how to fail.
    #[must_use]
    pub fn entry_node(&self) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.entry)
            .or(self.init_node)
    }

    /// The node wired to response `index` of `node`
    ///
    /// `None` when the response is unwired, the index is out of range, or
    /// the node id is invalid.
    #[must_use]
    pub fn response_target(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.nodes
            .get(node)
            .and_then(|n| n.responses.get(index))
            .and_then(|response| response.next)
    }
}
