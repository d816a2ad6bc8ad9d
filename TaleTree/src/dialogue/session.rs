//! Dialogue session state machine
//!
//! A [`DialogueSession`] walks a [`DialogueGraph`]: it holds the current
//! node cursor, renders node content through the localization
//! broadcaster, and moves the cursor when a response is selected. The
//! session is `Idle` until started, `Displaying` while a node is on
//! screen, and `Ended` after an explicit end, a dangling response, or a
//! failed start.
//!
//! Display can lag a transition (the surface may not be on screen yet);
//! such renders hand back a [`RenderTicket`] the driver polls each tick.
//! Every transition bumps a generation counter, so tickets from before a
//! transition resolve to [`DisplayPoll::Cancelled`] instead of resuming
//! against stale state.

use super::types::{DialogueGraph, DialogueNode, NodeId};
use crate::error::{Error, Result};
use crate::loca::LocalizationBroadcaster;

/// Presentation surface contract
///
/// The user-facing layer implements this; the session drives it. The
/// surface reports whether it is on screen via
/// [`is_active`](Self::is_active) — surfaces that appear instantly can
/// keep the default.
pub trait DialoguePresenter {
    /// Present a node: resolved speaker, prompt, and one selectable
    /// action per response
    fn show_dialogue(&mut self, speaker: &str, prompt: &str, responses: &[String]);

    /// Dismiss the surface
    fn hide(&mut self);

    /// Whether the surface is currently on screen
    fn is_active(&self) -> bool {
        true
    }
}

/// Where the session cursor is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not started
    Idle,
    /// A node is on screen
    Displaying(NodeId),
    /// Torn down; no current node
    Ended,
}

/// Token for a render whose surface was not yet on screen
///
/// Compare via [`DialogueSession::poll_display`]; any newer transition
/// invalidates older tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket {
    generation: u64,
}

/// Outcome of a successful transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The node rendered and the surface is on screen
    Displayed(NodeId),
    /// The node rendered but the surface is still appearing; poll the
    /// ticket each tick
    AwaitingDisplay(RenderTicket),
}

/// Result of polling a [`RenderTicket`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPoll {
    /// The surface is on screen; the wait is over
    Ready,
    /// Still waiting; poll again next tick
    Pending(RenderTicket),
    /// A newer transition superseded this ticket; drop it
    Cancelled,
}

/// Graph walker holding the current-node cursor
#[derive(Debug)]
pub struct DialogueSession<'graph> {
    graph: &'graph DialogueGraph,
    state: SessionState,
    generation: u64,
}

impl<'graph> DialogueSession<'graph> {
    /// Create an idle session over a graph
    #[must_use]
    pub fn new(graph: &'graph DialogueGraph) -> Self {
        Self {
            graph,
            state: SessionState::Idle,
            generation: 0,
        }
    }

    /// The current state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Arena index of the node on screen, if displaying
    #[must_use]
    pub fn current_node(&self) -> Option<NodeId> {
        match self.state {
            SessionState::Displaying(id) => Some(id),
            _ => None,
        }
    }

    /// Whether the session is displaying a node
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Displaying(_))
    }

    /// Start (or restart) the session at the graph's entry node
    ///
    /// Cancels any pending display wait from a previous run.
    ///
    /// # Errors
    /// Returns [`Error::MissingEntryNode`] if the graph has no
    /// discoverable entry node; the session transitions to `Ended` and
    /// never displays.
    pub fn start(
        &mut self,
        localization: &LocalizationBroadcaster,
        presenter: &mut impl DialoguePresenter,
    ) -> Result<Step> {
        self.generation += 1;

        let entry = self
            .graph
            .entry_node()
            .and_then(|id| self.graph.node(id).map(|node| (id, node)));

        match entry {
            Some((id, node)) => {
                self.state = SessionState::Displaying(id);
                Ok(self.render(id, node, localization, presenter))
            }
            None => {
                tracing::warn!("no starting node found in the graph");
                self.state = SessionState::Ended;
                Err(Error::MissingEntryNode)
            }
        }
    }

    /// Select a response on the displayed node
    ///
    /// A wired successor moves the cursor and re-renders. An unwired or
    /// out-of-range response ends the session and hides the surface.
    ///
    /// # Errors
    /// Returns [`Error::SessionNotActive`] outside of `Displaying`, and
    /// [`Error::DanglingResponse`] on the unwired path (the session is
    /// `Ended` when it returns).
    pub fn select_response(
        &mut self,
        index: usize,
        localization: &LocalizationBroadcaster,
        presenter: &mut impl DialoguePresenter,
    ) -> Result<Step> {
        let SessionState::Displaying(current) = self.state else {
            return Err(Error::SessionNotActive);
        };

        // Any pending display wait is now stale.
        self.generation += 1;

        let target = self
            .graph
            .response_target(current, index)
            .and_then(|next| self.graph.node(next).map(|node| (next, node)));

        match target {
            Some((next, node)) => {
                self.state = SessionState::Displaying(next);
                Ok(self.render(next, node, localization, presenter))
            }
            None => {
                tracing::warn!("response {index} of node {current} is not connected");
                self.state = SessionState::Ended;
                presenter.hide();
                Err(Error::DanglingResponse {
                    node: current,
                    index,
                })
            }
        }
    }

    /// End the session explicitly
    ///
    /// Always succeeds, from any state; clears the cursor and hides the
    /// surface.
    pub fn end(&mut self, presenter: &mut impl DialoguePresenter) {
        self.generation += 1;
        self.state = SessionState::Ended;
        presenter.hide();
        tracing::debug!("dialogue ended");
    }

    /// Re-render the displayed node (e.g. after a language change)
    ///
    /// # Errors
    /// Returns [`Error::SessionNotActive`] outside of `Displaying`.
    pub fn refresh(
        &mut self,
        localization: &LocalizationBroadcaster,
        presenter: &mut impl DialoguePresenter,
    ) -> Result<Step> {
        let SessionState::Displaying(id) = self.state else {
            return Err(Error::SessionNotActive);
        };
        let Some(node) = self.graph.node(id) else {
            return Err(Error::SessionNotActive);
        };
        Ok(self.render(id, node, localization, presenter))
    }

    /// Poll a pending display wait
    ///
    /// Tickets issued before the most recent transition resolve to
    /// [`DisplayPoll::Cancelled`] so stale waits never resume.
    #[must_use]
    pub fn poll_display(
        &self,
        ticket: RenderTicket,
        presenter: &impl DialoguePresenter,
    ) -> DisplayPoll {
        if ticket.generation != self.generation {
            return DisplayPoll::Cancelled;
        }
        if presenter.is_active() {
            DisplayPoll::Ready
        } else {
            DisplayPoll::Pending(ticket)
        }
    }

    /// Resolve a node's strings and hand them to the surface
    fn render(
        &self,
        id: NodeId,
        node: &DialogueNode,
        localization: &LocalizationBroadcaster,
        presenter: &mut impl DialoguePresenter,
    ) -> Step {
        let speaker = localization.translate(&node.speaker);
        let prompt = localization.translate(&node.prompt_key);
        let responses: Vec<String> = node
            .responses
            .iter()
            .map(|response| localization.translate(&response.key).to_string())
            .collect();

        tracing::debug!(
            "displaying node '{}' with {} responses",
            node.name,
            responses.len()
        );
        presenter.show_dialogue(speaker, prompt, &responses);

        if presenter.is_active() {
            Step::Displayed(id)
        } else {
            Step::AwaitingDisplay(RenderTicket {
                generation: self.generation,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::Response;
    use super::*;
    use crate::loca::{LanguageRegistry, TranslationStore};

    #[derive(Default)]
    struct RecordingPresenter {
        shown: Vec<(String, String, Vec<String>)>,
        hides: usize,
        active: bool,
        /// When false, showing does not activate the surface (simulates a
        /// surface that takes a tick to appear).
        instant: bool,
    }

    impl RecordingPresenter {
        fn instant() -> Self {
            Self {
                instant: true,
                ..Self::default()
            }
        }
    }

    impl DialoguePresenter for RecordingPresenter {
        fn show_dialogue(&mut self, speaker: &str, prompt: &str, responses: &[String]) {
            self.shown
                .push((speaker.to_string(), prompt.to_string(), responses.to_vec()));
            if self.instant {
                self.active = true;
            }
        }

        fn hide(&mut self) {
            self.active = false;
            self.hides += 1;
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    fn localization() -> LocalizationBroadcaster {
        let mut store = TranslationStore::new("english");
        store.add("N1_PROMPT", "What'll it be?");
        store.add("R1", "A pint");
        store.add("R2", "Nothing");
        store.add("N2_PROMPT", "Coming right up.");
        let mut registry = LanguageRegistry::new();
        registry.insert(store);
        LocalizationBroadcaster::with_default(registry, "english")
    }

    /// N1 (entry, R1 → N2, R2 unwired), N2 (no responses)
    fn two_node_graph() -> DialogueGraph {
        DialogueGraph::from_nodes(
            vec![
                DialogueNode {
                    name: "n1".to_string(),
                    speaker: "BARKEEP".to_string(),
                    prompt_key: "N1_PROMPT".to_string(),
                    responses: vec![
                        Response {
                            key: "R1".to_string(),
                            next: Some(1),
                        },
                        Response {
                            key: "R2".to_string(),
                            next: None,
                        },
                    ],
                    entry: true,
                },
                DialogueNode {
                    name: "n2".to_string(),
                    speaker: "BARKEEP".to_string(),
                    prompt_key: "N2_PROMPT".to_string(),
                    responses: vec![],
                    entry: false,
                },
            ],
            None,
        )
    }

    #[test]
    fn test_start_displays_entry_node() {
        let graph = two_node_graph();
        let localization = localization();
        let mut presenter = RecordingPresenter::instant();
        let mut session = DialogueSession::new(&graph);

        let step = session.start(&localization, &mut presenter).unwrap();
        assert_eq!(step, Step::Displayed(0));
        assert_eq!(session.state(), SessionState::Displaying(0));

        let (speaker, prompt, responses) = &presenter.shown[0];
        assert_eq!(speaker, "BARKEEP");
        assert_eq!(prompt, "What'll it be?");
        assert_eq!(responses, &vec!["A pint".to_string(), "Nothing".to_string()]);
    }

    #[test]
    fn test_wired_response_advances() {
        let graph = two_node_graph();
        let localization = localization();
        let mut presenter = RecordingPresenter::instant();
        let mut session = DialogueSession::new(&graph);

        session.start(&localization, &mut presenter).unwrap();
        let step = session
            .select_response(0, &localization, &mut presenter)
            .unwrap();
        assert_eq!(step, Step::Displayed(1));
        assert_eq!(session.current_node(), Some(1));
        assert_eq!(presenter.shown[1].1, "Coming right up.");
    }

    #[test]
    fn test_dangling_response_ends_and_hides() {
        let graph = two_node_graph();
        let localization = localization();
        let mut presenter = RecordingPresenter::instant();
        let mut session = DialogueSession::new(&graph);

        session.start(&localization, &mut presenter).unwrap();
        let result = session.select_response(1, &localization, &mut presenter);
        assert!(matches!(
            result,
            Err(Error::DanglingResponse { node: 0, index: 1 })
        ));
        assert_eq!(session.state(), SessionState::Ended);
        assert_eq!(presenter.hides, 1);
        assert!(!presenter.is_active());
    }

    #[test]
    fn test_out_of_range_response_is_dangling() {
        let graph = two_node_graph();
        let localization = localization();
        let mut presenter = RecordingPresenter::instant();
        let mut session = DialogueSession::new(&graph);

        session.start(&localization, &mut presenter).unwrap();
        let result = session.select_response(7, &localization, &mut presenter);
        assert!(matches!(result, Err(Error::DanglingResponse { .. })));
        assert_eq!(session.state(), SessionState::Ended);
    }

    #[test]
    fn test_empty_graph_never_displays() {
        let graph = DialogueGraph::default();
        let localization = localization();
        let mut presenter = RecordingPresenter::instant();
        let mut session = DialogueSession::new(&graph);

        let result = session.start(&localization, &mut presenter);
        assert!(matches!(result, Err(Error::MissingEntryNode)));
        assert_eq!(session.state(), SessionState::Ended);
        assert!(presenter.shown.is_empty());
    }

    #[test]
    fn test_select_outside_displaying_fails_fast() {
        let graph = two_node_graph();
        let localization = localization();
        let mut presenter = RecordingPresenter::instant();
        let mut session = DialogueSession::new(&graph);

        assert!(matches!(
            session.select_response(0, &localization, &mut presenter),
            Err(Error::SessionNotActive)
        ));
    }

    #[test]
    fn test_end_clears_cursor() {
        let graph = two_node_graph();
        let localization = localization();
        let mut presenter = RecordingPresenter::instant();
        let mut session = DialogueSession::new(&graph);

        session.start(&localization, &mut presenter).unwrap();
        session.end(&mut presenter);
        assert_eq!(session.state(), SessionState::Ended);
        assert_eq!(session.current_node(), None);
        assert_eq!(presenter.hides, 1);

        // Ending an idle session also succeeds
        let mut idle = DialogueSession::new(&graph);
        idle.end(&mut presenter);
        assert_eq!(idle.state(), SessionState::Ended);
    }

    #[test]
    fn test_deferred_display_polls_until_surface_appears() {
        let graph = two_node_graph();
        let localization = localization();
        let mut presenter = RecordingPresenter::default();
        let mut session = DialogueSession::new(&graph);

        let step = session.start(&localization, &mut presenter).unwrap();
        let Step::AwaitingDisplay(ticket) = step else {
            panic!("surface is not instant, expected a pending display");
        };

        assert_eq!(
            session.poll_display(ticket, &presenter),
            DisplayPoll::Pending(ticket)
        );

        // The surface comes on screen a tick later
        presenter.active = true;
        assert_eq!(session.poll_display(ticket, &presenter), DisplayPoll::Ready);
    }

    #[test]
    fn test_transition_cancels_pending_display() {
        let graph = two_node_graph();
        let localization = localization();
        let mut presenter = RecordingPresenter::default();
        let mut session = DialogueSession::new(&graph);

        let Step::AwaitingDisplay(stale) = session.start(&localization, &mut presenter).unwrap()
        else {
            panic!("expected a pending display");
        };

        // A new input arrives before the surface appeared
        presenter.active = true;
        session
            .select_response(0, &localization, &mut presenter)
            .unwrap();

        assert_eq!(session.poll_display(stale, &presenter), DisplayPoll::Cancelled);
    }

    #[test]
    fn test_refresh_rerenders_current_node() {
        let graph = two_node_graph();
        let localization = localization();
        let mut presenter = RecordingPresenter::instant();
        let mut session = DialogueSession::new(&graph);

        session.start(&localization, &mut presenter).unwrap();
        session.refresh(&localization, &mut presenter).unwrap();
        assert_eq!(presenter.shown.len(), 2);
        assert_eq!(presenter.shown[0], presenter.shown[1]);
    }
}
