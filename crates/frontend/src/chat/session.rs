//! Session state owned by the chat widget: transcript, artifact store and the
//! currently rendered artifact.

use super::classifier::{
    classify, Artifact, DispatchGate, RenderAction, TRANSPORT_ERROR_MESSAGE,
};
use super::model::TransportError;
use super::transcript::{Sender, Transcript};
use crate::artifacts::store::ArtifactStore;
use contracts::chat::{FilingArtifact, ResponseEnvelope, TableArtifact};

/// The artifact shown in the panel. Rendering a new one replaces it.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveArtifact {
    Table(TableArtifact),
    List(Vec<String>),
    Filing(FilingArtifact),
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    transcript: Transcript,
    store: ArtifactStore,
    active: Option<ActiveArtifact>,
    /// Bumped on every render so identical artifacts still re-render
    render_seq: u64,
    artifacts_visible: bool,
    gate: DispatchGate,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn active(&self) -> Option<&ActiveArtifact> {
        self.active.as_ref()
    }

    pub fn render_seq(&self) -> u64 {
        self.render_seq
    }

    pub fn artifacts_visible(&self) -> bool {
        self.artifacts_visible
    }

    pub fn gate(&self) -> &DispatchGate {
        &self.gate
    }

    /// Validate user input and record the user turn.
    ///
    /// Returns the message to send, or `None` for blank input (nothing is
    /// appended and no request must be made).
    pub fn begin_submit(&mut self, raw: &str) -> Option<String> {
        let message = raw.trim();
        if message.is_empty() {
            return None;
        }
        self.transcript.append_turn(Sender::User, message);
        self.transcript.set_pending(true);
        Some(message.to_string())
    }

    /// Apply the outcome of one request. Pending is released on every path.
    ///
    /// Responses are applied synchronously inside one signal update, so the
    /// gate only trips for a re-entrant `complete` issued while an apply is
    /// still on the stack (render hooks, or a holder of the session's gate).
    /// Returns `false` when the response was dropped for that reason.
    pub fn complete(&mut self, result: Result<ResponseEnvelope, TransportError>) -> bool {
        self.transcript.set_pending(false);

        let gate = self.gate.clone();
        let Some(_permit) = gate.try_enter() else {
            log::warn!("Response dropped: another response is being dispatched");
            return false;
        };

        match result {
            Ok(envelope) => {
                let actions = classify(envelope);
                self.apply(actions);
            }
            Err(e) => {
                log::error!("Error executing chat request: {}", e);
                self.transcript
                    .append_turn(Sender::Bot, TRANSPORT_ERROR_MESSAGE);
            }
        }
        true
    }

    pub fn apply(&mut self, actions: Vec<RenderAction>) {
        for action in actions {
            match action {
                RenderAction::AppendTurn(sender, content) => {
                    self.transcript.append_turn(sender, content);
                }
                RenderAction::RenderArtifact(artifact) => self.render(artifact),
            }
        }
    }

    fn render(&mut self, artifact: Artifact) {
        let active = match artifact {
            Artifact::Table(tables) => {
                let Some(first) = tables.first().cloned() else {
                    return;
                };
                self.store.add(tables);
                ActiveArtifact::Table(first)
            }
            Artifact::List(urls) => ActiveArtifact::List(urls),
            Artifact::Filing(filing) => ActiveArtifact::Filing(filing),
        };
        self.activate(active);
    }

    fn activate(&mut self, active: ActiveArtifact) {
        self.render_seq += 1;
        log::debug!("Rendering artifact (count: {})", self.render_seq);
        self.active = Some(active);
        self.artifacts_visible = true;
    }

    /// Re-render a stored table chosen from the selector
    pub fn select_table(&mut self, label: &str) -> bool {
        match self.store.find_by_label(label).cloned() {
            Some(table) => {
                self.activate(ActiveArtifact::Table(table));
                true
            }
            None => {
                log::debug!("No stored table labelled {:?}", label);
                false
            }
        }
    }

    /// Re-render the stored table at `index` (suggestion list entries are positional)
    pub fn select_table_at(&mut self, index: usize) -> bool {
        match self.store.get(index).cloned() {
            Some(table) => {
                self.activate(ActiveArtifact::Table(table));
                true
            }
            None => false,
        }
    }

    pub fn set_artifacts_visible(&mut self, visible: bool) {
        self.artifacts_visible = visible;
    }

    pub fn toggle_artifacts(&mut self) {
        self.artifacts_visible = !self.artifacts_visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::classifier::UNSUPPORTED_MESSAGE;
    use serde_json::json;

    fn contents(session: &ChatSession) -> Vec<(Sender, String)> {
        session
            .transcript()
            .turns()
            .iter()
            .map(|t| (t.sender, t.content.clone()))
            .collect()
    }

    fn tables(value: serde_json::Value) -> ResponseEnvelope {
        ResponseEnvelope::Artifact {
            artifact_type: "artifact-table".into(),
            content: value,
            data: None,
            section_id: None,
        }
    }

    #[test]
    fn test_blank_input_sends_nothing() {
        let mut session = ChatSession::new();
        assert_eq!(session.begin_submit(""), None);
        assert_eq!(session.begin_submit("   \t\n"), None);
        assert!(session.transcript().is_empty());
        assert!(!session.transcript().is_pending());
    }

    #[test]
    fn test_text_round_trip() {
        let mut session = ChatSession::new();
        let message = session.begin_submit("  hello ");
        assert_eq!(message.as_deref(), Some("hello"));
        assert_eq!(contents(&session), vec![(Sender::User, "hello".to_string())]);
        assert!(session.transcript().is_pending());

        assert!(session.complete(Ok(ResponseEnvelope::text("hi"))));
        assert_eq!(
            contents(&session),
            vec![
                (Sender::User, "hello".to_string()),
                (Sender::Bot, "hi".to_string())
            ]
        );
        assert!(!session.transcript().is_pending());
        assert!(session.active().is_none());
    }

    #[test]
    fn test_transport_error_becomes_apology() {
        let mut session = ChatSession::new();
        session.begin_submit("hello");
        session.complete(Err(TransportError::Network("offline".into())));

        assert_eq!(
            contents(&session).last(),
            Some(&(Sender::Bot, TRANSPORT_ERROR_MESSAGE.to_string()))
        );
        assert_eq!(session.transcript().len(), 2);
        assert!(!session.transcript().is_pending());
    }

    #[test]
    fn test_list_artifact_replaces_active_and_opens_panel() {
        let mut session = ChatSession::new();
        session.begin_submit("filings");
        session.complete(Ok(ResponseEnvelope::urls(["http://a", "http://b"])));

        assert_eq!(session.transcript().len(), 2);
        assert!(session.artifacts_visible());
        assert_eq!(
            session.active(),
            Some(&ActiveArtifact::List(vec![
                "http://a".to_string(),
                "http://b".to_string()
            ]))
        );
    }

    #[test]
    fn test_table_batch_fills_store_and_shows_first() {
        let mut session = ChatSession::new();
        session.begin_submit("revenue");
        session.complete(Ok(tables(json!([
            {"fact": "Revenues", "table": [{"x": 1}]},
            {"fact": "CostOfRevenue", "table": [{"x": 2}]}
        ]))));
        session.begin_submit("assets");
        session.complete(Ok(tables(json!({"fact": "Assets", "table": []}))));

        assert_eq!(session.store().len(), 3);
        match session.active() {
            Some(ActiveArtifact::Table(t)) => assert_eq!(t.fact, "Assets"),
            other => panic!("unexpected active artifact: {other:?}"),
        }

        assert!(session.select_table("CostOfRevenue"));
        match session.active() {
            Some(ActiveArtifact::Table(t)) => assert_eq!(t.fact, "CostOfRevenue"),
            other => panic!("unexpected active artifact: {other:?}"),
        }
        assert!(!session.select_table("Liabilities"));

        assert!(session.select_table_at(0));
        match session.active() {
            Some(ActiveArtifact::Table(t)) => assert_eq!(t.fact, "Revenues"),
            other => panic!("unexpected active artifact: {other:?}"),
        }
        assert!(!session.select_table_at(3));
    }

    #[test]
    fn test_every_render_bumps_sequence() {
        let mut session = ChatSession::new();
        session.complete(Ok(ResponseEnvelope::urls(["http://a"])));
        let first = session.render_seq();
        session.complete(Ok(ResponseEnvelope::urls(["http://a"])));
        assert!(session.render_seq() > first);
    }

    #[test]
    fn test_unsupported_leaves_artifacts_untouched() {
        let mut session = ChatSession::new();
        session.begin_submit("x");
        session.complete(Ok(ResponseEnvelope::Unsupported));

        assert_eq!(
            contents(&session).last(),
            Some(&(Sender::Bot, UNSUPPORTED_MESSAGE.to_string()))
        );
        assert!(session.active().is_none());
        assert!(!session.artifacts_visible());
    }

    #[test]
    fn test_concurrent_response_is_dropped_but_pending_released() {
        let mut session = ChatSession::new();
        session.begin_submit("one");
        session.begin_submit("two");

        let gate = session.gate().clone();
        let permit = gate.try_enter();
        assert!(!session.complete(Ok(ResponseEnvelope::text("late"))));
        drop(permit);

        assert_eq!(session.transcript().len(), 2);
        assert!(session.transcript().is_pending());

        assert!(session.complete(Ok(ResponseEnvelope::text("answer"))));
        assert_eq!(session.transcript().len(), 3);
        assert!(!session.transcript().is_pending());
    }

    #[test]
    fn test_sequential_responses_all_apply() {
        let mut session = ChatSession::new();
        session.begin_submit("one");
        session.begin_submit("two");

        assert!(session.complete(Ok(ResponseEnvelope::text("first"))));
        assert!(!session.gate().is_busy());
        assert!(session.complete(Ok(ResponseEnvelope::text("second"))));

        assert_eq!(session.transcript().len(), 4);
        assert!(!session.transcript().is_pending());
    }

    #[test]
    fn test_toggle_artifacts() {
        let mut session = ChatSession::new();
        assert!(!session.artifacts_visible());
        session.toggle_artifacts();
        assert!(session.artifacts_visible());
        session.set_artifacts_visible(false);
        assert!(!session.artifacts_visible());
    }
}
