//! Chat - View Model

use super::model::send_message;
use super::prefilled_prompt::current_prompt;
use super::session::ChatSession;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Canned prompts shown while the artifact panel is hidden
pub const SUGGESTIONS: &[&str] = &[
    "What is the CIK for Apple?",
    "Show me Tesla's revenue",
    "List Microsoft's recent 10-K filings",
    "How many shares does Nvidia have outstanding?",
];

#[derive(Clone, Copy)]
pub struct ChatVm {
    pub session: RwSignal<ChatSession>,
    pub input: RwSignal<String>,
}

impl ChatVm {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(ChatSession::new()),
            input: RwSignal::new(String::new()),
        }
    }

    /// Send `raw` through the transport/classifier pipeline.
    /// Returns `false` when the input was blank and nothing was sent.
    pub fn submit(&self, raw: &str) -> bool {
        let mut outgoing = None;
        self.session.update(|s| outgoing = s.begin_submit(raw));
        let Some(message) = outgoing else {
            return false;
        };

        let session = self.session;
        spawn_local(async move {
            let result = send_message(&message).await;
            session.update(|s| {
                s.complete(result);
            });
        });
        true
    }

    /// Submit the input field; it is cleared once the message is accepted
    pub fn submit_input(&self) {
        let raw = self.input.get_untracked();
        if self.submit(&raw) {
            self.input.set(String::new());
        }
    }

    /// Send the `?prompt=` of the page once, then clear the input field
    pub fn bootstrap_prompt(&self) {
        if let Some(prompt) = current_prompt() {
            log::debug!("Processing prefilled prompt: {}", prompt);
            self.input.set(prompt.clone());
            self.submit(&prompt);
            self.input.set(String::new());
        }
    }

    pub fn select_table_at(&self, index: usize) {
        self.session.update(|s| {
            s.select_table_at(index);
        });
    }

    pub fn toggle_artifacts(&self) {
        self.session.update(|s| s.toggle_artifacts());
    }
}

impl Default for ChatVm {
    fn default() -> Self {
        Self::new()
    }
}
