//! Conversation transcript: append-only turns plus the pending counter.

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn display_name(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "Bot",
        }
    }
}

/// One message in the transcript. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub id: usize,
    pub sender: Sender,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    in_flight: u32,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_turn(&mut self, sender: Sender, content: impl Into<String>) -> &Turn {
        let id = self.turns.len();
        self.turns.push(Turn {
            id,
            sender,
            content: content.into(),
        });
        &self.turns[id]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// `true` raises, `false` releases one in-flight request
    pub fn set_pending(&mut self, pending: bool) {
        if pending {
            self.in_flight += 1;
        } else {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
    }

    /// Whether the (single) thinking indicator is visible
    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }
}
