use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Originator of a single conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One turn in the conversation thread. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            role,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only message thread for one client session, plus the flag marking
/// an unresolved exchange. Mutation happens only through the two append
/// operations; there is no removal, edit or reordering.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the user's side of an exchange and marks it in flight.
    /// Rejected without mutation while another exchange is unresolved or
    /// when the trimmed text is empty; returns whether anything changed.
    pub fn append_user_message(&mut self, text: &str) -> bool {
        if text.trim().is_empty() || self.pending {
            return false;
        }
        self.messages.push(ChatMessage::new(Role::User, text));
        self.pending = true;
        true
    }

    /// Appends the resolved bot side of the exchange and clears the
    /// in-flight flag.
    pub fn append_bot_message(&mut self, text: &str) {
        self.messages.push(ChatMessage::new(Role::Bot, text));
        self.pending = false;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
