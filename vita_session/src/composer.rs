use tracing::error;

use crate::conversation::Conversation;
use crate::relay::RelayTransport;

/// Shown in place of a reply when the relay cannot be reached or rejects
/// the exchange.
pub const FALLBACK_REPLY: &str =
    "Sorry, there was an error processing your request. Please try again later.";

/// What became of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The exchange ran to a reply (possibly the fallback apology).
    Resolved,
    /// Empty input, or an exchange already in flight; nothing changed.
    Ignored,
}

/// Gates user input against the conversation's one-exchange-in-flight rule
/// and drives a single request/reply round through the relay.
pub struct Composer<T> {
    transport: T,
}

impl<T: RelayTransport> Composer<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Submits one message: appends the user turn, calls the relay exactly
    /// once, and appends exactly one bot turn on resolution. The bot turn is
    /// the only thing that clears the pending flag.
    pub async fn submit(&self, conversation: &mut Conversation, raw_text: &str) -> SubmitOutcome {
        let text = raw_text.trim();
        if !conversation.append_user_message(text) {
            return SubmitOutcome::Ignored;
        }

        let reply = match self.transport.send_message(text).await {
            Ok(reply) => reply.text,
            Err(err) => {
                error!("message exchange failed: {err:#}");
                FALLBACK_REPLY.to_string()
            }
        };

        conversation.append_bot_message(&reply);
        SubmitOutcome::Resolved
    }
}
