pub mod composer;
pub mod conversation;
pub mod relay;
pub mod wire;

pub use composer::{Composer, SubmitOutcome, FALLBACK_REPLY};
pub use conversation::{ChatMessage, Conversation, Role};
pub use relay::{RelayClient, RelayTransport};
pub use wire::{ChatRequest, ChatResponse};
