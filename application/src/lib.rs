//! Application layer for consilium
//!
//! This crate contains use cases, port definitions, and the streaming
//! session pump. It depends only on the domain layer.

pub mod ports;
pub mod session;
pub mod use_cases;

// Re-export commonly used types
pub use ports::council_gateway::{
    ChatRequest, ConversationRecord, ConversationSummary, CouncilGateway, EventChannel,
    GatewayError, RoleSpec, RunRequest,
};
pub use ports::observer::{NoObserver, SessionObserver};
pub use session::StreamSession;
pub use use_cases::continue_chat::{ContinueChatError, ContinueChatUseCase};
pub use use_cases::replay_conversation::{
    ReplayConversationError, ReplayConversationUseCase, ReplayedConversation,
};
pub use use_cases::run_council::{RunCouncilError, RunCouncilUseCase};
