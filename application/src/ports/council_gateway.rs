//! Council gateway port
//!
//! Defines the interface to the orchestration backend: the two streaming
//! endpoints (council runs and multi-turn chat) and the synchronous
//! retrieval endpoints (history, model roster). Implementations (adapters)
//! live in the infrastructure layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use consilium_domain::{ConversationId, CouncilEvent, Model, Node, RunStrategy};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while talking to the backend.
///
/// Every variant is transport-class: it describes a request that failed to
/// start or a stream that failed to arrive, never an error the
/// orchestration itself reported (those travel as
/// [`CouncilEvent::Error`] frames).
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Role configuration for a diagnostic-panel run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSpec {
    /// Display name of the panel seat (e.g. "Dr. Hypothesis").
    pub name: String,
    /// Model filling the seat.
    pub model: Model,
    /// System instructions for the seat.
    pub instructions: String,
}

/// Parameters for a pipeline / ensemble / diagnostic-panel run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub prompt: String,
    pub council_members: Vec<Model>,
    /// Chairman/lead model; writes the synthesis (pipeline, ensemble) or
    /// moderates the panel.
    pub chairman: Model,
    pub strategy: RunStrategy,
    /// Panel seats; ignored by the server for non-panel strategies.
    pub roles: Vec<RoleSpec>,
    /// Upper bound on panel propose/critique/refine loops.
    pub max_iterations: u32,
}

impl RunRequest {
    pub fn new(
        prompt: impl Into<String>,
        council_members: Vec<Model>,
        chairman: Model,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            council_members,
            chairman,
            strategy: RunStrategy::default(),
            roles: Vec::new(),
            max_iterations: 5,
        }
    }

    pub fn with_strategy(mut self, strategy: RunStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_roles(mut self, roles: Vec<RoleSpec>) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Parameters for starting or continuing a multi-turn session.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub prompt: String,
    /// Absent for a fresh session; the server then assigns one and
    /// announces it with a `Started` event.
    pub conversation_id: Option<ConversationId>,
    pub council_members: Vec<Model>,
    pub chairman: Model,
    /// Previously uploaded attachment ids to anchor on this turn's root.
    pub attachment_ids: Vec<String>,
}

impl ChatRequest {
    pub fn new(
        prompt: impl Into<String>,
        council_members: Vec<Model>,
        chairman: Model,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            conversation_id: None,
            council_members,
            chairman,
            attachment_ids: Vec::new(),
        }
    }

    pub fn continuing(mut self, conversation_id: ConversationId) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }

    pub fn with_attachments(mut self, attachment_ids: Vec<String>) -> Self {
        self.attachment_ids = attachment_ids;
        self
    }
}

/// Metadata of a persisted deliberation.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    /// Strategy the conversation was run with; `None` for rows persisted
    /// before the field existed.
    pub strategy: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A persisted deliberation: metadata plus its full node log.
#[derive(Debug, Clone)]
pub struct ConversationRecord {
    pub conversation: ConversationSummary,
    pub nodes: Vec<Node>,
}

/// Handle for receiving the framed event stream of one session.
///
/// Wraps a bounded `mpsc::Receiver`; the bound is the backpressure
/// mechanism — the transport pump cannot run ahead of the consumer by more
/// than [`EventChannel::CAPACITY`] events. The channel closing without a
/// prior terminal event means the transport ended prematurely.
pub struct EventChannel {
    receiver: mpsc::Receiver<Result<CouncilEvent, GatewayError>>,
}

impl EventChannel {
    pub const CAPACITY: usize = 1;

    /// Create a channel pair: the sender side goes to the transport pump,
    /// the `EventChannel` to the session.
    pub fn channel() -> (
        mpsc::Sender<Result<CouncilEvent, GatewayError>>,
        Self,
    ) {
        let (tx, rx) = mpsc::channel(Self::CAPACITY);
        (tx, Self { receiver: rx })
    }

    pub fn new(receiver: mpsc::Receiver<Result<CouncilEvent, GatewayError>>) -> Self {
        Self { receiver }
    }

    /// Next event, `None` once the transport side is gone.
    pub async fn recv(&mut self) -> Option<Result<CouncilEvent, GatewayError>> {
        self.receiver.recv().await
    }
}

/// Gateway to the council backend
///
/// This port defines how the application layer reaches the orchestration
/// service. Streaming endpoints resolve to an [`EventChannel`]; retrieval
/// endpoints are single synchronous fetches.
#[async_trait]
pub trait CouncilGateway: Send + Sync {
    /// Start a pipeline / ensemble / diagnostic-panel run.
    async fn start_run(&self, request: RunRequest) -> Result<EventChannel, GatewayError>;

    /// Start or continue a multi-turn session.
    async fn continue_chat(&self, request: ChatRequest) -> Result<EventChannel, GatewayError>;

    /// Fetch one persisted conversation with its full node log.
    async fn fetch_conversation(
        &self,
        id: ConversationId,
    ) -> Result<ConversationRecord, GatewayError>;

    /// List persisted conversations, newest first.
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, GatewayError>;

    /// Model roster offered by the backend.
    async fn available_models(&self) -> Result<Vec<Model>, GatewayError>;
}
