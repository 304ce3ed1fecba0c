//! Wire protocol for the council event stream
//!
//! Each emitted unit is one line of the form `data: <json>`. Lines without
//! the prefix (blank keep-alives, comments) are ignore-on-receipt. The
//! JSON payload is discriminated by a top-level `type` field; unrecognized
//! discriminants are skipped so newer servers can add event kinds without
//! breaking older clients, and a single malformed frame never aborts the
//! stream.
//!
//! The request payloads for the two streaming endpoints live here too, so
//! the whole wire surface is in one place.

use consilium_application::{ChatRequest, RunRequest};
use consilium_domain::{ConversationId, CouncilEvent, Model, Node, RunStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Frame marker; everything after it is the JSON payload.
pub const FRAME_PREFIX: &str = "data: ";

/// One frame payload as it appears on the wire.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    Status { message: String },
    Node { node: Node },
    Start { conversation_id: i64 },
    Done,
    Error { message: String },
    #[serde(other)]
    Unrecognized,
}

/// Parse one decoded line into a typed event.
///
/// Returns `None` for everything that is not a well-formed frame: lines
/// without the prefix, malformed JSON (logged, skipped) and unrecognized
/// event types (logged at debug, skipped).
pub fn decode_frame(line: &str) -> Option<CouncilEvent> {
    let payload = line.strip_prefix(FRAME_PREFIX)?;

    match serde_json::from_str::<WireEvent>(payload) {
        Ok(WireEvent::Status { message }) => Some(CouncilEvent::Status { message }),
        Ok(WireEvent::Node { node }) => Some(CouncilEvent::Node { node }),
        Ok(WireEvent::Start { conversation_id }) => Some(CouncilEvent::Started {
            conversation_id: ConversationId(conversation_id),
        }),
        Ok(WireEvent::Done) => Some(CouncilEvent::Done),
        Ok(WireEvent::Error { message }) => Some(CouncilEvent::Error { message }),
        Ok(WireEvent::Unrecognized) => {
            debug!(line, "skipping frame with unrecognized event type");
            None
        }
        Err(e) => {
            warn!(error = %e, line, "skipping malformed frame");
            None
        }
    }
}

/// Body of `POST /council/run`.
#[derive(Debug, Serialize)]
pub struct RunPayload {
    prompt: String,
    council_members: Vec<Model>,
    chairman_model: Model,
    strategy: RunStrategy,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    roles: Vec<RolePayload>,
    max_iterations: u32,
}

#[derive(Debug, Serialize)]
pub struct RolePayload {
    name: String,
    model: Model,
    instructions: String,
}

impl From<RunRequest> for RunPayload {
    fn from(request: RunRequest) -> Self {
        Self {
            prompt: request.prompt,
            council_members: request.council_members,
            chairman_model: request.chairman,
            strategy: request.strategy,
            roles: request
                .roles
                .into_iter()
                .map(|role| RolePayload {
                    name: role.name,
                    model: role.model,
                    instructions: role.instructions,
                })
                .collect(),
            max_iterations: request.max_iterations,
        }
    }
}

/// Body of `POST /superchat/chat`.
#[derive(Debug, Serialize)]
pub struct ChatPayload {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<ConversationId>,
    council_members: Vec<Model>,
    chairman_model: Model,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachment_ids: Vec<String>,
}

impl From<ChatRequest> for ChatPayload {
    fn from(request: ChatRequest) -> Self {
        Self {
            prompt: request.prompt,
            conversation_id: request.conversation_id,
            council_members: request.council_members,
            chairman_model: request.chairman,
            attachment_ids: request.attachment_ids,
        }
    }
}
