//! Session state machine
//!
//! Pure fold from the typed event sequence into session state. The async
//! pump that feeds it lives in the application layer; everything here is
//! synchronous and deterministic, which is what makes the terminal contract
//! (done / application error / transport error) testable without IO.

use crate::deliberation::event::CouncilEvent;
use crate::deliberation::log::NodeLog;
use crate::deliberation::node::{ConversationId, NodeId};

/// Lifecycle phase of a session.
///
/// `Idle → Streaming → Done | Errored`; both end states are terminal — a
/// new request means a new session value, never a reused one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Streaming,
    Done,
    Errored,
}

/// Provenance of a terminal error.
///
/// Application errors come from the orchestration itself (`error` event);
/// transport errors are everything that kept a well-formed stream from
/// arriving. UIs offer retry only for transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Application,
    Transport,
}

/// Terminal error of a session: provenance plus the verbatim message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

/// What a single `apply` did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Conversation id captured from the server.
    Started(ConversationId),
    /// Status text replaced.
    Status,
    /// Node appended to the log.
    NodeAppended(NodeId),
    /// Node id was already in the log; nothing changed.
    DuplicateNode(NodeId),
    /// Session completed normally.
    Done,
    /// Session ended with an error.
    Failed,
    /// Event carried no effect (late frame after a terminal phase, or a
    /// redundant `Started`).
    Ignored,
}

/// One orchestration run: phase, status text, conversation identity, and
/// the node log (Entity).
#[derive(Debug, Clone)]
pub struct DeliberationSession {
    phase: SessionPhase,
    status: String,
    conversation_id: Option<ConversationId>,
    log: NodeLog,
    error: Option<SessionError>,
}

impl DeliberationSession {
    /// New idle session. `conversation_id` is set when continuing a
    /// persisted conversation and absent for a fresh one (the server then
    /// assigns it via a `Started` event).
    pub fn new(conversation_id: Option<ConversationId>) -> Self {
        Self {
            phase: SessionPhase::Idle,
            status: String::new(),
            conversation_id,
            log: NodeLog::new(),
            error: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, SessionPhase::Done | SessionPhase::Errored)
    }

    /// Last received status text; empty until the first status event.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn conversation_id(&self) -> Option<ConversationId> {
        self.conversation_id
    }

    pub fn log(&self) -> &NodeLog {
        &self.log
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// Mark the request as submitted (`Idle → Streaming`).
    pub fn begin(&mut self) {
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::Streaming;
        }
    }

    /// Fold one event into the session.
    ///
    /// After a terminal phase every event is ignored: the stream is
    /// expected to close after `done`/`error`, but late frames must not be
    /// treated as authoritative if it doesn't.
    pub fn apply(&mut self, event: CouncilEvent) -> Transition {
        if self.is_terminal() {
            return Transition::Ignored;
        }

        match event {
            CouncilEvent::Started { conversation_id } => {
                // Immutable once assigned; a caller-supplied id wins over
                // anything the server echoes back.
                if self.conversation_id.is_none() {
                    self.conversation_id = Some(conversation_id);
                    Transition::Started(conversation_id)
                } else {
                    Transition::Ignored
                }
            }
            CouncilEvent::Status { message } => {
                self.status = message;
                Transition::Status
            }
            CouncilEvent::Node { node } => {
                let id = node.id;
                if self.log.apply(node) {
                    Transition::NodeAppended(id)
                } else {
                    Transition::DuplicateNode(id)
                }
            }
            CouncilEvent::Done => {
                self.phase = SessionPhase::Done;
                Transition::Done
            }
            CouncilEvent::Error { message } => {
                self.phase = SessionPhase::Errored;
                self.error = Some(SessionError {
                    kind: ErrorKind::Application,
                    message,
                });
                Transition::Failed
            }
        }
    }

    /// Resolve the session to a transport-level error (failed request,
    /// interrupted chunk source, or stream close without a terminal event).
    /// No-op once terminal.
    pub fn fail_transport(&mut self, message: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        self.phase = SessionPhase::Errored;
        self.error = Some(SessionError {
            kind: ErrorKind::Transport,
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliberation::node::{Node, NodeKind};

    fn node_event(id: i64, kind: NodeKind) -> CouncilEvent {
        CouncilEvent::Node {
            node: Node::new(id, kind, "content"),
        }
    }

    #[test]
    fn test_normal_lifecycle() {
        let mut session = DeliberationSession::new(None);
        assert_eq!(session.phase(), SessionPhase::Idle);

        session.begin();
        assert_eq!(session.phase(), SessionPhase::Streaming);

        session.apply(CouncilEvent::Status {
            message: "Initializing...".into(),
        });
        assert_eq!(session.status(), "Initializing...");

        session.apply(node_event(1, NodeKind::Plan));
        assert_eq!(session.apply(CouncilEvent::Done), Transition::Done);
        assert_eq!(session.phase(), SessionPhase::Done);
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn test_late_frames_after_done_are_ignored() {
        let mut session = DeliberationSession::new(None);
        session.begin();
        session.apply(CouncilEvent::Done);

        assert_eq!(
            session.apply(node_event(7, NodeKind::Synthesis)),
            Transition::Ignored
        );
        assert_eq!(
            session.apply(CouncilEvent::Error {
                message: "late".into()
            }),
            Transition::Ignored
        );
        assert_eq!(session.phase(), SessionPhase::Done);
        assert!(session.log().is_empty());
    }

    #[test]
    fn test_application_error_records_provenance() {
        let mut session = DeliberationSession::new(None);
        session.begin();
        session.apply(CouncilEvent::Error {
            message: "model quota exceeded".into(),
        });

        assert_eq!(session.phase(), SessionPhase::Errored);
        let error = session.error().unwrap();
        assert_eq!(error.kind, ErrorKind::Application);
        assert_eq!(error.message, "model quota exceeded");
    }

    #[test]
    fn test_transport_error_distinguished_from_application() {
        let mut session = DeliberationSession::new(None);
        session.begin();
        session.fail_transport("HTTP 400: no api key");

        let error = session.error().unwrap();
        assert_eq!(error.kind, ErrorKind::Transport);
        assert_eq!(session.phase(), SessionPhase::Errored);
    }

    #[test]
    fn test_transport_failure_does_not_overwrite_terminal_state() {
        let mut session = DeliberationSession::new(None);
        session.begin();
        session.apply(CouncilEvent::Done);
        session.fail_transport("stream closed");
        assert_eq!(session.phase(), SessionPhase::Done);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_conversation_id_captured_once() {
        let mut session = DeliberationSession::new(None);
        session.begin();

        assert_eq!(
            session.apply(CouncilEvent::Started {
                conversation_id: ConversationId(11)
            }),
            Transition::Started(ConversationId(11))
        );
        // A second start must not reassign.
        assert_eq!(
            session.apply(CouncilEvent::Started {
                conversation_id: ConversationId(99)
            }),
            Transition::Ignored
        );
        assert_eq!(session.conversation_id(), Some(ConversationId(11)));
    }

    #[test]
    fn test_caller_assigned_id_is_kept() {
        let mut session = DeliberationSession::new(Some(ConversationId(5)));
        session.begin();
        session.apply(CouncilEvent::Started {
            conversation_id: ConversationId(6),
        });
        assert_eq!(session.conversation_id(), Some(ConversationId(5)));
    }

    #[test]
    fn test_duplicate_node_is_suppressed() {
        let mut session = DeliberationSession::new(None);
        session.begin();
        session.apply(node_event(3, NodeKind::Root));
        assert_eq!(
            session.apply(node_event(3, NodeKind::Root)),
            Transition::DuplicateNode(NodeId(3))
        );
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn test_status_is_last_write_wins() {
        let mut session = DeliberationSession::new(None);
        session.begin();
        session.apply(CouncilEvent::Status {
            message: "first".into(),
        });
        session.apply(CouncilEvent::Status {
            message: "second".into(),
        });
        assert_eq!(session.status(), "second");
    }
}
