//! Streaming session pump
//!
//! Single sequential read loop per session: suspend on the channel, fold
//! the event into the domain state machine, notify the observer, repeat
//! until a terminal transition. Because the channel is bounded the pump is
//! also the backpressure point — the transport cannot run ahead of it.

use crate::ports::council_gateway::EventChannel;
use crate::ports::observer::SessionObserver;
use consilium_domain::{ConversationId, DeliberationSession, Transition};
use tracing::{debug, warn};

/// One in-flight orchestration request: the domain session plus the event
/// channel feeding it.
///
/// Dropping a `StreamSession` before its terminal event abandons it: the
/// channel closes, the transport pump's next send fails and releases the
/// connection. No cancellation event is synthesized — the session value is
/// simply left partial.
pub struct StreamSession {
    session: DeliberationSession,
    channel: EventChannel,
}

impl StreamSession {
    /// `conversation_id` is set when continuing a persisted conversation;
    /// a fresh session gets its id from the server's `Started` event.
    pub fn new(conversation_id: Option<ConversationId>, channel: EventChannel) -> Self {
        Self {
            session: DeliberationSession::new(conversation_id),
            channel,
        }
    }

    /// Drive the session to a terminal state and return it.
    ///
    /// The loop requests the next event only after fully processing the
    /// previous one. There is no internal timeout — long silences between
    /// frames are tolerated indefinitely.
    pub async fn pump(mut self, observer: &dyn SessionObserver) -> DeliberationSession {
        self.session.begin();

        loop {
            match self.channel.recv().await {
                Some(Ok(event)) => {
                    match self.session.apply(event) {
                        Transition::Started(id) => observer.on_started(id),
                        Transition::Status => observer.on_status(self.session.status()),
                        Transition::NodeAppended(_) => {
                            // apply pushed it, so the log tail is the new node
                            if let Some(node) = self.session.log().nodes().last() {
                                observer.on_node(node);
                            }
                        }
                        Transition::DuplicateNode(id) => {
                            debug!(node_id = %id, "suppressed redelivered node");
                        }
                        Transition::Done | Transition::Failed | Transition::Ignored => {}
                    }
                    if self.session.is_terminal() {
                        break;
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, "transport failed mid-stream");
                    self.session.fail_transport(e.to_string());
                    break;
                }
                None => {
                    // A well-formed session must explicitly signal done.
                    self.session
                        .fail_transport("stream closed before terminal event");
                    break;
                }
            }
        }

        self.session
    }
}
