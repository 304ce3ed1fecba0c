//! Continue Chat use case
//!
//! Starts or continues a multi-turn session and pumps it to a terminal
//! state. A fresh session (no conversation id) gets its id from the
//! server's `Started` event; a continued one keeps the caller's id.

use crate::ports::council_gateway::{ChatRequest, CouncilGateway};
use crate::ports::observer::{NoObserver, SessionObserver};
use crate::session::StreamSession;
use consilium_domain::{DeliberationSession, DomainError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that reject a chat turn before anything is sent.
#[derive(Error, Debug)]
pub enum ContinueChatError {
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Use case for one request/response turn of a multi-turn session.
pub struct ContinueChatUseCase<G: CouncilGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: CouncilGateway + 'static> ContinueChatUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(
        &self,
        request: ChatRequest,
    ) -> Result<DeliberationSession, ContinueChatError> {
        self.execute_with_observer(request, &NoObserver).await
    }

    pub async fn execute_with_observer(
        &self,
        request: ChatRequest,
        observer: &dyn SessionObserver,
    ) -> Result<DeliberationSession, ContinueChatError> {
        if request.council_members.is_empty() {
            return Err(DomainError::NoMembers.into());
        }
        if request.prompt.trim().is_empty() {
            return Err(DomainError::EmptyPrompt.into());
        }

        let conversation_id = request.conversation_id;
        info!(?conversation_id, "Continuing chat session");

        match self.gateway.continue_chat(request).await {
            Ok(channel) => Ok(StreamSession::new(conversation_id, channel)
                .pump(observer)
                .await),
            Err(e) => {
                warn!(error = %e, "chat turn failed to start");
                let mut session = DeliberationSession::new(conversation_id);
                session.begin();
                session.fail_transport(e.to_string());
                Ok(session)
            }
        }
    }
}
