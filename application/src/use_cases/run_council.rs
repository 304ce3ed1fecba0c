//! Run Council use case
//!
//! Starts a pipeline / ensemble / diagnostic-panel run and pumps its event
//! stream to a terminal state.

use crate::ports::council_gateway::{CouncilGateway, RunRequest};
use crate::ports::observer::{NoObserver, SessionObserver};
use crate::session::StreamSession;
use consilium_domain::{DeliberationSession, DomainError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that reject a run before anything is sent.
///
/// Everything after submission — failed requests included — resolves
/// through the session's terminal state instead, so callers have one
/// uniform contract: phase plus error provenance.
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Use case for running one council deliberation.
pub struct RunCouncilUseCase<G: CouncilGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: CouncilGateway + 'static> RunCouncilUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Execute the use case with default (no-op) progress.
    pub async fn execute(
        &self,
        request: RunRequest,
    ) -> Result<DeliberationSession, RunCouncilError> {
        self.execute_with_observer(request, &NoObserver).await
    }

    /// Execute the use case with progress callbacks.
    pub async fn execute_with_observer(
        &self,
        request: RunRequest,
        observer: &dyn SessionObserver,
    ) -> Result<DeliberationSession, RunCouncilError> {
        validate(&request)?;

        info!(
            strategy = %request.strategy,
            members = request.council_members.len(),
            "Starting council run"
        );

        match self.gateway.start_run(request).await {
            Ok(channel) => Ok(StreamSession::new(None, channel).pump(observer).await),
            Err(e) => {
                warn!(error = %e, "council run failed to start");
                let mut session = DeliberationSession::new(None);
                session.begin();
                session.fail_transport(e.to_string());
                Ok(session)
            }
        }
    }
}

fn validate(request: &RunRequest) -> Result<(), DomainError> {
    if request.council_members.is_empty() {
        return Err(DomainError::NoMembers);
    }
    if request.prompt.trim().is_empty() {
        return Err(DomainError::EmptyPrompt);
    }
    Ok(())
}
