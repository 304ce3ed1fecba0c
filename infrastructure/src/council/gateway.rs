//! HTTP adapter for the council gateway port
//!
//! Streaming endpoints POST a JSON body and read the framed event stream
//! off the chunked response; retrieval endpoints are plain JSON GETs. One
//! pump task per session reads chunks sequentially and forwards decoded
//! events over the bounded channel, so the transport never runs ahead of
//! the consumer.

use crate::council::framing::FrameDecoder;
use crate::council::protocol::{decode_frame, ChatPayload, RunPayload};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use consilium_application::{
    ChatRequest, ConversationRecord, ConversationSummary, CouncilGateway, EventChannel,
    GatewayError, RunRequest,
};
use consilium_domain::{ConversationId, CouncilEvent, Model, Node};
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Council backend reached over HTTP.
pub struct HttpCouncilGateway {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpCouncilGateway {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(%base_url, "HttpCouncilGateway initialized");
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// POST a request body and hand the response body to a pump task.
    ///
    /// A non-success status resolves here, before any channel exists, so
    /// callers can tell "the request failed to start" apart from errors the
    /// orchestration reports mid-stream.
    async fn open_stream<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<EventChannel, GatewayError> {
        let response = self
            .authorized(self.client.post(self.url(path)))
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let (tx, channel) = EventChannel::channel();
        tokio::spawn(pump_frames(response.bytes_stream(), tx));
        Ok(channel)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let response = self
            .authorized(self.client.get(self.url(path)))
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl CouncilGateway for HttpCouncilGateway {
    async fn start_run(&self, request: RunRequest) -> Result<EventChannel, GatewayError> {
        self.open_stream("/council/run", &RunPayload::from(request))
            .await
    }

    async fn continue_chat(&self, request: ChatRequest) -> Result<EventChannel, GatewayError> {
        self.open_stream("/superchat/chat", &ChatPayload::from(request))
            .await
    }

    async fn fetch_conversation(
        &self,
        id: ConversationId,
    ) -> Result<ConversationRecord, GatewayError> {
        let record: WireRecord = self.get_json(&format!("/history/{id}")).await?;
        Ok(record.into())
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, GatewayError> {
        let rows: Vec<WireConversation> = self.get_json("/history").await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn available_models(&self) -> Result<Vec<Model>, GatewayError> {
        self.get_json("/models").await
    }
}

/// Read the chunked response body to completion, or until the first
/// terminal event, the receiver is dropped, or the chunk source fails.
///
/// Returning drops the body stream, which releases the connection — that
/// is all "cancellation" amounts to at this layer.
async fn pump_frames<S, B, E>(stream: S, tx: mpsc::Sender<Result<CouncilEvent, GatewayError>>)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut decoder = FrameDecoder::new();
    let mut stream = std::pin::pin!(stream);

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => {
                for line in decoder.push(bytes.as_ref()) {
                    let Some(event) = decode_frame(&line) else {
                        continue;
                    };
                    let terminal = event.is_terminal();
                    if tx.send(Ok(event)).await.is_err() {
                        debug!("session abandoned, dropping stream");
                        return;
                    }
                    if terminal {
                        // Late frames are not authoritative; stop reading.
                        return;
                    }
                }
            }
            Err(e) => {
                let _ = tx
                    .send(Err(GatewayError::StreamInterrupted(e.to_string())))
                    .await;
                return;
            }
        }
    }

    if let Some(partial) = decoder.take_pending() {
        debug!(%partial, "discarding unterminated data at stream end");
    }
    // Channel closes on drop; a session that saw no terminal event treats
    // the close as a transport error.
}

/// Row of `GET /history`.
#[derive(Debug, Deserialize)]
struct WireConversation {
    id: i64,
    title: String,
    #[serde(default)]
    strategy: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<WireConversation> for ConversationSummary {
    fn from(row: WireConversation) -> Self {
        Self {
            id: ConversationId(row.id),
            title: row.title,
            strategy: row.strategy,
            created_at: row.created_at,
        }
    }
}

/// Body of `GET /history/{id}`.
#[derive(Debug, Deserialize)]
struct WireRecord {
    conversation: WireConversation,
    nodes: Vec<Node>,
}

impl From<WireRecord> for ConversationRecord {
    fn from(record: WireRecord) -> Self {
        Self {
            conversation: record.conversation.into(),
            nodes: record.nodes,
        }
    }
}
