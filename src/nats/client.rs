use super::messages::TranscriptMessage;
use crate::config::NatsConfig;
use crate::ingest::{IngestGateway, TranscriptEvent};
use anyhow::{Context, Result};
use async_nats::Client;
use futures::stream::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// NATS transcript source feeding the ingest gateway
pub struct NatsClient {
    client: Client,
    subject: String,
    session_id: Option<String>,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, config: &NatsConfig) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            subject: config.subject.clone(),
            session_id: config.session_id.clone(),
        })
    }

    /// Subscribe to transcript messages
    pub async fn subscribe_transcripts(&self) -> Result<async_nats::Subscriber> {
        // The STT service publishes to stt.text.partial and stt.text.final
        info!("Subscribing to transcripts on {}", self.subject);

        let subscriber = self
            .client
            .subscribe(self.subject.clone())
            .await
            .context("Failed to subscribe to transcripts")?;

        info!("Subscribed to {}", self.subject);

        Ok(subscriber)
    }

    /// Forward every matching transcript to the gateway until the
    /// subscription ends
    pub async fn spawn_ingest(self, gateway: IngestGateway) -> Result<JoinHandle<()>> {
        let mut transcript_sub = self.subscribe_transcripts().await?;
        let session_id = self.session_id;
        let client = self.client;

        let task = tokio::spawn(async move {
            // Held so the connection outlives the subscription
            let _client = client;
            info!("Transcript receiving task started");

            while let Some(msg) = transcript_sub.next().await {
                let transcript = match serde_json::from_slice::<TranscriptMessage>(&msg.payload) {
                    Ok(transcript) => transcript,
                    Err(e) => {
                        warn!("Failed to parse transcript message: {}", e);
                        continue;
                    }
                };

                if !accepts(session_id.as_deref(), &transcript) {
                    debug!(session = %transcript.session_id, "Skipping transcript for other session");
                    continue;
                }

                // Rejections are logged by the gateway
                let _ = gateway.transcript(TranscriptEvent::from(transcript)).await;
            }

            info!("Transcript receiving task stopped");
        });

        Ok(task)
    }
}

fn accepts(session_id: Option<&str>, transcript: &TranscriptMessage) -> bool {
    session_id.map_or(true, |id| transcript.session_id == id)
}
