pub mod config;
pub mod error;
pub mod fanout;
pub mod http;
pub mod hub;
pub mod ingest;
pub mod nats;
pub mod session;
pub mod translation;

pub use config::Config;
pub use error::{DeliveryError, HubError};
pub use fanout::{
    BroadcastMessage, BroadcastReport, Broadcaster, ChannelSubscriber, ConnectionHandle,
    ConnectionRegistry, Subscriber,
};
pub use http::{create_router, AppState};
pub use hub::Hub;
pub use ingest::{IngestEvent, IngestGateway, IngestOutcome};
pub use nats::{NatsClient, TranscriptMessage};
pub use session::{PromptTemplate, SegmentTracker, SessionState, SessionStore};
pub use translation::{OpenAiTranslator, Translator};
