//! Fanout of session state to subscriber connections
//!
//! - `ConnectionRegistry` tracks open connections
//! - `Broadcaster` delivers one message to all of them with per-connection
//!   fault isolation and bounded send latency
//! - `Subscriber` is the send capability a transport provides

mod broadcaster;
mod message;
mod registry;
mod subscriber;

pub use broadcaster::{BroadcastReport, Broadcaster};
pub use message::{
    unix_timestamp, BroadcastMessage, ConnectionAck, EventMessage, Frame, SnapshotMessage,
};
pub use registry::{ConnectionHandle, ConnectionRegistry};
pub use subscriber::{ChannelSubscriber, Subscriber};
