//! A2A client — call remote A2A agents.
//!
//! Mirrors the Python SDK's client architecture:
//!
//! - [`A2AClient`] — high-level client with typed methods for every A2A
//!   JSON-RPC operation (send messages, get/cancel tasks, subscribe to streams)
//! - [`CardResolver`] — discover agent cards via the well-known URL convention
//! - [`Transport`] / [`JsonRpcTransport`] — pluggable transport layer
//! - [`SseStream`] — parsed SSE event stream for streaming responses
//! - [`LoadBalancer`] / [`DistributedStreamingClient`] — multi-source
//!   aggregation across several agent endpoints
//!
//! # Quick Start
//!
//! ```no_run
//! use a2a_rs::client::A2AClient;
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Connect to an agent (resolves agent card automatically):
//! let client = A2AClient::from_url("http://localhost:7420").await?;
//!
//! // Send a text message:
//! let task = client.send_text("Hello, agent!").await?;
//! println!("Task {} — status: {}", task.id, task.status.state);
//!
//! // Stream responses:
//! let mut stream = client.send_text_stream("Write a haiku").await?;
//! while let Some(event) = stream.next().await {
//!     println!("{:?}", event?);
//! }
//! # Ok(())
//! # }
//! ```

mod a2a_client;
mod aggregator;
mod card_resolver;
mod sse;
mod transport;

pub use a2a_client::A2AClient;
pub use aggregator::{AggregatedEvent, BalanceStrategy, DistributedStreamingClient, LoadBalancer};
pub use card_resolver::CardResolver;
pub use sse::{SseStream, SseStreamAdapter};
pub use transport::{JsonRpcTransport, Transport, TransportConfig};
