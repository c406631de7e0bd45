//! Leadgen engine: transports to the scraping agent and the background
//! runtime that drives them.
mod engine;
mod request;
mod settings;
mod sse;
mod streaming;
mod transport;
mod types;

pub use engine::{EngineChannel, EngineEvents, EngineHandle};
pub use request::RequestTransport;
pub use settings::{AgentSettings, SimulatedStep};
pub use sse::SseDecoder;
pub use streaming::StreamingTransport;
pub use transport::{AgentTransport, Delivery, EventSink, TerminalGuard};
pub use types::{ChannelEvent, EngineEvent, TransportError};
