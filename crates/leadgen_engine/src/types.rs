use leadgen_core::{ChannelId, Msg, ProtocolError, ProtocolMessage};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("invalid agent url {0}")]
    InvalidUrl(String),
    #[error("could not reach agent: {0}")]
    Connect(String),
    #[error("could not encode launch request: {0}")]
    Encode(String),
    #[error("agent answered with HTTP {0}")]
    HttpStatus(u16),
    #[error("stream interrupted: {0}")]
    Stream(String),
    #[error("agent closed the stream without a result")]
    EndedWithoutResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Message(Result<ProtocolMessage, ProtocolError>),
    TransportFailed(TransportError),
    /// Emitted exactly once per channel, after everything else.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    pub channel: ChannelId,
    pub kind: ChannelEvent,
}

impl EngineEvent {
    /// Translates a transport event into the controller's vocabulary.
    pub fn into_msg(self) -> Msg {
        let channel = self.channel;
        match self.kind {
            ChannelEvent::Message(message) => Msg::MessageReceived { channel, message },
            ChannelEvent::TransportFailed(err) => Msg::TransportFailed {
                channel,
                reason: err.to_string(),
            },
            ChannelEvent::Closed => Msg::ChannelClosed { channel },
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_timeout() {
        return TransportError::Connect(err.to_string());
    }
    if err.is_body() || err.is_decode() {
        return TransportError::Stream(err.to_string());
    }
    TransportError::Connect(err.to_string())
}
