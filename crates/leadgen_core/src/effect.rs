use thiserror::Error;

use crate::{ChannelId, LaunchRequest, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenChannel {
        channel: ChannelId,
        request: LaunchRequest,
    },
    CloseChannel {
        channel: ChannelId,
    },
    LaunchRejected(LaunchError),
    ResetRejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("invalid campaign parameters: {0}")]
    Invalid(#[from] ValidationError),
    #[error("a campaign is already running")]
    AlreadyRunning,
}
