use crate::{CampaignInput, ChannelId, ProtocolError, ProtocolMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator asked to launch a campaign with the given raw input.
    LaunchRequested(CampaignInput),
    /// Raw frame text from a channel, not yet decoded.
    FrameReceived { channel: ChannelId, payload: String },
    /// Frame already decoded by the transport.
    MessageReceived {
        channel: ChannelId,
        message: Result<ProtocolMessage, ProtocolError>,
    },
    /// The transport failed: refused, dropped, or answered non-2xx.
    TransportFailed { channel: ChannelId, reason: String },
    /// The transport released its connection.
    ChannelClosed { channel: ChannelId },
    /// Operator asked to clear a finished campaign.
    ResetRequested,
}
