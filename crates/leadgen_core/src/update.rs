use campaign_logging::{campaign_debug, campaign_warn};

use crate::{
    Campaign, CampaignParameters, CampaignState, ChannelId, Effect, LaunchError, LaunchRequest,
    LogCategory, Msg, ProtocolError, ProtocolMessage,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: Campaign, msg: Msg) -> (Campaign, Vec<Effect>) {
    let effects = apply(&mut state, msg);
    (state, effects)
}

/// In-place form of [`update`], for owners that keep the campaign in a field.
pub(crate) fn apply(state: &mut Campaign, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::LaunchRequested(raw) => {
            // One campaign at a time; a running one is never superseded.
            if state.state() == CampaignState::Running {
                campaign_warn!("launch ignored: campaign already running");
                return vec![Effect::LaunchRejected(LaunchError::AlreadyRunning)];
            }
            match CampaignParameters::validate(&raw, state.mode()) {
                Ok(parameters) => {
                    let request = LaunchRequest {
                        mode: state.mode(),
                        parameters: parameters.clone(),
                    };
                    let channel = state.start(parameters);
                    vec![Effect::OpenChannel { channel, request }]
                }
                Err(err) => {
                    campaign_warn!("launch rejected: {}", err);
                    vec![Effect::LaunchRejected(LaunchError::Invalid(err))]
                }
            }
        }
        Msg::FrameReceived { channel, payload } => {
            apply_message(state, channel, ProtocolMessage::decode(&payload))
        }
        Msg::MessageReceived { channel, message } => apply_message(state, channel, message),
        Msg::TransportFailed { channel, reason } => {
            if !state.is_live(channel) {
                campaign_debug!(
                    "ignoring transport failure from inactive channel {}: {}",
                    channel,
                    reason
                );
                return Vec::new();
            }
            close_effect(state.fail(format!("Connection lost to agent: {reason}")))
        }
        Msg::ChannelClosed { channel } => {
            // A channel that closes on its own before a terminal message is a
            // dropped connection as far as the campaign is concerned.
            if state.is_live(channel) {
                close_effect(state.fail("Connection lost to agent: channel closed"))
            } else {
                Vec::new()
            }
        }
        Msg::ResetRequested => {
            if state.state() == CampaignState::Running {
                vec![Effect::ResetRejected]
            } else {
                state.reset();
                Vec::new()
            }
        }
    }
}

fn apply_message(
    state: &mut Campaign,
    channel: ChannelId,
    message: Result<ProtocolMessage, ProtocolError>,
) -> Vec<Effect> {
    if !state.is_live(channel) {
        campaign_debug!("ignoring message from inactive channel {}", channel);
        return Vec::new();
    }
    match message {
        Ok(ProtocolMessage::Status { message }) => {
            state.log(LogCategory::Status, format!("> {message}"));
            Vec::new()
        }
        Ok(ProtocolMessage::Result { data }) => close_effect(state.complete(data)),
        Ok(ProtocolMessage::Error { message }) => close_effect(state.fail(format!("Error: {message}"))),
        Err(err) => close_effect(state.fail(format!("Malformed agent message: {err}"))),
    }
}

fn close_effect(channel: Option<ChannelId>) -> Vec<Effect> {
    channel
        .map(|channel| vec![Effect::CloseChannel { channel }])
        .unwrap_or_default()
}
