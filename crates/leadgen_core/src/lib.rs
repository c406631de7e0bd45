//! Leadgen core: campaign parameters, the agent message protocol, and the
//! campaign state machine. No I/O lives here; transports plug in through
//! [`ChannelOpener`].
mod controller;
mod effect;
mod log_stream;
mod msg;
mod params;
mod protocol;
mod state;
mod update;
mod view_model;

pub use controller::{
    AgentChannel, CampaignController, ChannelOpener, ResetError, SubscriptionId,
};
pub use effect::{Effect, LaunchError};
pub use log_stream::{LogCategory, LogEntry, LogStream};
pub use msg::Msg;
pub use params::{
    CampaignInput, CampaignParameters, ChannelMode, LaunchBody, LaunchRequest, Target,
    ValidationError,
};
pub use protocol::{JobLead, ProtocolError, ProtocolMessage};
pub use state::{local_clock, Campaign, CampaignState, ChannelId, Clock, SIMULATED_PREFIX};
pub use update::update;
pub use view_model::CampaignSnapshot;
