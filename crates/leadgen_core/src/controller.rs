use campaign_logging::{campaign_debug, campaign_info};
use thiserror::Error;

use crate::update::apply;
use crate::{
    Campaign, CampaignInput, CampaignSnapshot, CampaignState, ChannelId, ChannelMode,
    Clock, Effect, LaunchError, LaunchRequest, Msg,
};

/// One open connection to the agent, owned by the controller for the life of
/// a single launch.
///
/// Implementations must tolerate `close` being called more than once; only
/// the first call releases anything.
pub trait AgentChannel {
    fn id(&self) -> ChannelId;
    fn close(&mut self);
}

/// Opens channels for new launches. Opening never blocks: connection
/// progress and failures are reported later as [`Msg`]s tagged with the
/// channel id.
pub trait ChannelOpener {
    fn open(&mut self, channel: ChannelId, request: LaunchRequest) -> Box<dyn AgentChannel>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResetError {
    #[error("cannot reset while a campaign is running")]
    CampaignRunning,
}

/// Holds the current channel; closing takes it out so it runs once.
#[derive(Default)]
struct ChannelSlot {
    current: Option<Box<dyn AgentChannel>>,
}

impl ChannelSlot {
    fn install(&mut self, channel: Box<dyn AgentChannel>) {
        if let Some(mut stale) = self.current.replace(channel) {
            stale.close();
        }
    }

    fn close(&mut self, channel: ChannelId) {
        if self.current.as_ref().map(|c| c.id()) == Some(channel) {
            if let Some(mut open) = self.current.take() {
                campaign_debug!("closing channel {}", channel);
                open.close();
            }
        }
    }

    fn is_open(&self) -> bool {
        self.current.is_some()
    }
}

impl Drop for ChannelSlot {
    fn drop(&mut self) {
        if let Some(mut open) = self.current.take() {
            open.close();
        }
    }
}

type Observer = Box<dyn FnMut(&CampaignSnapshot)>;

/// Owns the canonical campaign state, the open channel and the observers.
///
/// All calls happen on the host event loop; messages are applied strictly in
/// the order they are dispatched.
pub struct CampaignController {
    campaign: Campaign,
    opener: Box<dyn ChannelOpener>,
    slot: ChannelSlot,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl CampaignController {
    pub fn new(mode: ChannelMode, opener: Box<dyn ChannelOpener>) -> Self {
        Self::from_campaign(Campaign::new(mode), opener)
    }

    pub fn with_clock(mode: ChannelMode, opener: Box<dyn ChannelOpener>, clock: Clock) -> Self {
        Self::from_campaign(Campaign::with_clock(mode, clock), opener)
    }

    fn from_campaign(campaign: Campaign, opener: Box<dyn ChannelOpener>) -> Self {
        Self {
            campaign,
            opener,
            slot: ChannelSlot::default(),
            observers: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn state(&self) -> CampaignState {
        self.campaign.state()
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub fn snapshot(&self) -> CampaignSnapshot {
        self.campaign.view()
    }

    pub fn has_open_channel(&self) -> bool {
        self.slot.is_open()
    }

    /// Validates `raw` and starts a campaign. Rejected while one is running.
    pub fn launch(&mut self, raw: &CampaignInput) -> Result<ChannelId, LaunchError> {
        let effects = self.dispatch(Msg::LaunchRequested(raw.clone()));
        for effect in effects {
            match effect {
                Effect::OpenChannel { channel, .. } => return Ok(channel),
                Effect::LaunchRejected(err) => return Err(err),
                _ => {}
            }
        }
        // update always answers a launch with exactly one of the two above.
        Err(LaunchError::AlreadyRunning)
    }

    /// Clears a finished campaign back to `Idle`.
    pub fn reset(&mut self) -> Result<(), ResetError> {
        let effects = self.dispatch(Msg::ResetRequested);
        if effects.contains(&Effect::ResetRejected) {
            Err(ResetError::CampaignRunning)
        } else {
            Ok(())
        }
    }

    /// Applies one message, runs its effects and notifies observers if
    /// anything changed. Returns the effects for callers that care.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let effects = apply(&mut self.campaign, msg);

        for effect in &effects {
            match effect {
                Effect::OpenChannel { channel, request } => {
                    campaign_info!(
                        "opening {} channel {} for company={:?}",
                        request.mode,
                        channel,
                        request.parameters.company()
                    );
                    let opened = self.opener.open(*channel, request.clone());
                    self.slot.install(opened);
                }
                Effect::CloseChannel { channel } => self.slot.close(*channel),
                Effect::LaunchRejected(_) | Effect::ResetRejected => {}
            }
        }

        if self.campaign.consume_dirty() {
            self.notify();
        }
        effects
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&CampaignSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.campaign.view();
        for (_, observer) in &mut self.observers {
            observer(&snapshot);
        }
    }
}
