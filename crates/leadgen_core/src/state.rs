use std::fmt;
use std::sync::Arc;

use crate::view_model::CampaignSnapshot;
use crate::{CampaignParameters, ChannelMode, JobLead, LogCategory, LogStream};

/// Identifies one opened channel. Never reused within a controller.
pub type ChannelId = u64;

/// Produces the human-readable timestamp stamped on each log entry.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

/// Prefix marking client-synthesized lines of the request-mode timeline.
pub const SIMULATED_PREFIX: &str = "[simulated]";

/// Local wall-clock time, `HH:MM:SS`.
pub fn local_clock() -> Clock {
    Arc::new(|| chrono::Local::now().format("%H:%M:%S").to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CampaignState {
    #[default]
    Idle,
    Running,
    Completed,
    Error,
}

impl CampaignState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CampaignState::Completed | CampaignState::Error)
    }
}

/// Canonical state of the single campaign a controller manages.
#[derive(Clone)]
pub struct Campaign {
    mode: ChannelMode,
    state: CampaignState,
    logs: LogStream,
    leads: Vec<JobLead>,
    parameters: Option<CampaignParameters>,
    active_channel: Option<ChannelId>,
    next_channel: ChannelId,
    dirty: bool,
    clock: Clock,
}

impl fmt::Debug for Campaign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Campaign")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("logs", &self.logs.len())
            .field("leads", &self.leads.len())
            .field("active_channel", &self.active_channel)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Default for Campaign {
    fn default() -> Self {
        Self::new(ChannelMode::default())
    }
}

impl Campaign {
    pub fn new(mode: ChannelMode) -> Self {
        Self::with_clock(mode, local_clock())
    }

    pub fn with_clock(mode: ChannelMode, clock: Clock) -> Self {
        Self {
            mode,
            state: CampaignState::Idle,
            logs: LogStream::new(),
            leads: Vec::new(),
            parameters: None,
            active_channel: None,
            next_channel: 1,
            dirty: false,
            clock,
        }
    }

    pub fn mode(&self) -> ChannelMode {
        self.mode
    }

    pub fn state(&self) -> CampaignState {
        self.state
    }

    pub fn logs(&self) -> &LogStream {
        &self.logs
    }

    pub fn leads(&self) -> &[JobLead] {
        &self.leads
    }

    pub fn parameters(&self) -> Option<&CampaignParameters> {
        self.parameters.as_ref()
    }

    pub fn active_channel(&self) -> Option<ChannelId> {
        self.active_channel
    }

    pub fn view(&self) -> CampaignSnapshot {
        CampaignSnapshot::from_campaign(self)
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Whether `channel` is the one feeding the running campaign.
    pub(crate) fn is_live(&self, channel: ChannelId) -> bool {
        self.state == CampaignState::Running && self.active_channel == Some(channel)
    }

    pub(crate) fn start(&mut self, parameters: CampaignParameters) -> ChannelId {
        let channel = self.next_channel;
        self.next_channel += 1;

        self.state = CampaignState::Running;
        self.parameters = Some(parameters);
        self.leads.clear();
        self.logs.clear();
        self.active_channel = Some(channel);
        self.log(LogCategory::System, "Initializing agent...");
        channel
    }

    pub(crate) fn log(&mut self, category: LogCategory, message: impl Into<String>) {
        let timestamp = (self.clock)();
        self.logs.append(timestamp, category, message);
        self.dirty = true;
    }

    /// Ends the running campaign successfully; returns the channel to close.
    ///
    /// In request mode the terminal result is synthesized by the client, so
    /// the entry is labelled as simulated rather than reported as an agent
    /// outcome.
    pub(crate) fn complete(&mut self, leads: Vec<JobLead>) -> Option<ChannelId> {
        let count = leads.len();
        self.leads = leads;
        let message = match self.mode {
            ChannelMode::Streaming => format!("Scrape complete: {count} leads found."),
            ChannelMode::Request => format!(
                "{SIMULATED_PREFIX} Timeline finished: {count} leads found. \
                 The launch endpoint does not return leads."
            ),
        };
        self.log(LogCategory::Result, message);
        self.state = CampaignState::Completed;
        self.active_channel.take()
    }

    /// Ends the running campaign with a failure; returns the channel to close.
    pub(crate) fn fail(&mut self, message: impl Into<String>) -> Option<ChannelId> {
        self.log(LogCategory::Error, message);
        self.state = CampaignState::Error;
        self.active_channel.take()
    }

    pub(crate) fn reset(&mut self) {
        self.state = CampaignState::Idle;
        self.logs.clear();
        self.leads.clear();
        self.parameters = None;
        self.active_channel = None;
        self.dirty = true;
    }
}
