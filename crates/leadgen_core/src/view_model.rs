use crate::{Campaign, CampaignState, ChannelId, JobLead, LogEntry};

/// Read-only copy of everything a presenter needs to draw the campaign.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CampaignSnapshot {
    pub state: CampaignState,
    pub status_label: &'static str,
    pub logs: Vec<LogEntry>,
    pub leads: Vec<JobLead>,
    pub lead_count: usize,
    pub can_launch: bool,
    pub active_channel: Option<ChannelId>,
}

impl CampaignSnapshot {
    pub(crate) fn from_campaign(campaign: &Campaign) -> Self {
        let state = campaign.state();
        Self {
            state,
            status_label: status_label(state),
            logs: campaign.logs().entries().to_vec(),
            leads: campaign.leads().to_vec(),
            lead_count: campaign.leads().len(),
            can_launch: state != CampaignState::Running,
            active_channel: campaign.active_channel(),
        }
    }
}

fn status_label(state: CampaignState) -> &'static str {
    match state {
        CampaignState::Idle => "Ready",
        CampaignState::Running => "Agent Active",
        CampaignState::Completed => "Task Complete",
        CampaignState::Error => "Failed",
    }
}
