use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use campaign_logging::{campaign_info, campaign_warn};
use leadgen_core::{CampaignController, CampaignInput, CampaignState, ChannelMode};
use leadgen_engine::{AgentSettings, EngineHandle};

use super::render::{render_summary, LogPrinter};

/// How long the loop waits for an engine event before checking state again.
const POLL_INTERVAL: Duration = Duration::from_millis(75);

/// Runs one campaign to a terminal state and prints it to stdout.
///
/// There is no timeout: an agent that never sends a terminal message keeps
/// the campaign running until the process is interrupted.
pub(crate) fn run_campaign(
    settings: AgentSettings,
    mode: ChannelMode,
    input: &CampaignInput,
) -> Result<CampaignState> {
    campaign_info!("agent at {} ({} mode)", settings.base_url, mode);
    let (engine, events) = EngineHandle::spawn(settings).context("failed to start engine runtime")?;
    let mut controller = CampaignController::new(mode, Box::new(engine));

    let mut printer = LogPrinter::default();
    controller.subscribe(move |view| {
        if let Err(err) = printer.on_change(view, &mut io::stdout().lock()) {
            campaign_warn!("failed to print campaign log: {}", err);
        }
    });

    controller.launch(input).context("campaign rejected")?;

    while !controller.state().is_terminal() {
        if let Some(event) = events.recv_timeout(POLL_INTERVAL) {
            controller.dispatch(event.into_msg());
        }
    }

    let view = controller.snapshot();
    render_summary(&view, &mut io::stdout().lock()).context("failed to print results")?;
    Ok(view.state)
}
