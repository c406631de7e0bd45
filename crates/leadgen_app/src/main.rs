use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use leadgen_core::{CampaignInput, CampaignState, ChannelMode, Target};

mod console;

use console::logging::{self, LogDestination};

#[derive(Parser)]
#[command(name = "leadgen")]
#[command(about = "Launch a lead-generation campaign against a scraping agent and follow it live")]
#[command(version)]
struct Cli {
    /// Target company (required)
    #[arg(long)]
    company: String,

    /// Location filter; required in request mode
    #[arg(long, default_value = "")]
    location: String,

    /// Free-text keywords
    #[arg(long, default_value = "")]
    keywords: String,

    /// Only listings posted within this many minutes
    #[arg(long, value_name = "MINUTES", default_value = "")]
    posted_within: String,

    /// What to scrape
    #[arg(long, value_enum, default_value_t = TargetArg::Jobs)]
    target: TargetArg,

    /// How to reach the agent
    #[arg(long, value_enum, default_value_t = ModeArg::Stream)]
    mode: ModeArg,

    /// Agent base url; overrides the settings file
    #[arg(long)]
    base_url: Option<String>,

    /// Settings file (defaults to ./leadgen.ron when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where diagnostics go
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,

    /// Enable debug diagnostics
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
    Jobs,
    Recruiters,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Stream,
    Request,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(cli.log, campaign_logging::level_for(cli.verbose));

    match run(cli) {
        Ok(CampaignState::Completed) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("leadgen: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<CampaignState> {
    let mut settings = console::load_settings(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }

    let input = CampaignInput {
        company: cli.company,
        location: cli.location,
        keywords: cli.keywords,
        recency_minutes: cli.posted_within,
        target: map_target(cli.target),
    };

    console::run_campaign(settings, map_mode(cli.mode), &input)
}

fn map_target(target: TargetArg) -> Target {
    match target {
        TargetArg::Jobs => Target::Jobs,
        TargetArg::Recruiters => Target::Recruiters,
    }
}

fn map_mode(mode: ModeArg) -> ChannelMode {
    match mode {
        ModeArg::Stream => ChannelMode::Streaming,
        ModeArg::Request => ChannelMode::Request,
    }
}
