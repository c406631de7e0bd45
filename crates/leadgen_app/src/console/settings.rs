use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use campaign_logging::{campaign_debug, campaign_info};
use leadgen_engine::{AgentSettings, SimulatedStep};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SETTINGS_FILENAME: &str = "leadgen.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedStep {
    after_ms: u64,
    message: String,
}

/// On-disk shape. Every field is optional; missing ones keep their default.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
struct PersistedSettings {
    base_url: Option<String>,
    connect_timeout_ms: Option<u64>,
    simulated_steps: Option<Vec<PersistedStep>>,
}

/// Loads agent settings.
///
/// An explicit path must exist and parse. Without one, `./leadgen.ron` is
/// used when present and defaults otherwise.
pub(crate) fn load_settings(explicit: Option<&Path>) -> Result<AgentSettings, SettingsError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILENAME), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            campaign_debug!("no settings file at {:?}; using defaults", path);
            return Ok(AgentSettings::default());
        }
        Err(source) => return Err(SettingsError::Read { path, source }),
    };

    let persisted: PersistedSettings =
        ron::from_str(&content).map_err(|err| SettingsError::Parse {
            path: path.clone(),
            message: err.to_string(),
        })?;

    campaign_info!("Loaded settings from {:?}", path);
    Ok(apply(persisted, AgentSettings::default()))
}

fn apply(persisted: PersistedSettings, mut settings: AgentSettings) -> AgentSettings {
    if let Some(base_url) = persisted.base_url {
        settings.base_url = base_url;
    }
    if let Some(ms) = persisted.connect_timeout_ms {
        settings.connect_timeout = Duration::from_millis(ms);
    }
    if let Some(steps) = persisted.simulated_steps {
        settings.simulated_steps = steps
            .into_iter()
            .map(|step| SimulatedStep::new(Duration::from_millis(step.after_ms), step.message))
            .collect();
    }
    settings
}
