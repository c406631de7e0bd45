use std::time::Duration;

use url::Url;

use crate::TransportError;

/// One client-side placeholder line of the fallback timeline. These are not
/// agent telemetry; they only illustrate progress after the acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedStep {
    pub after: Duration,
    pub message: String,
}

impl SimulatedStep {
    pub fn new(after: Duration, message: impl Into<String>) -> Self {
        Self {
            after,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Offsets are measured from the acknowledgement, not from each other.
    pub simulated_steps: Vec<SimulatedStep>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            simulated_steps: vec![
                SimulatedStep::new(Duration::from_millis(1500), "Browsing company page..."),
                SimulatedStep::new(Duration::from_millis(3000), "Collecting listings..."),
                SimulatedStep::new(Duration::from_millis(4500), "Data extraction complete."),
            ],
        }
    }
}

impl AgentSettings {
    /// Resolves `path` under the base url, keeping any path prefix the base has.
    pub fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|err| TransportError::InvalidUrl(format!("{joined}: {err}")))
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        // No overall request timeout: a stream stays open until the agent is done.
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|err| TransportError::Connect(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let settings = AgentSettings {
            base_url: "http://agent.local:9000/api/".to_string(),
            ..AgentSettings::default()
        };
        assert_eq!(
            settings.endpoint("/stream-scrape").unwrap().as_str(),
            "http://agent.local:9000/api/stream-scrape"
        );
    }

    #[test]
    fn default_targets_the_local_agent() {
        let url = AgentSettings::default().endpoint("launch").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/launch");
    }

    #[test]
    fn malformed_base_is_reported() {
        let settings = AgentSettings {
            base_url: "not a url".to_string(),
            ..AgentSettings::default()
        };
        assert!(matches!(
            settings.endpoint("launch"),
            Err(TransportError::InvalidUrl(_))
        ));
    }
}
