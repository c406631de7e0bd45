use campaign_logging::{campaign_debug, campaign_info};
use leadgen_core::{CampaignParameters, ProtocolError, ProtocolMessage, SIMULATED_PREFIX};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::types::map_reqwest_error;
use crate::{AgentSettings, AgentTransport, Delivery, TerminalGuard, TransportError};

const LAUNCH_PATH: &str = "launch";

#[derive(Debug, Deserialize)]
struct Acknowledgement {
    message: String,
}

/// `POST /launch`: the agent answers once. Everything after the
/// acknowledgement is a client-side demo timeline, not agent telemetry, and
/// every such line says so.
#[derive(Debug, Clone)]
pub struct RequestTransport {
    settings: AgentSettings,
}

impl RequestTransport {
    pub fn new(settings: AgentSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl AgentTransport for RequestTransport {
    async fn run(
        &self,
        parameters: &CampaignParameters,
        guard: &TerminalGuard<'_>,
    ) -> Result<(), TransportError> {
        let url = self.settings.endpoint(LAUNCH_PATH)?;
        let body = serde_json::to_vec(&parameters.launch_body())
            .map_err(|err| TransportError::Encode(err.to_string()))?;
        let client = self.settings.build_client()?;

        campaign_debug!("posting launch request to {}", url);
        let response = client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| TransportError::Stream(err.to_string()))?;

        let ack = match decode_acknowledgement(&bytes) {
            Ok(ack) => ack,
            Err(err) => {
                guard.deliver(Err(err));
                return Ok(());
            }
        };
        campaign_info!("agent acknowledged launch: {}", ack.message);
        let acknowledged = tokio::time::Instant::now();
        if guard.deliver(Ok(ProtocolMessage::status(format!(
            "Agent acknowledged: {}",
            ack.message
        )))) == Delivery::Finished
        {
            return Ok(());
        }

        for step in &self.settings.simulated_steps {
            tokio::time::sleep_until(acknowledged + step.after).await;
            let line = format!("{SIMULATED_PREFIX} {}", step.message);
            if guard.deliver(Ok(ProtocolMessage::status(line))) == Delivery::Finished {
                return Ok(());
            }
        }

        // The launch endpoint carries no leads, so the timeline ends
        // empty-handed. The controller labels this completion as simulated.
        guard.deliver(Ok(ProtocolMessage::Result { data: Vec::new() }));
        Ok(())
    }
}

fn decode_acknowledgement(bytes: &[u8]) -> Result<Acknowledgement, ProtocolError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|err| ProtocolError::InvalidJson(err.to_string()))?;
    serde_json::from_value(value).map_err(|err| ProtocolError::UnknownShape(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledgement_ignores_extra_fields() {
        let ack = decode_acknowledgement(br#"{"status":"started","message":"SIMULATION: ok"}"#)
            .unwrap();
        assert_eq!(ack.message, "SIMULATION: ok");
    }

    #[test]
    fn acknowledgement_without_message_is_unknown_shape() {
        assert!(matches!(
            decode_acknowledgement(br#"{"status":"started"}"#),
            Err(ProtocolError::UnknownShape(_))
        ));
        assert!(matches!(
            decode_acknowledgement(b"Internal Server Error"),
            Err(ProtocolError::InvalidJson(_))
        ));
    }
}
