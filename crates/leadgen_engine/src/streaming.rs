use campaign_logging::{campaign_debug, campaign_trace};
use futures_util::StreamExt;
use leadgen_core::{CampaignParameters, ProtocolMessage};
use reqwest::header::ACCEPT;

use crate::types::map_reqwest_error;
use crate::{AgentSettings, AgentTransport, Delivery, SseDecoder, TerminalGuard, TransportError};

const STREAM_PATH: &str = "stream-scrape";

/// `GET /stream-scrape`: one server-sent event per agent message. Never
/// reconnects; a dropped stream is reported once.
#[derive(Debug, Clone)]
pub struct StreamingTransport {
    settings: AgentSettings,
}

impl StreamingTransport {
    pub fn new(settings: AgentSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl AgentTransport for StreamingTransport {
    async fn run(
        &self,
        parameters: &CampaignParameters,
        guard: &TerminalGuard<'_>,
    ) -> Result<(), TransportError> {
        let mut url = self.settings.endpoint(STREAM_PATH)?;
        url.set_query(Some(&parameters.query_string()));
        let client = self.settings.build_client()?;

        campaign_debug!("opening event stream {}", url);
        let response = client
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }

        let mut decoder = SseDecoder::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| TransportError::Stream(err.to_string()))?;
            for payload in decoder.feed(&chunk) {
                campaign_trace!("frame: {}", payload);
                if guard.deliver(ProtocolMessage::decode(&payload)) == Delivery::Finished {
                    return Ok(());
                }
            }
        }

        if decoder.has_partial() {
            campaign_debug!("discarding unterminated event at end of stream");
        }
        Err(TransportError::EndedWithoutResult)
    }
}
