#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use leadgen_core::{CampaignInput, CampaignParameters, ChannelMode, ProtocolMessage, Target};
use leadgen_engine::{AgentSettings, ChannelEvent, EventSink};

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<ChannelEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<ChannelEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: ChannelEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn settings_for(base_url: &str) -> AgentSettings {
    AgentSettings {
        base_url: base_url.to_string(),
        ..AgentSettings::default()
    }
}

pub fn parameters(mode: ChannelMode, recency: &str) -> CampaignParameters {
    let raw = CampaignInput {
        company: "Google".to_string(),
        location: "Remote".to_string(),
        keywords: "Engineer".to_string(),
        recency_minutes: recency.to_string(),
        target: Target::Jobs,
    };
    CampaignParameters::validate(&raw, mode).expect("valid parameters")
}

pub fn sse_body(frames: &[&str]) -> String {
    frames.iter().map(|frame| format!("data: {frame}\n\n")).collect()
}

pub fn messages(events: Vec<ChannelEvent>) -> Vec<ProtocolMessage> {
    events
        .into_iter()
        .filter_map(|event| match event {
            ChannelEvent::Message(Ok(message)) => Some(message),
            _ => None,
        })
        .collect()
}
