#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Once};

use leadgen_core::{
    AgentChannel, CampaignController, CampaignInput, ChannelId, ChannelMode, ChannelOpener,
    Clock, LaunchRequest, Target,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(campaign_logging::initialize_for_tests);
}

pub fn fixed_clock() -> Clock {
    Arc::new(|| "12:00:00".to_string())
}

/// Records every open and every effective close, per channel.
#[derive(Default)]
pub struct ChannelLedger {
    pub opened: Vec<(ChannelId, LaunchRequest)>,
    pub close_calls: Vec<ChannelId>,
    pub released: Vec<ChannelId>,
}

pub struct FakeOpener {
    ledger: Rc<RefCell<ChannelLedger>>,
}

impl ChannelOpener for FakeOpener {
    fn open(&mut self, channel: ChannelId, request: LaunchRequest) -> Box<dyn AgentChannel> {
        self.ledger.borrow_mut().opened.push((channel, request));
        Box::new(FakeChannel {
            id: channel,
            released: false,
            ledger: self.ledger.clone(),
        })
    }
}

struct FakeChannel {
    id: ChannelId,
    released: bool,
    ledger: Rc<RefCell<ChannelLedger>>,
}

impl AgentChannel for FakeChannel {
    fn id(&self) -> ChannelId {
        self.id
    }

    fn close(&mut self) {
        let mut ledger = self.ledger.borrow_mut();
        ledger.close_calls.push(self.id);
        if !self.released {
            self.released = true;
            ledger.released.push(self.id);
        }
    }
}

pub fn controller(mode: ChannelMode) -> (CampaignController, Rc<RefCell<ChannelLedger>>) {
    init_logging();
    let ledger = Rc::new(RefCell::new(ChannelLedger::default()));
    let opener = FakeOpener {
        ledger: ledger.clone(),
    };
    let controller = CampaignController::with_clock(mode, Box::new(opener), fixed_clock());
    (controller, ledger)
}

pub fn google_input() -> CampaignInput {
    CampaignInput {
        company: "Google".to_string(),
        location: "Remote".to_string(),
        keywords: "Engineer".to_string(),
        recency_minutes: String::new(),
        target: Target::Jobs,
    }
}

pub fn status_frame(message: &str) -> String {
    serde_json::json!({ "type": "status", "message": message }).to_string()
}

pub fn error_frame(message: &str) -> String {
    serde_json::json!({ "type": "error", "message": message }).to_string()
}
