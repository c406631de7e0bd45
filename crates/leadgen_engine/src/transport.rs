use std::sync::atomic::{AtomicBool, Ordering};

use leadgen_core::{CampaignParameters, ProtocolError, ProtocolMessage};

use crate::{ChannelEvent, TransportError};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ChannelEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Continue,
    /// A terminal or malformed message went through; stop reading.
    Finished,
}

/// Forwards messages until the first terminal one, then refuses the rest.
pub struct TerminalGuard<'a> {
    sink: &'a dyn EventSink,
    finished: AtomicBool,
}

impl<'a> TerminalGuard<'a> {
    pub fn new(sink: &'a dyn EventSink) -> Self {
        Self {
            sink,
            finished: AtomicBool::new(false),
        }
    }

    pub fn deliver(&self, message: Result<ProtocolMessage, ProtocolError>) -> Delivery {
        if self.is_finished() {
            return Delivery::Finished;
        }
        let ends = message.as_ref().map_or(true, ProtocolMessage::is_terminal);
        if ends {
            self.finished.store(true, Ordering::Release);
        }
        self.sink.emit(ChannelEvent::Message(message));
        if ends {
            Delivery::Finished
        } else {
            Delivery::Continue
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

/// One way of carrying a launch to the agent.
///
/// `run` returns `Ok` once a terminal message has been delivered through the
/// guard, and `Err` for transport failures. Dropping the future releases the
/// connection.
#[async_trait::async_trait]
pub trait AgentTransport: Send + Sync {
    async fn run(
        &self,
        parameters: &CampaignParameters,
        guard: &TerminalGuard<'_>,
    ) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Collect(Mutex<Vec<ChannelEvent>>);

    impl EventSink for Collect {
        fn emit(&self, event: ChannelEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn nothing_passes_after_a_terminal_message() {
        let sink = Collect::default();
        let guard = TerminalGuard::new(&sink);

        assert_eq!(guard.deliver(Ok(ProtocolMessage::status("a"))), Delivery::Continue);
        assert_eq!(
            guard.deliver(Ok(ProtocolMessage::Result { data: Vec::new() })),
            Delivery::Finished
        );
        assert_eq!(guard.deliver(Ok(ProtocolMessage::status("late"))), Delivery::Finished);

        assert_eq!(sink.0.lock().unwrap().len(), 2);
        assert!(guard.is_finished());
    }

    #[test]
    fn malformed_messages_end_delivery() {
        let sink = Collect::default();
        let guard = TerminalGuard::new(&sink);

        let outcome = guard.deliver(Err(ProtocolError::InvalidJson("eof".to_string())));

        assert_eq!(outcome, Delivery::Finished);
        assert!(guard.is_finished());
    }
}
