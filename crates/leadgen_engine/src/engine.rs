use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use campaign_logging::{campaign_debug, campaign_error, campaign_warn};
use leadgen_core::{
    AgentChannel, CampaignParameters, ChannelId, ChannelMode, ChannelOpener, LaunchRequest,
};
use tokio_util::sync::CancellationToken;

use crate::{
    AgentSettings, AgentTransport, ChannelEvent, EngineEvent, EventSink, RequestTransport,
    StreamingTransport, TerminalGuard, TransportError,
};

enum EngineCommand {
    Open {
        channel: ChannelId,
        request: LaunchRequest,
        cancel: CancellationToken,
    },
}

/// Front door to the background runtime. Cloning shares the same runtime.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
}

/// Receiving side of every channel's events, drained by the host loop.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl EngineHandle {
    pub fn spawn(settings: AgentSettings) -> io::Result<(Self, EngineEvents)> {
        let streaming = Arc::new(StreamingTransport::new(settings.clone()));
        let request = Arc::new(RequestTransport::new(settings));
        Self::spawn_with(streaming, request)
    }

    /// Like [`Self::spawn`] but with caller-provided transports per mode.
    pub fn spawn_with(
        streaming: Arc<dyn AgentTransport>,
        request: Arc<dyn AgentTransport>,
    ) -> io::Result<(Self, EngineEvents)> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("leadgen-io")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let loop_tx = event_tx.clone();
        thread::Builder::new()
            .name("leadgen-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Open {
                            channel,
                            request: launch,
                            cancel,
                        } => {
                            let transport = match launch.mode {
                                ChannelMode::Streaming => streaming.clone(),
                                ChannelMode::Request => request.clone(),
                            };
                            runtime.spawn(drive_channel(
                                transport,
                                channel,
                                launch.parameters,
                                cancel,
                                loop_tx.clone(),
                            ));
                        }
                    }
                }
                runtime.shutdown_background();
            })?;

        Ok((Self { cmd_tx, event_tx }, EngineEvents { event_rx }))
    }
}

impl ChannelOpener for EngineHandle {
    fn open(&mut self, channel: ChannelId, request: LaunchRequest) -> Box<dyn AgentChannel> {
        let cancel = CancellationToken::new();
        let command = EngineCommand::Open {
            channel,
            request,
            cancel: cancel.clone(),
        };
        if self.cmd_tx.send(command).is_err() {
            campaign_error!("engine stopped; channel {} cannot open", channel);
            let sink = ChannelSink {
                channel,
                tx: self.event_tx.clone(),
            };
            sink.emit(ChannelEvent::TransportFailed(TransportError::Connect(
                "engine stopped".to_string(),
            )));
            sink.emit(ChannelEvent::Closed);
        }
        Box::new(EngineChannel { channel, cancel })
    }
}

/// Controller-side handle of one running transport task.
pub struct EngineChannel {
    channel: ChannelId,
    cancel: CancellationToken,
}

impl AgentChannel for EngineChannel {
    fn id(&self) -> ChannelId {
        self.channel
    }

    fn close(&mut self) {
        if !self.cancel.is_cancelled() {
            campaign_debug!("cancelling transport for channel {}", self.channel);
            self.cancel.cancel();
        }
    }
}

impl Drop for EngineChannel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct ChannelSink {
    channel: ChannelId,
    tx: mpsc::Sender<EngineEvent>,
}

impl EventSink for ChannelSink {
    fn emit(&self, kind: ChannelEvent) {
        let _ = self.tx.send(EngineEvent {
            channel: self.channel,
            kind,
        });
    }
}

async fn drive_channel(
    transport: Arc<dyn AgentTransport>,
    channel: ChannelId,
    parameters: CampaignParameters,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelSink {
        channel,
        tx: event_tx,
    };
    let guard = TerminalGuard::new(&sink);

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        result = transport.run(&parameters, &guard) => Some(result),
    };

    match outcome {
        None => campaign_debug!("channel {} cancelled", channel),
        Some(Ok(())) => campaign_debug!("channel {} finished", channel),
        Some(Err(err)) if !guard.is_finished() => {
            campaign_warn!("channel {} failed: {}", channel, err);
            sink.emit(ChannelEvent::TransportFailed(err));
        }
        Some(Err(_)) => {}
    }
    sink.emit(ChannelEvent::Closed);
}
