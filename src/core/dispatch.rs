use crate::config::ControllerConfig;
use crate::core::session::{SessionStats, SwitchSession};
use crate::error::DispatchError;
use crate::event::{Command, PacketInEvent};
use crate::representation::SwitchId;
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Outbound half of a switch connection.
pub type CommandSink = UnboundedSender<Command>;

#[derive(Debug)]
pub enum ControlEvent {
    ConnectionUp { switch: SwitchId, sink: CommandSink },
    PacketIn { switch: SwitchId, event: PacketInEvent },
    ConnectionDown { switch: SwitchId },
}

/// Feeds control events to a running `Controller`.
#[derive(Clone)]
pub struct ControllerHandle {
    sender: UnboundedSender<ControlEvent>,
}

impl ControllerHandle {
    pub fn send_event(&self, event: ControlEvent) -> Result<(), DispatchError> {
        self.sender
            .unbounded_send(event)
            .map_err(|_| DispatchError::ControllerClosed)
    }

    /// Announces `switch` and returns the stream of commands addressed to it.
    pub fn connection_up(&self, switch: SwitchId) -> Result<UnboundedReceiver<Command>, DispatchError> {
        let (sink, commands) = unbounded();
        self.send_event(ControlEvent::ConnectionUp { switch, sink })?;
        Ok(commands)
    }

    pub fn packet_in(&self, switch: SwitchId, event: PacketInEvent) -> Result<(), DispatchError> {
        self.send_event(ControlEvent::PacketIn { switch, event })
    }

    pub fn connection_down(&self, switch: SwitchId) -> Result<(), DispatchError> {
        self.send_event(ControlEvent::ConnectionDown { switch })
    }
}

type SessionEnded = (SwitchId, SessionStats);

/// Routes control events to one task per switch. Sessions share nothing, so
/// switches are served concurrently while each switch's events stay ordered.
pub struct Controller {
    config: Arc<ControllerConfig>,
    receiver: UnboundedReceiver<ControlEvent>,
    sessions: HashMap<SwitchId, UnboundedSender<PacketInEvent>>,
    ended_tx: UnboundedSender<SessionEnded>,
    ended: UnboundedReceiver<SessionEnded>,
    totals: HashMap<SwitchId, SessionStats>,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> (Controller, ControllerHandle) {
        let (sender, receiver) = unbounded();
        let (ended_tx, ended) = unbounded();
        let controller = Controller {
            config: Arc::new(config),
            receiver,
            sessions: HashMap::new(),
            ended_tx,
            ended,
            totals: HashMap::new(),
        };
        (controller, ControllerHandle { sender })
    }

    /// Processes events until every `ControllerHandle` is dropped, then waits
    /// for the remaining sessions to finish. Returns the statistics of each
    /// switch, summed over all of its sessions.
    pub async fn run(mut self) -> HashMap<SwitchId, SessionStats> {
        loop {
            tokio::select! {
                event = self.receiver.next() => match event {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
                Some((switch, stats)) = self.ended.next() => self.session_ended(switch, stats),
            }
        }

        let Controller {
            sessions,
            ended_tx,
            mut ended,
            mut totals,
            ..
        } = self;
        // Dropping the event senders ends every session task.
        drop(sessions);
        drop(ended_tx);
        while let Some((switch, stats)) = ended.next().await {
            totals.entry(switch).or_default().merge(stats);
        }
        totals
    }

    fn dispatch(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::ConnectionUp { switch, sink } => self.connection_up(switch, sink),
            ControlEvent::PacketIn { switch, event } => self.packet_in(switch, event),
            ControlEvent::ConnectionDown { switch } => {
                if let Err(e) = self.connection_down(switch) {
                    warn!(target:"dispatch", "{}", e);
                }
            }
        }
    }

    fn session_ended(&mut self, switch: SwitchId, stats: SessionStats) {
        debug!(target:"dispatch", "session of {} ended", switch);
        self.totals.entry(switch).or_default().merge(stats);
    }

    fn connection_up(&mut self, switch: SwitchId, sink: CommandSink) {
        if self.connection_down(switch).is_ok() {
            info!(target:"dispatch", "{} reconnected, starting a fresh session", switch);
        }
        let session = SwitchSession::connection_up(switch, &self.config);
        let (events, receiver) = unbounded();
        tokio::spawn(run_session(session, receiver, sink, self.ended_tx.clone()));
        self.sessions.insert(switch, events);
    }

    fn packet_in(&mut self, switch: SwitchId, event: PacketInEvent) {
        match self.sessions.get(&switch) {
            Some(events) => {
                if events.unbounded_send(event).is_err() {
                    warn!(target:"dispatch", "session of {} is gone, packet dropped", switch);
                }
            }
            None => warn!(target:"dispatch", "{}, packet dropped", DispatchError::SessionNotFound(switch)),
        }
    }

    /// Closing the event channel ends the session task once it has handled
    /// the events already queued.
    fn connection_down(&mut self, switch: SwitchId) -> Result<(), DispatchError> {
        self.sessions
            .remove(&switch)
            .map(drop)
            .ok_or(DispatchError::SessionNotFound(switch))
    }
}

async fn run_session(
    mut session: SwitchSession,
    mut events: UnboundedReceiver<PacketInEvent>,
    sink: CommandSink,
    ended: UnboundedSender<SessionEnded>,
) {
    while let Some(event) = events.next().await {
        for command in session.handle_packet_in(event) {
            if sink.unbounded_send(command).is_err() {
                debug!(target:"dispatch", "{}: switch channel closed, command dropped", session.switch());
            }
        }
    }
    let switch = session.switch();
    let stats = session.close();
    // The controller stops listening only after every session has reported.
    let _ = ended.unbounded_send((switch, stats));
}
