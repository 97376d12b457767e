use crate::app::forward::Commands;
use crate::app::{AddressTables, ForwardingEngine, ProxyArp};
use crate::config::ControllerConfig;
use crate::event::{Command, FrameOrigin, PacketInEvent};
use crate::representation::{PortId, SwitchId};
use crate::util::flow::Action;
use log::{debug, info, warn};
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct SessionStats {
    pub packets_in: u64,
    pub dropped: u64,
    pub flooded: u64,
    pub unicast: u64,
    pub arp_replies: u64,
    pub rules_installed: u64,
}

impl SessionStats {
    /// Adds the counters of a later session of the same switch.
    pub fn merge(&mut self, other: SessionStats) {
        self.packets_in += other.packets_in;
        self.dropped += other.dropped;
        self.flooded += other.flooded;
        self.unicast += other.unicast;
        self.arp_replies += other.arp_replies;
        self.rules_installed += other.rules_installed;
    }

    fn record(&mut self, commands: &Commands) {
        if commands.iter().any(Command::is_flow_mod) {
            self.rules_installed += 1;
            self.unicast += 1;
            return;
        }
        for command in commands {
            if let Command::PacketOut(out) = command {
                let flood = out
                    .actions
                    .iter()
                    .any(|Action::Output(p)| *p == PortId::FLOOD || *p == PortId::ALL);
                if flood {
                    self.flooded += 1;
                } else {
                    self.unicast += 1;
                }
            }
        }
    }
}

/// Controller state for one connected switch. Owns that switch's tables;
/// events must be fed to it one at a time.
pub struct SwitchSession {
    switch: SwitchId,
    tables: AddressTables,
    proxy_arp: Option<ProxyArp>,
    engine: ForwardingEngine,
    stats: SessionStats,
}

impl SwitchSession {
    /// Starts a session with empty tables for a switch that just connected.
    pub fn connection_up(switch: SwitchId, config: &ControllerConfig) -> SwitchSession {
        debug!(target:"session", "Controlling {}", switch);
        SwitchSession {
            switch,
            tables: AddressTables::new(),
            proxy_arp: if config.proxy_arp.enabled {
                Some(ProxyArp::new())
            } else {
                None
            },
            engine: ForwardingEngine::new(config.forwarding.clone()),
            stats: Default::default(),
        }
    }

    pub fn switch(&self) -> SwitchId {
        self.switch
    }

    pub fn tables(&self) -> &AddressTables {
        &self.tables
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Runs proxy ARP (for ARP frames) and then forwarding, returning the
    /// commands to send to the switch in order.
    pub fn handle_packet_in(&mut self, event: PacketInEvent) -> Commands {
        self.stats.packets_in += 1;
        let is_arp = match event.frame.complete() {
            Some(frame) => frame.is_arp(),
            None => {
                warn!(target:"session", "{}: Ignoring incomplete packet", self.switch);
                self.stats.dropped += 1;
                return Commands::new();
            }
        };

        let event = match (&self.proxy_arp, is_arp) {
            (Some(proxy), true) => proxy.handle(&mut self.tables, event),
            _ => event,
        };
        if let FrameOrigin::Proxied { .. } = event.origin {
            self.stats.arp_replies += 1;
        }

        let commands = self.engine.forward(&mut self.tables, &event);
        self.stats.record(&commands);
        commands
    }

    /// Ends the session; its tables are discarded.
    pub fn close(self) -> SessionStats {
        info!(
            target:"session",
            "{} disconnected, {} hosts learned, stats: {:?}",
            self.switch,
            self.tables.mac_len(),
            self.stats
        );
        self.stats
    }
}
