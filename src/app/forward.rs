use crate::app::table::AddressTables;
use crate::config::{ForwardingConfig, ForwardingMode};
use crate::event::{Command, FlowMod, FrameOrigin, PacketInEvent, PacketOut, PacketOutPayload};
use crate::representation::PortId;
use crate::util::flow::{output, FlowMatch, FlowRule, RuleMatch};
use log::{debug, trace};
use rusty_ofswitch_packet::EthernetFrame;
use smallvec::{smallvec, SmallVec};

pub type Commands = SmallVec<[Command; 2]>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ForwardIntent {
    Flood,
    Unicast { out_port: PortId, install_rule: bool },
}

/// Learns where sources live and turns each packet-in into switch commands.
#[derive(Debug, Clone, Default)]
pub struct ForwardingEngine {
    config: ForwardingConfig,
}

impl ForwardingEngine {
    pub fn new(config: ForwardingConfig) -> ForwardingEngine {
        ForwardingEngine { config }
    }

    /// Learns the source of `event` and picks how `frame` leaves the switch.
    /// `Unicast` is only returned for a destination present in the table.
    pub fn decide(
        &self,
        tables: &mut AddressTables,
        event: &PacketInEvent,
        frame: &EthernetFrame,
    ) -> ForwardIntent {
        let in_port = event.in_port;
        if let Some(src) = event.observed_source() {
            match tables.learn_mac(src, in_port) {
                None => debug!(
                    target:"forward",
                    "Adding switch table entry: (MAC: {} is at PORT: {})", src, in_port
                ),
                Some(old) if old != in_port => debug!(
                    target:"forward",
                    "MAC: {} moved from PORT {} to PORT {}", src, old, in_port
                ),
                Some(_) => {}
            }
        }

        if self.config.mode == ForwardingMode::Hub {
            return ForwardIntent::Flood;
        }

        match tables.lookup_mac(&frame.dst) {
            Some(out_port) => {
                debug!(target:"forward", "MAC: {} found in table --> PORT {}", frame.dst, out_port);
                let install_rule = self.config.install_rules_on_unicast
                    && event.origin == FrameOrigin::Observed
                    && out_port != in_port;
                ForwardIntent::Unicast {
                    out_port,
                    install_rule,
                }
            }
            None => ForwardIntent::Flood,
        }
    }

    /// Runs `decide` and builds the commands carrying it out. Produces nothing
    /// for an incomplete frame or when the packet can be neither referenced
    /// nor resent; learning still happens in the latter case.
    pub fn forward(&self, tables: &mut AddressTables, event: &PacketInEvent) -> Commands {
        let frame = match event.frame.complete() {
            Some(frame) => frame,
            None => return Commands::new(),
        };
        let intent = self.decide(tables, event, frame);
        let payload = match event.retransmit_payload() {
            Some(payload) => payload,
            None => {
                debug!(target:"forward", "No buffer id and no data on packet from {}, nothing to send", frame.src);
                return Commands::new();
            }
        };
        let in_port = event.in_port;

        match intent {
            ForwardIntent::Flood => {
                let flood_port: PortId = self.config.flood_port.into();
                debug!(
                    target:"forward",
                    "Flooding packet: {}.{} --> {}.{}", frame.src, in_port, frame.dst, flood_port
                );
                smallvec![Command::PacketOut(PacketOut {
                    in_port,
                    payload,
                    actions: output(flood_port),
                })]
            }
            ForwardIntent::Unicast {
                out_port,
                install_rule: true,
            } => {
                let rule = self.rule_for(frame, in_port, out_port);
                debug!(
                    target:"forward",
                    "Installing a flow entry, MAC: {} is connected to PORT {}", frame.dst, out_port
                );
                match payload {
                    PacketOutPayload::Buffered(buffer_id) => smallvec![Command::FlowMod(FlowMod {
                        rule,
                        buffer_id: Some(buffer_id),
                    })],
                    PacketOutPayload::Data(data) => smallvec![
                        Command::FlowMod(FlowMod {
                            rule,
                            buffer_id: None,
                        }),
                        Command::PacketOut(PacketOut {
                            in_port,
                            payload: PacketOutPayload::Data(data),
                            actions: output(out_port),
                        }),
                    ],
                }
            }
            ForwardIntent::Unicast {
                out_port,
                install_rule: false,
            } => {
                let egress = if out_port == in_port {
                    PortId::IN_PORT
                } else {
                    out_port
                };
                trace!(target:"forward", "Sending packet to port {} only", egress);
                smallvec![Command::PacketOut(PacketOut {
                    in_port,
                    payload,
                    actions: output(egress),
                })]
            }
        }
    }

    /// Rule sending traffic like `frame` to `out_port`.
    pub fn rule_for(&self, frame: &EthernetFrame, in_port: PortId, out_port: PortId) -> FlowRule {
        let flow_match = match self.config.rule_match {
            RuleMatch::FullHeader => FlowMatch::from_frame(frame, in_port),
            RuleMatch::MacPair => FlowMatch::mac_pair(frame.src, frame.dst),
        };
        FlowRule {
            flow_match,
            actions: output(out_port),
            priority: self.config.rule_priority,
            idle_timeout: self.config.idle_timeout(),
            hard_timeout: self.config.hard_timeout(),
        }
    }
}
