use crate::representation::PortId;
use rusty_ofswitch_packet::{EthernetFrame, MacAddress};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::net::Ipv4Addr;
use std::time::Duration;

/// OpenFlow 1.0 style match. `None` fields are wildcarded.
#[derive(Debug, Hash, Clone, Default, Eq, PartialEq)]
pub struct FlowMatch {
    pub in_port: Option<PortId>,
    pub dl_src: Option<MacAddress>,
    pub dl_dst: Option<MacAddress>,
    pub dl_type: Option<u16>,
    pub nw_proto: Option<u8>,
    pub nw_src: Option<Ipv4Addr>,
    pub nw_dst: Option<Ipv4Addr>,
}

impl FlowMatch {
    pub fn mac_pair(src: MacAddress, dst: MacAddress) -> FlowMatch {
        FlowMatch {
            dl_src: Some(src),
            dl_dst: Some(dst),
            ..Default::default()
        }
    }

    /// Matches the ingress port and the Ethernet header of `frame`. For ARP
    /// the opcode and protocol addresses are matched too; IP and transport
    /// fields of other frames stay wildcarded, since the payload is not decoded.
    pub fn from_frame(frame: &EthernetFrame, in_port: PortId) -> FlowMatch {
        let mut m = FlowMatch {
            in_port: Some(in_port),
            dl_src: Some(frame.src),
            dl_dst: Some(frame.dst),
            dl_type: Some(frame.ether_type.into()),
            ..Default::default()
        };
        if let Some(arp) = frame.as_arp() {
            // OpenFlow 1.0 carries the low byte of the ARP opcode in nw_proto.
            m.nw_proto = Some((u16::from(arp.opcode) & 0xff) as u8);
            m.nw_src = Some(arp.sender_ip);
            m.nw_dst = Some(arp.target_ip);
        }
        m
    }
}

#[derive(Debug, Hash, Clone, Copy, Eq, PartialEq)]
pub enum Action {
    Output(PortId),
}

pub type Actions = SmallVec<[Action; 1]>;

pub fn output(port: PortId) -> Actions {
    smallvec![Action::Output(port)]
}

/// Which headers a synthesized rule matches on.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMatch {
    FullHeader,
    MacPair,
}

impl Default for RuleMatch {
    fn default() -> Self {
        RuleMatch::FullHeader
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FlowRule {
    pub flow_match: FlowMatch,
    pub actions: Actions,
    pub priority: u16,
    pub idle_timeout: Option<Duration>,
    pub hard_timeout: Option<Duration>,
}

impl FlowRule {
    pub fn output_port(&self) -> Option<PortId> {
        self.actions.iter().map(|Action::Output(p)| *p).next()
    }
}
