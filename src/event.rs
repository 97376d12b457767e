use crate::representation::{BufferId, PortId};
use crate::util::flow::{Actions, FlowRule};
use bytes::Bytes;
use rusty_ofswitch_packet::{EthernetFrame, MacAddress};

/// Where the frame of a packet-in came from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FrameOrigin {
    /// Seen on the wire by the switch.
    Observed,
    /// Synthesized by the proxy ARP in answer to a request whose Ethernet
    /// source was `observed_src`.
    Proxied { observed_src: MacAddress },
}

/// The decoded frame carried by a packet-in. The decoder marks frames it could
/// not fully parse as `Incomplete`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ParsedFrame {
    Complete(EthernetFrame),
    Incomplete,
}

impl ParsedFrame {
    pub fn parse(data: &[u8]) -> ParsedFrame {
        match EthernetFrame::parse(data) {
            Some(frame) => ParsedFrame::Complete(frame),
            None => ParsedFrame::Incomplete,
        }
    }

    pub fn complete(&self) -> Option<&EthernetFrame> {
        match self {
            ParsedFrame::Complete(frame) => Some(frame),
            ParsedFrame::Incomplete => None,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PacketInEvent {
    pub in_port: PortId,
    pub buffer_id: Option<BufferId>,
    pub raw_data: Option<Bytes>,
    pub frame: ParsedFrame,
    pub origin: FrameOrigin,
}

impl PacketInEvent {
    pub fn new(
        in_port: PortId,
        buffer_id: Option<BufferId>,
        raw_data: Option<Bytes>,
        frame: ParsedFrame,
    ) -> PacketInEvent {
        PacketInEvent {
            in_port,
            buffer_id,
            raw_data,
            frame,
            origin: FrameOrigin::Observed,
        }
    }

    /// Builds an event from the bytes a switch sent up, decoding the frame.
    pub fn from_data(in_port: PortId, buffer_id: Option<BufferId>, data: Bytes) -> PacketInEvent {
        let frame = ParsedFrame::parse(&data);
        PacketInEvent::new(in_port, buffer_id, Some(data), frame)
    }

    /// How the packet can be sent again: by buffer reference when the switch
    /// holds it, by value otherwise.
    pub fn retransmit_payload(&self) -> Option<PacketOutPayload> {
        match (self.buffer_id, &self.raw_data) {
            (Some(buffer_id), _) if buffer_id.is_valid() => {
                Some(PacketOutPayload::Buffered(buffer_id))
            }
            (_, Some(data)) => Some(PacketOutPayload::Data(data.clone())),
            _ => None,
        }
    }

    /// The MAC address actually seen behind `in_port`.
    pub fn observed_source(&self) -> Option<MacAddress> {
        match self.origin {
            FrameOrigin::Observed => self.frame.complete().map(|f| f.src),
            FrameOrigin::Proxied { observed_src } => Some(observed_src),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PacketOutPayload {
    Buffered(BufferId),
    Data(Bytes),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PacketOut {
    pub in_port: PortId,
    pub payload: PacketOutPayload,
    pub actions: Actions,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FlowMod {
    pub rule: FlowRule,
    /// Buffered packet to release through the new rule.
    pub buffer_id: Option<BufferId>,
}

/// Outbound message for a switch.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Command {
    PacketOut(PacketOut),
    FlowMod(FlowMod),
}

impl Command {
    pub fn is_flow_mod(&self) -> bool {
        matches!(self, Command::FlowMod(_))
    }

    pub fn is_packet_out(&self) -> bool {
        matches!(self, Command::PacketOut(_))
    }
}
