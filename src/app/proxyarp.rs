use crate::app::table::AddressTables;
use crate::event::{FrameOrigin, PacketInEvent, ParsedFrame};
use log::{debug, trace};
use rusty_ofswitch_packet::packet::arp::{HW_ADDR_LEN, PROTO_ADDR_LEN};
use rusty_ofswitch_packet::packet::{Arp, ArpOp};
use rusty_ofswitch_packet::{EthernetFrame, MacAddress, Packet};

/// Answers ARP requests from the switch's IP->MAC table and keeps that table
/// current from the requests and replies it sees.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProxyArp;

impl ProxyArp {
    pub fn new() -> ProxyArp {
        ProxyArp
    }

    /// Returns the event the forwarding engine should see: `event` itself,
    /// or a reply addressed to the requester when the target is known.
    pub fn handle(&self, tables: &mut AddressTables, event: PacketInEvent) -> PacketInEvent {
        let observed = event
            .frame
            .complete()
            .and_then(|frame| Some((frame.src, frame.as_arp()?.clone())));
        let (observed_src, arp) = match observed {
            Some(observed) => observed,
            None => {
                trace!(target:"proxyarp", "not an arp packet, pass through");
                return event;
            }
        };
        match arp.opcode {
            ArpOp::Request => {
                learn(tables, &arp, "Request");
                let target_mac = match tables.lookup_ip(&arp.target_ip) {
                    Some(mac) => mac,
                    None => return event,
                };
                let reply = build_reply(&arp, target_mac);
                debug!(
                    target:"proxyarp",
                    "Proxy ARP constructing an ARP Reply (SRC({}:{}) --> DST({}:{}))",
                    arp.sender_mac, arp.sender_ip, target_mac, arp.target_ip
                );
                PacketInEvent {
                    in_port: event.in_port,
                    buffer_id: None,
                    raw_data: Some(reply.write_to_bytes()),
                    frame: ParsedFrame::Complete(reply),
                    origin: FrameOrigin::Proxied { observed_src },
                }
            }
            ArpOp::Reply => {
                learn(tables, &arp, "Reply");
                event
            }
            ArpOp::Unknown(op) => {
                debug!(target:"proxyarp", "unknown arp op code: {}, pass through", op);
                event
            }
        }
    }
}

fn learn(tables: &mut AddressTables, arp: &Arp, kind: &str) {
    let previous = tables.learn_ip(arp.sender_ip, arp.sender_mac);
    if previous != Some(arp.sender_mac) {
        debug!(
            target:"proxyarp",
            "Got ARP {} message, adding ARP table entry: (IP: {} MAC: {})",
            kind, arp.sender_ip, arp.sender_mac
        );
    }
}

/// The reply `target_mac` would send to the sender of `request`.
pub fn build_reply(request: &Arp, target_mac: MacAddress) -> EthernetFrame {
    let reply = Arp {
        hw_type: request.hw_type,
        proto_type: request.proto_type,
        hw_addr_len: HW_ADDR_LEN,
        proto_addr_len: PROTO_ADDR_LEN,
        opcode: ArpOp::Reply,
        sender_mac: target_mac,
        sender_ip: request.target_ip,
        target_mac: request.sender_mac,
        target_ip: request.sender_ip,
    };
    EthernetFrame::arp(target_mac, request.sender_mac, reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representation::{BufferId, PortId};
    use std::net::Ipv4Addr;

    fn mac(last: u8) -> MacAddress {
        MacAddress([0, 0, 0, 0, 0, last])
    }

    fn request_event(port: u16) -> PacketInEvent {
        let request = Arp::request(mac(1), Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
        let frame = EthernetFrame::arp(mac(1), MacAddress::broadcast(), request);
        PacketInEvent::from_data(PortId(port), Some(BufferId(7)), frame.write_to_bytes())
    }

    #[test]
    fn request_for_known_target_is_answered() {
        let mut tables = AddressTables::new();
        tables.learn_ip(Ipv4Addr::new(10, 0, 0, 2), mac(2));

        let out = ProxyArp::new().handle(&mut tables, request_event(4));
        assert_eq!(out.in_port, PortId(4));
        assert_eq!(out.buffer_id, None);
        assert_eq!(out.origin, FrameOrigin::Proxied { observed_src: mac(1) });

        let frame = out.frame.complete().unwrap();
        assert_eq!(frame.src, mac(2));
        assert_eq!(frame.dst, mac(1));
        let reply = frame.as_arp().unwrap();
        assert_eq!(reply.opcode, ArpOp::Reply);
        assert_eq!(reply.sender_mac, mac(2));
        assert_eq!(reply.target_mac, mac(1));
        assert_eq!(reply.sender_ip, Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(reply.target_ip, Ipv4Addr::new(10, 0, 0, 1));

        let raw = out.raw_data.unwrap();
        assert_eq!(EthernetFrame::parse(&raw).as_ref(), Some(frame));
    }

    #[test]
    fn proxied_origin_keeps_ethernet_source() {
        let mut tables = AddressTables::new();
        tables.learn_ip(Ipv4Addr::new(10, 0, 0, 2), mac(2));
        let request = Arp::request(mac(1), Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
        let frame = EthernetFrame::arp(mac(5), MacAddress::broadcast(), request);
        let event = PacketInEvent::from_data(PortId(3), None, frame.write_to_bytes());

        let out = ProxyArp::new().handle(&mut tables, event);
        assert_eq!(out.origin, FrameOrigin::Proxied { observed_src: mac(5) });
        assert_eq!(out.observed_source(), Some(mac(5)));
        // the reply itself is still addressed to the ARP sender
        assert_eq!(out.frame.complete().unwrap().dst, mac(1));
    }

    #[test]
    fn request_discloses_requester() {
        let mut tables = AddressTables::new();
        let event = request_event(1);
        let out = ProxyArp::new().handle(&mut tables, event.clone());
        assert_eq!(out, event);
        assert_eq!(tables.lookup_ip(&Ipv4Addr::new(10, 0, 0, 1)), Some(mac(1)));
    }

    #[test]
    fn reply_is_learned_and_passed_through() {
        let mut tables = AddressTables::new();
        let request = Arp::request(mac(1), Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
        let reply = build_reply(&request, mac(2));
        let event = PacketInEvent::from_data(PortId(2), None, reply.write_to_bytes());

        let out = ProxyArp::new().handle(&mut tables, event.clone());
        assert_eq!(out, event);
        assert_eq!(tables.lookup_ip(&Ipv4Addr::new(10, 0, 0, 2)), Some(mac(2)));
    }

    #[test]
    fn unknown_opcode_is_ignored() {
        let mut tables = AddressTables::new();
        let mut arp = Arp::request(mac(1), Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
        arp.opcode = ArpOp::Unknown(3);
        let frame = EthernetFrame::arp(mac(1), MacAddress::broadcast(), arp);
        let event = PacketInEvent::from_data(PortId(1), None, frame.write_to_bytes());

        let out = ProxyArp::new().handle(&mut tables, event.clone());
        assert_eq!(out, event);
        assert_eq!(tables.ip_len(), 0);
    }

    #[test]
    fn reply_copies_hardware_and_protocol_types() {
        let mut request = Arp::request(mac(1), Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
        request.hw_type = 6;
        let frame = build_reply(&request, mac(2));
        let reply = frame.as_arp().unwrap();
        assert_eq!(reply.hw_type, 6);
        assert_eq!(reply.proto_type, 0x800);
        assert_eq!(reply.hw_addr_len, 6);
        assert_eq!(reply.proto_addr_len, 4);
    }
}
