use super::Packet;
use crate::mac::MacAddress;
use bytes::BufMut;
use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u8};
use std::net::Ipv4Addr;

pub const ETHERNET_TYPE_ARP: u16 = 0x806;
pub const HW_TYPE_ETHERNET: u16 = 0x1;
pub const PROTO_TYPE_IPV4: u16 = 0x800;
pub const HW_ADDR_LEN: u8 = 6;
pub const PROTO_ADDR_LEN: u8 = 4;

/// An Ethernet/IPv4 ARP message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arp {
    pub hw_type: u16,
    pub proto_type: u16,
    pub hw_addr_len: u8,
    pub proto_addr_len: u8,
    pub opcode: ArpOp,
    pub sender_mac: MacAddress,
    pub sender_ip: Ipv4Addr,
    pub target_mac: MacAddress,
    pub target_ip: Ipv4Addr,
}

impl Arp {
    pub fn request(sender_mac: MacAddress, sender_ip: Ipv4Addr, target_ip: Ipv4Addr) -> Arp {
        Arp {
            hw_type: HW_TYPE_ETHERNET,
            proto_type: PROTO_TYPE_IPV4,
            hw_addr_len: HW_ADDR_LEN,
            proto_addr_len: PROTO_ADDR_LEN,
            opcode: ArpOp::Request,
            sender_mac,
            sender_ip,
            target_mac: MacAddress::zero(),
            target_ip,
        }
    }
}

impl<'a> Packet<'a> for Arp {
    type Payload = ();

    fn from_bytes(b: &'a [u8]) -> Option<Self> {
        let (b, hw_type) = be_u16::<_, ()>(b).ok()?;
        let (b, proto_type) = be_u16::<_, ()>(b).ok()?;
        let (b, hw_addr_len) = be_u8::<_, ()>(b).ok()?;
        let (b, proto_addr_len) = be_u8::<_, ()>(b).ok()?;
        if hw_addr_len != HW_ADDR_LEN || proto_addr_len != PROTO_ADDR_LEN {
            return None;
        }
        let (b, opcode) = be_u16::<_, ()>(b).ok()?;
        let opcode = ArpOp::from(opcode);
        let (b, sender_mac) = take::<_, _, ()>(hw_addr_len)(b).ok()?;
        let (b, sender_ip) = take::<_, _, ()>(proto_addr_len)(b).ok()?;
        let (b, target_mac) = take::<_, _, ()>(hw_addr_len)(b).ok()?;
        let (_b, target_ip) = take::<_, _, ()>(proto_addr_len)(b).ok()?;
        Some(Arp {
            hw_type,
            proto_type,
            hw_addr_len,
            proto_addr_len,
            opcode,
            sender_mac: MacAddress::try_from_slice(sender_mac)?,
            sender_ip: to_ipv4(sender_ip)?,
            target_mac: MacAddress::try_from_slice(target_mac)?,
            target_ip: to_ipv4(target_ip)?,
        })
    }

    fn header_len(&self) -> usize {
        (8 + 2 * self.hw_addr_len + 2 * self.proto_addr_len) as usize
    }

    fn write_header<T: BufMut>(&self, buf: &mut T) {
        buf.put_u16(self.hw_type);
        buf.put_u16(self.proto_type);
        buf.put_u8(self.hw_addr_len);
        buf.put_u8(self.proto_addr_len);
        buf.put_u16(self.opcode.into());
        buf.put_slice(self.sender_mac.as_ref());
        buf.put_slice(&self.sender_ip.octets());
        buf.put_slice(self.target_mac.as_ref());
        buf.put_slice(&self.target_ip.octets());
    }
}

fn to_ipv4(b: &[u8]) -> Option<Ipv4Addr> {
    if b.len() != 4 {
        return None;
    }
    let mut s = [0u8; 4];
    s.copy_from_slice(b);
    Some(Ipv4Addr::from(s))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArpOp {
    Request,
    Reply,
    Unknown(u16),
}

impl From<u16> for ArpOp {
    fn from(op: u16) -> Self {
        match op {
            0x1 => ArpOp::Request,
            0x2 => ArpOp::Reply,
            other => ArpOp::Unknown(other),
        }
    }
}

impl From<ArpOp> for u16 {
    fn from(op: ArpOp) -> Self {
        match op {
            ArpOp::Request => 0x1,
            ArpOp::Reply => 0x2,
            ArpOp::Unknown(o) => o,
        }
    }
}
