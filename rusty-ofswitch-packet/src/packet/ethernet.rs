use super::arp::{Arp, ETHERNET_TYPE_ARP};
use super::Packet;
use crate::mac::MacAddress;
use bytes::{BufMut, Bytes};
use nom::bytes::complete::take;
use nom::number::complete::be_u16;
use std::fmt::Debug;
use std::fmt::Formatter;

pub const ETHERNET_HEADER_LEN: usize = 14;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EtherType {
    Arp,
    Other(u16),
}

impl From<u16> for EtherType {
    fn from(t: u16) -> Self {
        match t {
            ETHERNET_TYPE_ARP => EtherType::Arp,
            other => EtherType::Other(other),
        }
    }
}

impl From<EtherType> for u16 {
    fn from(t: EtherType) -> Self {
        match t {
            EtherType::Arp => ETHERNET_TYPE_ARP,
            EtherType::Other(o) => o,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Ethernet<P> {
    pub dst: MacAddress,
    pub src: MacAddress,
    pub ether_type: EtherType,
    pub payload: P,
}

impl<P> Debug for Ethernet<P> {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "src: {} dst: {} type: {:x}",
            self.src,
            self.dst,
            u16::from(self.ether_type)
        )
    }
}

impl<P> Ethernet<P> {
    pub fn is_arp(&self) -> bool {
        self.ether_type == EtherType::Arp
    }
}

impl<'a, P> Packet<'a> for Ethernet<P>
where
    P: Packet<'a>,
{
    type Payload = P;

    fn from_bytes(b: &'a [u8]) -> Option<Self> {
        let (b, dst) = take::<_, _, ()>(6u8)(b).ok()?;
        let (b, src) = take::<_, _, ()>(6u8)(b).ok()?;
        let (b, ether_type) = be_u16::<_, ()>(b).ok()?;
        let payload = P::from_bytes(b)?;
        Some(Ethernet {
            dst: MacAddress::try_from_slice(dst)?,
            src: MacAddress::try_from_slice(src)?,
            ether_type: EtherType::from(ether_type),
            payload,
        })
    }

    fn header_len(&self) -> usize {
        ETHERNET_HEADER_LEN
    }

    fn write_header<T: BufMut>(&self, buf: &mut T) {
        buf.put_slice(self.dst.as_ref());
        buf.put_slice(self.src.as_ref());
        buf.put_u16(self.ether_type.into());
    }

    fn payload(&self) -> Option<&Self::Payload> {
        Some(&self.payload)
    }
}

/// The decoded body of a frame: an ARP message when the ether type says so
/// and the body is a well-formed Ethernet/IPv4 ARP packet, raw bytes otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramePayload {
    Arp(Arp),
    Data(Bytes),
}

impl FramePayload {
    pub fn as_arp(&self) -> Option<&Arp> {
        match self {
            FramePayload::Arp(arp) => Some(arp),
            FramePayload::Data(_) => None,
        }
    }
}

impl<'a> Packet<'a> for FramePayload {
    type Payload = ();

    fn from_bytes(b: &'a [u8]) -> Option<Self> {
        Some(FramePayload::Data(Bytes::copy_from_slice(b)))
    }

    fn header_len(&self) -> usize {
        match self {
            FramePayload::Arp(arp) => arp.header_len(),
            FramePayload::Data(data) => data.len(),
        }
    }

    fn write_header<T: BufMut>(&self, buf: &mut T) {
        match self {
            FramePayload::Arp(arp) => arp.write_header(buf),
            FramePayload::Data(data) => buf.put_slice(data.as_ref()),
        }
    }
}

pub type EthernetFrame = Ethernet<FramePayload>;

impl Ethernet<FramePayload> {
    /// Decodes a whole frame, typing the payload by ether type. Returns `None`
    /// only when the Ethernet header itself is incomplete.
    pub fn parse(b: &[u8]) -> Option<EthernetFrame> {
        let header = Ethernet::<&[u8]>::from_bytes(b)?;
        let payload = match header.ether_type {
            EtherType::Arp => match Arp::from_bytes(header.payload) {
                Some(arp) => FramePayload::Arp(arp),
                None => FramePayload::Data(Bytes::copy_from_slice(header.payload)),
            },
            EtherType::Other(_) => FramePayload::Data(Bytes::copy_from_slice(header.payload)),
        };
        Some(Ethernet {
            dst: header.dst,
            src: header.src,
            ether_type: header.ether_type,
            payload,
        })
    }

    pub fn arp(src: MacAddress, dst: MacAddress, arp: Arp) -> EthernetFrame {
        Ethernet {
            dst,
            src,
            ether_type: EtherType::Arp,
            payload: FramePayload::Arp(arp),
        }
    }

    pub fn as_arp(&self) -> Option<&Arp> {
        if !self.is_arp() {
            return None;
        }
        self.payload.as_arp()
    }
}
