use bytes::{BufMut, Bytes, BytesMut};

pub use arp::{Arp, ArpOp};
pub use ethernet::{EtherType, Ethernet, EthernetFrame, FramePayload};

pub mod arp;
pub mod ethernet;

/// A protocol header borrowed or decoded from `'a` bytes, optionally carrying
/// an inner packet. Encoding writes the header and then the inner packet.
pub trait Packet<'a>: Sized {
    type Payload: Packet<'a>;

    fn from_bytes(b: &'a [u8]) -> Option<Self>;

    /// Encoded length of this header alone.
    fn header_len(&self) -> usize;

    fn write_header<T: BufMut>(&self, buf: &mut T);

    fn payload(&self) -> Option<&Self::Payload> {
        None
    }

    fn wire_len(&self) -> usize {
        self.header_len() + self.payload().map_or(0, |inner| inner.wire_len())
    }

    fn write_to_bytes(&self) -> Bytes {
        fn write_into<'a, P: Packet<'a>>(packet: &P, buf: &mut BytesMut) {
            packet.write_header(buf);
            if let Some(inner) = packet.payload() {
                write_into(inner, buf);
            }
        }
        let mut buf = BytesMut::with_capacity(self.wire_len());
        write_into(self, &mut buf);
        buf.freeze()
    }
}

/// Terminates a packet chain.
impl<'a> Packet<'a> for () {
    type Payload = ();

    fn from_bytes(_b: &'a [u8]) -> Option<Self> {
        Some(())
    }

    fn header_len(&self) -> usize {
        0
    }

    fn write_header<T: BufMut>(&self, _buf: &mut T) {}
}

/// An undecoded body, kept as the bytes that were seen.
impl<'a> Packet<'a> for &'a [u8] {
    type Payload = ();

    fn from_bytes(b: &'a [u8]) -> Option<Self> {
        Some(b)
    }

    fn header_len(&self) -> usize {
        self.len()
    }

    fn write_header<T: BufMut>(&self, buf: &mut T) {
        buf.put_slice(self)
    }
}
