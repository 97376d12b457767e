pub mod mac;
pub mod packet;

pub use mac::MacAddress;
pub use packet::{Arp, Ethernet, EthernetFrame, FramePayload, Packet};
