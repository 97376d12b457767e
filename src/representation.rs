use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// Datapath id of a connected switch.
#[derive(Hash, Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Ord, PartialOrd)]
pub struct SwitchId(pub u64);

impl Display for SwitchId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// An OpenFlow 1.0 port number. Values from `0xff00` up are reserved.
#[derive(Hash, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Ord, PartialOrd)]
pub struct PortId(pub u16);

impl PortId {
    pub const IN_PORT: PortId = PortId(0xfff8);
    pub const FLOOD: PortId = PortId(0xfffb);
    pub const ALL: PortId = PortId(0xfffc);
    pub const CONTROLLER: PortId = PortId(0xfffd);
    pub const NONE: PortId = PortId(0xffff);
}

impl Debug for PortId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match *self {
            PortId::IN_PORT => write!(f, "IN_PORT"),
            PortId::FLOOD => write!(f, "FLOOD"),
            PortId::ALL => write!(f, "ALL"),
            PortId::CONTROLLER => write!(f, "CONTROLLER"),
            PortId::NONE => write!(f, "NONE"),
            PortId(n) => write!(f, "{}", n),
        }
    }
}

impl Display for PortId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

/// Handle of a packet held in the switch's buffer.
#[derive(Hash, Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BufferId(pub u32);

impl BufferId {
    /// The switch did not buffer the packet.
    pub const NO_BUFFER: BufferId = BufferId(0xffff_ffff);

    pub fn is_valid(&self) -> bool {
        *self != Self::NO_BUFFER
    }
}
