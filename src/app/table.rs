use crate::representation::PortId;
use rusty_ofswitch_packet::MacAddress;
use std::collections::HashMap;
use std::net::Ipv4Addr;

/// MAC->port and IP->MAC tables of one switch. Last write wins for both.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct AddressTables {
    mac_to_port: HashMap<MacAddress, PortId>,
    ip_to_mac: HashMap<Ipv4Addr, MacAddress>,
}

impl AddressTables {
    pub fn new() -> AddressTables {
        Default::default()
    }

    /// Returns the port previously recorded for `mac`, if any.
    pub fn learn_mac(&mut self, mac: MacAddress, port: PortId) -> Option<PortId> {
        self.mac_to_port.insert(mac, port)
    }

    pub fn lookup_mac(&self, mac: &MacAddress) -> Option<PortId> {
        self.mac_to_port.get(mac).copied()
    }

    /// Returns the MAC previously recorded for `ip`, if any.
    pub fn learn_ip(&mut self, ip: Ipv4Addr, mac: MacAddress) -> Option<MacAddress> {
        self.ip_to_mac.insert(ip, mac)
    }

    pub fn lookup_ip(&self, ip: &Ipv4Addr) -> Option<MacAddress> {
        self.ip_to_mac.get(ip).copied()
    }

    pub fn mac_len(&self) -> usize {
        self.mac_to_port.len()
    }

    pub fn ip_len(&self) -> usize {
        self.ip_to_mac.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learning_is_idempotent() {
        let mac = MacAddress([0, 0, 0, 0, 0, 1]);
        let mut once = AddressTables::new();
        once.learn_mac(mac, PortId(1));
        let mut many = AddressTables::new();
        for _ in 0..5 {
            many.learn_mac(mac, PortId(1));
        }
        assert_eq!(once, many);
        assert_eq!(many.mac_len(), 1);
    }

    #[test]
    fn host_move_overwrites() {
        let mac = MacAddress([0, 0, 0, 0, 0, 1]);
        let mut tables = AddressTables::new();
        assert_eq!(tables.learn_mac(mac, PortId(1)), None);
        assert_eq!(tables.learn_mac(mac, PortId(2)), Some(PortId(1)));
        assert_eq!(tables.lookup_mac(&mac), Some(PortId(2)));
    }

    #[test]
    fn readdressing_overwrites() {
        let ip = Ipv4Addr::new(10, 0, 0, 1);
        let mut tables = AddressTables::new();
        tables.learn_ip(ip, MacAddress([0, 0, 0, 0, 0, 1]));
        tables.learn_ip(ip, MacAddress([0, 0, 0, 0, 0, 9]));
        assert_eq!(tables.lookup_ip(&ip), Some(MacAddress([0, 0, 0, 0, 0, 9])));
        assert_eq!(tables.ip_len(), 1);
        assert_eq!(tables.lookup_ip(&Ipv4Addr::new(10, 0, 0, 2)), None);
    }
}
