use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// A 48-bit Ethernet hardware address.
#[derive(Eq, Hash, PartialEq, Clone, Copy, Default, Ord, PartialOrd)]
pub struct MacAddress(pub [u8; 6]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacParseError(pub String);

impl Display for MacParseError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "invalid mac address: {}", self.0)
    }
}

impl std::error::Error for MacParseError {}

impl MacAddress {
    /// Parses "aa:bb:cc:dd:ee:ff" (or the same digits separated by '-' or nothing).
    pub fn of(s: &str) -> Result<MacAddress, MacParseError> {
        let digits: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();
        let vec = hex::decode(&digits).map_err(|_| MacParseError(s.to_owned()))?;
        Self::try_from_slice(&vec).ok_or_else(|| MacParseError(s.to_owned()))
    }

    pub fn try_from_slice(b: &[u8]) -> Option<MacAddress> {
        if b.len() != 6 {
            return None;
        }
        let mut mac = [0u8; 6];
        mac.copy_from_slice(b);
        Some(MacAddress(mac))
    }

    pub fn broadcast() -> MacAddress {
        MacAddress([0xff; 6])
    }

    pub fn zero() -> MacAddress {
        MacAddress([0x00; 6])
    }
}

impl AsRef<[u8]> for MacAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(b: [u8; 6]) -> Self {
        MacAddress(b)
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MacAddress::of(s)
    }
}

impl Display for MacAddress {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl Debug for MacAddress {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        Display::fmt(self, f)
    }
}

impl Serialize for MacAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MacAddress::of(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let mac = MacAddress::of("00:00:00:00:01:0a").unwrap();
        assert_eq!(mac, MacAddress([0, 0, 0, 0, 1, 0x0a]));
        assert_eq!(mac.to_string(), "00:00:00:00:01:0a");
        assert_eq!("de-ad-be-ef-00-01".parse::<MacAddress>().unwrap().0[0], 0xde);
    }

    #[test]
    fn reject_bad_input() {
        assert!(MacAddress::of("00:00:00:00:01").is_err());
        assert!(MacAddress::of("zz:00:00:00:00:01").is_err());
    }

    #[test]
    fn serde_as_string() {
        let mac = MacAddress::of("0a:0b:0c:0d:0e:0f").unwrap();
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"0a:0b:0c:0d:0e:0f\"");
        let back: MacAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mac);
    }
}
