use crate::error::ConfigError;
use crate::representation::PortId;
use crate::util::flow::RuleMatch;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardingMode {
    /// Learn and unicast toward known destinations.
    Learning,
    /// Learn, but always flood.
    Hub,
}

impl Default for ForwardingMode {
    fn default() -> Self {
        ForwardingMode::Learning
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloodPort {
    Flood,
    All,
}

impl Default for FloodPort {
    fn default() -> Self {
        FloodPort::Flood
    }
}

impl From<FloodPort> for PortId {
    fn from(p: FloodPort) -> Self {
        match p {
            FloodPort::Flood => PortId::FLOOD,
            FloodPort::All => PortId::ALL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ForwardingConfig {
    pub mode: ForwardingMode,
    pub install_rules_on_unicast: bool,
    /// Seconds.
    pub idle_timeout: Option<u16>,
    /// Seconds.
    pub hard_timeout: Option<u16>,
    pub flood_port: FloodPort,
    pub rule_match: RuleMatch,
    pub rule_priority: u16,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        ForwardingConfig {
            mode: ForwardingMode::Learning,
            install_rules_on_unicast: true,
            idle_timeout: None,
            hard_timeout: None,
            flood_port: FloodPort::Flood,
            rule_match: RuleMatch::FullHeader,
            rule_priority: 0x8000,
        }
    }
}

impl ForwardingConfig {
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout.map(|s| Duration::from_secs(s as u64))
    }

    pub fn hard_timeout(&self) -> Option<Duration> {
        self.hard_timeout.map(|s| Duration::from_secs(s as u64))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ProxyArpConfig {
    pub enabled: bool,
}

impl Default for ProxyArpConfig {
    fn default() -> Self {
        ProxyArpConfig { enabled: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    pub forwarding: ForwardingConfig,
    pub proxy_arp: ProxyArpConfig,
}

impl ControllerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ControllerConfig, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|error| ConfigError::Io {
            path: path.display().to_string(),
            error,
        })?;
        Ok(serde_json::from_slice(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_gives_defaults() {
        let config: ControllerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ControllerConfig::default());
        assert!(config.proxy_arp.enabled);
        assert!(config.forwarding.install_rules_on_unicast);
        assert_eq!(config.forwarding.idle_timeout(), None);
    }

    #[test]
    fn timed_out_variant() {
        let config: ControllerConfig = serde_json::from_str(
            r#"{"forwarding": {"idle_timeout": 10, "hard_timeout": 30, "flood_port": "all", "rule_match": "mac_pair"}}"#,
        )
        .unwrap();
        assert_eq!(config.forwarding.idle_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.forwarding.hard_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(PortId::from(config.forwarding.flood_port), PortId::ALL);
        assert_eq!(config.forwarding.rule_match, RuleMatch::MacPair);
        assert_eq!(config.forwarding.mode, ForwardingMode::Learning);
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"forwarding": {{"mode": "hub"}}, "proxy_arp": {{"enabled": false}}}}"#).unwrap();
        let config = ControllerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.forwarding.mode, ForwardingMode::Hub);
        assert!(!config.proxy_arp.enabled);
    }

    #[test]
    fn missing_file_is_io_error() {
        match ControllerConfig::from_file("/nonexistent/ofswitch.json") {
            Err(ConfigError::Io { path, .. }) => assert_eq!(path, "/nonexistent/ofswitch.json"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
