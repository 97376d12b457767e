use crate::representation::SwitchId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file {} error: {:?}", path, error)]
    Io { path: String, error: std::io::Error },
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Controller is no longer running")]
    ControllerClosed,
    #[error("Switch {0} has no session")]
    SessionNotFound(SwitchId),
}
