//! Control-plane core of a flow-based Ethernet switch controller.
//!
//! Each connected switch gets a [`SwitchSession`](crate::core::SwitchSession) that
//! learns host locations from packet-ins, answers ARP requests it can resolve
//! and turns the rest into flood or unicast commands, installing flow rules
//! for the destinations it knows.

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod event;
pub mod representation;
pub mod util;

pub use rusty_ofswitch_packet as packet;

pub use crate::config::ControllerConfig;
pub use crate::core::{Controller, ControllerHandle, SwitchSession};
pub use crate::error::{ConfigError, DispatchError};
