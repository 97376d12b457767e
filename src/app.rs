//! Per-switch decision logic: address learning, proxy ARP and forwarding.

pub mod forward;
pub mod proxyarp;
pub mod table;

pub use forward::{ForwardIntent, ForwardingEngine};
pub use proxyarp::ProxyArp;
pub use table::AddressTables;
