pub mod dispatch;
pub mod session;

pub use dispatch::{ControlEvent, Controller, ControllerHandle};
pub use session::{SessionStats, SwitchSession};
