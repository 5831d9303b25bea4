mod interface;
mod mono_clock;
mod system;

pub use interface::*;
pub use mono_clock::*;
pub use system::*;

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
pub(crate) use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub(crate) use web_time::{SystemTime, UNIX_EPOCH};
