#[cfg(feature = "async-smol")]
mod smol;
#[cfg(feature = "async-tokio")]
mod tokio;

#[cfg(feature = "async-smol")]
pub use smol::*;
#[cfg(feature = "async-tokio")]
pub use tokio::*;
