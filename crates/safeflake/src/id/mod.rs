mod flake;
mod parsed;

pub use flake::*;
pub use parsed::*;
