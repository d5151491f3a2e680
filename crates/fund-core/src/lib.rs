pub mod error;
pub mod money;

pub use error::*;
pub use money::*;
