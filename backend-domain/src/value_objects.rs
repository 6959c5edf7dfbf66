// Domain value objects
pub mod caller;

pub use caller::*;
