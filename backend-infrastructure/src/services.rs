pub mod archive_service;
pub mod system_clock;

pub use archive_service::*;
pub use system_clock::*;
