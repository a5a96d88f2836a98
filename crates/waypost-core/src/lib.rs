pub mod config;
pub mod error;
pub mod types;

pub use config::WaypostConfig;
pub use error::{Result, WaypostError};
pub use types::*;
