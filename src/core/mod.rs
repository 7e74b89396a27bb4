//! Error type, result alias and logging setup

pub mod types;
pub mod error;
pub mod logging;

pub use types::*;
pub use error::Error;
