//! Shared configuration and logging setup.

mod environment;
mod logging;

pub use environment::{EdgexEnvironment, ParseEnvironmentError};
pub use logging::init_logging;
