//! Utility modules for openal-trace

pub mod logging;

pub use logging::init_logging;
