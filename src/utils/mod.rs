//! Console output helpers

pub mod display;
pub mod logging;

pub use display::{BoardFormatter, Color, ColorOutput};
pub use logging::init_logger_with_level;
