//! CLI library components for the central line event calculator.

pub mod logging;
pub mod pipeline;
pub mod types;
