//! Schema module - Configuration and report types for NK experiments.

mod config;
mod report;

pub use config::*;
pub use report::*;
