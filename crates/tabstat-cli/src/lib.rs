//! CLI library components for tabstat.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod report;
