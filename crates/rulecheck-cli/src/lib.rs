//! Rulecheck CLI library components.
//!
//! The main binary is in `main.rs`; the pieces it uses live here so they can
//! be tested without spawning processes.

pub mod commands;
pub mod formatters;
pub mod logging;

pub use commands::{run_check, CheckOptions, CheckOutcome};
