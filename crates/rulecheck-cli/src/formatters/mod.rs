//! Output formatters for check results.

pub mod human;
pub mod json;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

use crate::commands::CheckOutcome;

/// Trait for rendering check results
pub trait Formatter {
    /// Render the whole outcome as one string
    fn render(&self, outcome: &CheckOutcome) -> String;
}
