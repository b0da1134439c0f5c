pub mod check;
pub mod checkers;

pub use check::{run_check, CheckOptions, CheckOutcome, ReportedDiagnostic, UnitResult};
pub use checkers::{checker_registry_for_listing, render_checkers};
