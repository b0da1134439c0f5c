//! Security and performance constants for the rule engine
//!
//! These constants bound what a rule file can make the engine do:
//! - ReDoS (Regular Expression Denial of Service)
//! - Memory exhaustion
//! - Runaway rules reporting on every node

/// Maximum regex pattern length (500 characters)
///
/// Rationale: Extremely long regex patterns are often a sign of
/// malicious input or poor design. This limit prevents ReDoS attacks
/// and keeps patterns maintainable.
pub const MAX_REGEX_LENGTH: usize = 500;

/// Compiled regex size limit (10MB)
///
/// Rationale: Limits memory usage of compiled regex patterns.
/// Prevents memory exhaustion from pathological patterns.
/// Applied during regex compilation via RegexBuilder.
pub const REGEX_SIZE_LIMIT: usize = 10_000_000; // 10MB

/// Regex DFA size limit (2MB)
///
/// Rationale: Limits the size of the deterministic finite automaton
/// used by the regex engine. Prevents excessive memory usage during
/// pattern matching operations.
pub const REGEX_DFA_SIZE_LIMIT: usize = 2_000_000; // 2MB

/// Maximum findings reported for one source unit (10,000)
///
/// Rationale: A rule that fires on nearly every node is almost always a
/// broken rule. Past this limit the run stops and reports an execution
/// error instead of flooding the host.
pub const MAX_FINDINGS_PER_UNIT: usize = 10_000;
