/*!
 * Caption style validation.
 *
 * Checks finished caption files against the house style and reports every
 * violation with a severity and, where possible, a fix suggestion.
 *
 * # Architecture
 *
 * - `length`: line length, line count and line balance
 * - `timecodes`: minimum/maximum duration and reading speed
 * - `formatting`: double spaces and dual speaker dashes
 * - `service`: violation types and the orchestrating service
 * - `report`: cross-file summary with Markdown and JSON writers
 */

pub mod formatting;
pub mod length;
pub mod report;
pub mod service;
pub mod timecodes;

// Re-export main types
pub use report::{ReportWriter, RuleSummary, ValidationSummary};
pub use service::{FileReport, Rule, Severity, ValidationService, Violation};
