// Aggregation of batch outcomes into a final report.

use std::fmt;

use crate::types::{BatchReport, Outcome};

/// Tally outcomes in one pass.
pub fn summarize(outcomes: &[Outcome]) -> BatchReport {
    outcomes.iter().fold(
        BatchReport {
            total: outcomes.len(),
            ..BatchReport::default()
        },
        |mut report, outcome| {
            if outcome.is_success() {
                report.success_count += 1;
            } else {
                report.error_count += 1;
            }
            report
        },
    )
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Summary ===")?;
        writeln!(f, "Added successfully: {}", self.success_count)?;
        writeln!(f, "Errors: {}", self.error_count)?;
        write!(f, "Total: {}", self.total)
    }
}
