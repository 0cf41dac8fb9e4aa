//! Custom Test Assertions
//!
//! Assertion helpers for ingestion outcomes and validation reports that
//! print the whole report when they fail.

use domain_ingest::{CommitSummary, IngestOutcome, ValidationReport, Violation, ViolationKind};
use domain_travel::{LinkageResolution, LinkageViolation};

/// Asserts that a batch was committed and returns its summary
///
/// # Panics
///
/// Panics with the rejection report if the batch was rejected
pub fn assert_committed(outcome: &IngestOutcome) -> &CommitSummary {
    match outcome {
        IngestOutcome::Committed { summary, .. } => summary,
        IngestOutcome::Rejected { report } => {
            panic!("Expected batch to commit, got rejection {}:\n{:#?}", report, report.violations)
        }
    }
}

/// Asserts that a batch was rejected with a fatal violation of `kind`
/// whose message contains `text`, and returns that violation
///
/// # Panics
///
/// Panics if the batch committed or no such violation was reported
pub fn assert_rejected_with<'a>(
    outcome: &'a IngestOutcome,
    kind: ViolationKind,
    text: &str,
) -> &'a Violation {
    let report = match outcome {
        IngestOutcome::Rejected { report } => report,
        IngestOutcome::Committed { batch, summary, .. } => panic!(
            "Expected batch {} to be rejected, but {} rows were committed",
            batch,
            summary.rows.total()
        ),
    };
    report
        .fatal()
        .find(|v| v.kind == kind && v.message.contains(text))
        .unwrap_or_else(|| {
            panic!(
                "Expected a fatal {} violation mentioning {:?}, got:\n{:#?}",
                kind.label(),
                text,
                report.violations
            )
        })
}

/// Asserts that a report has no findings at all
///
/// # Panics
///
/// Panics with every finding if the report is not clean
pub fn assert_clean(report: &ValidationReport) {
    assert!(
        report.is_clean(),
        "Expected a clean report, got {}:\n{:#?}",
        report,
        report.violations
    );
}

/// Asserts that a report holds a violation of `kind` on `field`
///
/// # Panics
///
/// Panics if no violation matches
pub fn assert_has_violation<'a>(
    report: &'a ValidationReport,
    kind: ViolationKind,
    field: &str,
) -> &'a Violation {
    report
        .of_kind(kind)
        .find(|v| v.field.as_deref() == Some(field))
        .unwrap_or_else(|| {
            panic!(
                "Expected a {} violation on {}, got:\n{:#?}",
                kind.label(),
                field,
                report.violations
            )
        })
}

/// Asserts that a report has advisory findings but nothing fatal
///
/// # Panics
///
/// Panics if a fatal violation is present or there are no advisories
pub fn assert_advisory_only(report: &ValidationReport) {
    assert!(
        !report.has_fatal(),
        "Expected advisory findings only, got fatal:\n{:#?}",
        report.fatal().collect::<Vec<_>>()
    );
    assert!(
        report.advisories().next().is_some(),
        "Expected at least one advisory finding"
    );
}

/// Asserts that linkage resolution found exactly the given number of overlaps
///
/// # Panics
///
/// Panics if the count differs
pub fn assert_overlaps(resolution: &LinkageResolution, expected: usize) {
    let overlaps = resolution
        .violations
        .iter()
        .filter(|v| matches!(v, LinkageViolation::Overlap { .. }))
        .count();
    assert_eq!(
        overlaps, expected,
        "Expected {} overlap violations, got {}:\n{:#?}",
        expected, overlaps, resolution.violations
    );
}
