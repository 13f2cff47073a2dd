//! Sequential execution of a suite.
//!
//! Cases run one at a time in declared order. Every case runs even when an
//! earlier one failed; backend session state is shared, so nothing is probed
//! concurrently.

use tracing::{debug, info};

use crate::collections::Suite;
use crate::environment::Variables;
use crate::http::Prober;

use super::classify;
use super::report::{CaseResult, FinalizedReport, Report};
use super::reporter::Reporter;

pub async fn run_suite<P, R>(
    prober: &P,
    reporter: &mut R,
    suite: &Suite,
    variables: &Variables,
    base_url: &str,
) -> FinalizedReport
where
    P: Prober,
    R: Reporter,
{
    info!(suite = %suite.name, base_url, cases = suite.case_count(), "starting run");
    reporter.on_start(&suite.name, base_url);

    let mut report = Report::new();
    for section in &suite.sections {
        reporter.on_section(&section.title, section.note.as_deref());

        for case in &section.cases {
            let payload = variables.apply(&case.payload);
            debug!(case = %case.name, endpoint = %case.endpoint, "probing");
            let outcome = prober.probe(&case.endpoint, &payload).await;
            let verdict = classify(case, &outcome);

            let recorded = report.record(CaseResult {
                section: section.title.clone(),
                name: case.name.clone(),
                endpoint: case.endpoint.clone(),
                verdict,
            });
            reporter.on_result(recorded);
        }
    }

    let finalized = report.finalize(&suite.name, base_url);
    info!(
        passed = finalized.passed,
        failed = finalized.failed,
        total = finalized.total,
        "run finished"
    );
    reporter.on_summary(&finalized);
    finalized
}
