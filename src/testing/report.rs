//! Run report.
//!
//! `Report` only accepts records; `finalize` consumes it and hands back a
//! read-only `FinalizedReport`, so a run can be summarized exactly once.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{HarnessError, Result};

use super::Verdict;

/// Verdict for one case, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseResult {
    pub section: String,
    pub name: String,
    pub endpoint: String,
    #[serde(flatten)]
    pub verdict: Verdict,
}

#[derive(Debug, Default)]
pub struct Report {
    results: Vec<CaseResult>,
    passed: usize,
    failed: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: CaseResult) -> &CaseResult {
        if result.verdict.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
        &self.results[self.results.len() - 1]
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn finalize(self, suite: impl Into<String>, base_url: impl Into<String>) -> FinalizedReport {
        FinalizedReport {
            suite: suite.into(),
            base_url: base_url.into(),
            passed: self.passed,
            failed: self.failed,
            total: self.passed + self.failed,
            success: self.failed == 0,
            results: self.results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedReport {
    pub suite: String,
    pub base_url: String,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    pub success: bool,
    pub results: Vec<CaseResult>,
}

impl FinalizedReport {
    /// The run's overall verdict. Exit status is derived from this alone.
    pub fn all_passed(&self) -> bool {
        self.success
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let raw = self.to_json()?;
        fs::write(path, raw).map_err(|source| HarnessError::ReportWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, passed: bool) -> CaseResult {
        CaseResult {
            section: "section".into(),
            name: name.into(),
            endpoint: "Service/method".into(),
            verdict: if passed {
                Verdict::pass("ok")
            } else {
                Verdict::fail("nope")
            },
        }
    }

    #[test]
    fn counters_track_verdicts() {
        let mut report = Report::new();
        report.record(result("a", true));
        report.record(result("b", false));
        report.record(result("c", true));

        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);

        let finalized = report.finalize("suite", "http://localhost:8000/api");
        assert_eq!(finalized.total, 3);
        assert!(!finalized.all_passed());
        let names: Vec<_> = finalized.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn empty_report_is_a_success() {
        let finalized = Report::new().finalize("suite", "base");
        assert_eq!(finalized.total, 0);
        assert!(finalized.all_passed());
    }

    #[test]
    fn json_document_flattens_verdicts() {
        let mut report = Report::new();
        report.record(result("a", false));
        let finalized = report.finalize("suite", "base");

        let value: serde_json::Value =
            serde_json::from_str(&finalized.to_json().expect("serialize")).expect("parse");
        assert_eq!(value["success"], false);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["results"][0]["passed"], false);
        assert_eq!(value["results"][0]["explanation"], "nope");
        assert_eq!(value["results"][0]["endpoint"], "Service/method");
    }

    #[test]
    fn write_json_creates_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        let mut report = Report::new();
        report.record(result("a", true));

        report.finalize("suite", "base").write_json(&path).expect("write");

        let raw = std::fs::read_to_string(&path).expect("read back");
        assert!(raw.contains("\"success\": true"));
    }

    #[test]
    fn write_json_reports_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("report.json");

        let err = Report::new().finalize("suite", "base").write_json(&path).unwrap_err();
        assert!(matches!(err, HarnessError::ReportWrite { .. }));
    }
}
