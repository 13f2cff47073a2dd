//! Rendering of a run. Reporters observe results; they never decide them.

use std::io::{self, Write};

use colored::{Color, Colorize};
use tracing::warn;

use super::report::{CaseResult, FinalizedReport};

const RULE_WIDTH: usize = 60;

pub trait Reporter {
    fn on_start(&mut self, _suite: &str, _base_url: &str) {}

    fn on_section(&mut self, _title: &str, _note: Option<&str>) {}

    fn on_result(&mut self, result: &CaseResult);

    fn on_summary(&mut self, report: &FinalizedReport);
}

/// Human-readable, line-per-case output.
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn write_start(&mut self, suite: &str, base_url: &str) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{}", suite.to_uppercase())?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "Testing API at: {base_url}")?;
        writeln!(self.out)
    }

    fn write_section(&mut self, title: &str, note: Option<&str>) -> io::Result<()> {
        let rule = self.paint(&"=".repeat(RULE_WIDTH), Color::Blue);
        let title = self.paint(title, Color::Blue);
        let note = note.map(|note| self.paint(&format!("Note: {note}"), Color::Yellow));
        writeln!(self.out)?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{title}")?;
        if let Some(note) = note {
            writeln!(self.out, "{note}")?;
        }
        writeln!(self.out, "{rule}")?;
        writeln!(self.out)
    }

    fn write_result(&mut self, result: &CaseResult) -> io::Result<()> {
        let mark = if result.verdict.passed {
            self.paint("✓", Color::Green)
        } else {
            self.paint("✗", Color::Red)
        };
        writeln!(self.out, "{mark} {}", result.name)?;
        if !result.verdict.explanation.is_empty() {
            writeln!(self.out, "  {}", result.verdict.explanation)?;
        }
        Ok(())
    }

    fn write_summary(&mut self, report: &FinalizedReport) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        let passed = self.paint(&format!("Passed: {}", report.passed), Color::Green);
        let failed = self.paint(&format!("Failed: {}", report.failed), Color::Red);
        let outcome = if report.all_passed() {
            self.paint("✅ All authentication tests passed!", Color::Green)
        } else {
            self.paint("❌ Some tests failed. Review the output above.", Color::Red)
        };
        writeln!(self.out)?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "TEST SUMMARY")?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{passed}")?;
        writeln!(self.out, "{failed}")?;
        writeln!(self.out, "Total: {}", report.total)?;
        writeln!(self.out)?;
        writeln!(self.out, "{outcome}")?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_start(&mut self, suite: &str, base_url: &str) {
        if let Err(err) = self.write_start(suite, base_url) {
            warn!(error = %err, "failed to write run header");
        }
    }

    fn on_section(&mut self, title: &str, note: Option<&str>) {
        if let Err(err) = self.write_section(title, note) {
            warn!(error = %err, "failed to write section banner");
        }
    }

    fn on_result(&mut self, result: &CaseResult) {
        if let Err(err) = self.write_result(result) {
            warn!(error = %err, case = %result.name, "failed to write result");
        }
    }

    fn on_summary(&mut self, report: &FinalizedReport) {
        if let Err(err) = self.write_summary(report) {
            warn!(error = %err, "failed to write summary");
        }
    }
}

/// Emits nothing while running, then the whole report as one JSON document.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn on_result(&mut self, _result: &CaseResult) {}

    fn on_summary(&mut self, report: &FinalizedReport) {
        let written = report
            .to_json()
            .map_err(|err| err.to_string())
            .and_then(|raw| writeln!(self.out, "{raw}").map_err(|err| err.to_string()));
        if let Err(err) = written {
            warn!(error = %err, "failed to write JSON report");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Verdict;
    use crate::testing::report::Report;

    fn case_result(name: &str, verdict: Verdict) -> CaseResult {
        CaseResult {
            section: "1. INCLUDED ROUTES".into(),
            name: name.into(),
            endpoint: "LibraryCache/getLiked".into(),
            verdict,
        }
    }

    fn render(reporter: ConsoleReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).expect("utf8 output")
    }

    #[test]
    fn result_lines_show_mark_name_and_detail() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        reporter.on_result(&case_result("LibraryCache/getLiked (no token)", Verdict::pass("Status: 200")));
        reporter.on_result(&case_result("SwipeSessions/start (no token)", Verdict::fail("Expected failure but got 200")));

        assert_eq!(
            render(reporter),
            "✓ LibraryCache/getLiked (no token)\n  Status: 200\n\
             ✗ SwipeSessions/start (no token)\n  Expected failure but got 200\n"
        );
    }

    #[test]
    fn empty_explanation_omits_detail_line() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        reporter.on_result(&case_result("quiet", Verdict::pass("")));
        assert_eq!(render(reporter), "✓ quiet\n");
    }

    #[test]
    fn section_banner_includes_note() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        reporter.on_section("5. VALID AUTH", Some("may fail for business logic reasons"));
        let output = render(reporter);
        assert!(output.contains("5. VALID AUTH\n"));
        assert!(output.contains("Note: may fail for business logic reasons\n"));
    }

    #[test]
    fn summary_prints_counts_and_outcome() {
        let mut report = Report::new();
        report.record(case_result("a", Verdict::pass("ok")));
        report.record(case_result("b", Verdict::fail("bad")));
        let finalized = report.finalize("suite", "base");

        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        reporter.on_summary(&finalized);
        let output = render(reporter);

        assert!(output.contains("TEST SUMMARY"));
        assert!(output.contains("Passed: 1\nFailed: 1\nTotal: 2\n"));
        assert!(output.contains("Some tests failed"));
    }

    #[test]
    fn json_reporter_writes_only_the_summary() {
        let mut report = Report::new();
        report.record(case_result("a", Verdict::pass("ok")));
        let finalized = report.finalize("suite", "base");

        let mut reporter = JsonReporter::new(Vec::new());
        reporter.on_start("suite", "base");
        reporter.on_result(&finalized.results[0]);
        reporter.on_summary(&finalized);

        let raw = String::from_utf8(reporter.into_inner()).expect("utf8 output");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("single JSON document");
        assert_eq!(value["total"], 1);
        assert_eq!(value["success"], true);
    }
}
