//! # Command Line
//!
//! Runs a suite against a backend for CI use. Flags can also come from
//! `AUTHPROBE_*` environment variables; nothing past this module reads the
//! process environment.
//!
//! Exit status is 0 only when at least one case was selected and every
//! selected case passed. A failing case, an unreachable backend and a harness
//! fault (bad suite file, bad `--var`, empty selection) all exit with 1.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use crate::collections::{Suite, builtin_suite, load_suite};
use crate::environment::{Variable, Variables};
use crate::error::{HarnessError, Result};
use crate::http::{DEFAULT_TIMEOUT, HttpProber};
use crate::testing::report::FinalizedReport;
use crate::testing::reporter::{ConsoleReporter, JsonReporter};
use crate::testing::runner::run_suite;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);

    pub fn from_report(report: &FinalizedReport) -> Self {
        if report.all_passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Output format for run reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Check that a backend enforces session authentication on its protected endpoints.
#[derive(Debug, Parser)]
#[command(name = "authprobe", version, about, long_about = None)]
pub struct Cli {
    /// Base URL that `<Service>/<method>` paths are appended to
    #[arg(long, env = "AUTHPROBE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "AUTHPROBE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs(),
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// JSON suite file to run instead of the built-in suite
    #[arg(long, env = "AUTHPROBE_SUITE")]
    pub suite: Option<PathBuf>,

    /// Override a credential variable, e.g. `--var validUser=user:alice`
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Only run cases whose name contains this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,

    /// Output format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// List the selected cases without probing
    #[arg(long)]
    pub list: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run configuration, resolved from the command line.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub suite_path: Option<PathBuf>,
    pub overrides: Vec<Variable>,
    pub filter: Option<String>,
    pub output_format: OutputFormat,
    pub report_path: Option<PathBuf>,
    pub color: bool,
    pub list_only: bool,
}

impl CliConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let overrides = cli
            .vars
            .iter()
            .map(|raw| Variable::parse_override(raw))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            base_url: cli.base_url,
            timeout: Duration::from_secs(cli.timeout_secs),
            suite_path: cli.suite,
            overrides,
            filter: cli.filter,
            output_format: cli.format,
            report_path: cli.report,
            color: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            list_only: cli.list,
        })
    }

    /// The suite to run after loading and filtering. A selection without
    /// cases is an error: it would otherwise report a vacuous pass.
    pub fn selected_suite(&self) -> Result<Suite> {
        let suite = match &self.suite_path {
            Some(path) => load_suite(path)?,
            None => builtin_suite(),
        };
        let suite = match &self.filter {
            Some(needle) => suite.filtered(needle),
            None => suite,
        };

        if suite.case_count() == 0 {
            let reason = match &self.filter {
                Some(needle) => format!("filter `{needle}` matches no case in `{}`", suite.name),
                None => format!("suite `{}` declares no cases", suite.name),
            };
            return Err(HarnessError::EmptySelection(reason));
        }
        Ok(suite)
    }
}

/// Parse arguments, run, and return the process exit code.
pub async fn run(cli: Cli) -> ExitCode {
    match execute(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "harness aborted before producing verdicts");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<ExitCode> {
    let config = CliConfig::from_cli(cli)?;
    let suite = config.selected_suite()?;

    if config.list_only {
        print_listing(&suite);
        return Ok(ExitCode::SUCCESS);
    }

    let variables = Variables::resolve(&suite.variables, &config.overrides);
    let prober = HttpProber::new(config.base_url.clone(), config.timeout)?;
    info!(base_url = %prober.base_url(), timeout = ?config.timeout, "probing backend");

    let report = match config.output_format {
        OutputFormat::Text => {
            let mut reporter = ConsoleReporter::new(io::stdout(), config.color);
            run_suite(&prober, &mut reporter, &suite, &variables, &config.base_url).await
        }
        OutputFormat::Json => {
            let mut reporter = JsonReporter::new(io::stdout());
            run_suite(&prober, &mut reporter, &suite, &variables, &config.base_url).await
        }
    };

    if let Some(path) = &config.report_path {
        report.write_json(path)?;
        info!(path = %path.display(), "report written");
    }

    Ok(ExitCode::from_report(&report))
}

fn print_listing(suite: &Suite) {
    println!("{} ({} cases)", suite.name, suite.case_count());
    for section in &suite.sections {
        println!();
        println!("{}", section.title);
        for case in &section.cases {
            println!("  {} -> {} [{}]", case.name, case.endpoint, case.expectation_label());
        }
    }
}
