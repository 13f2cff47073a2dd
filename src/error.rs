//! Harness-level faults.
//!
//! These stop a run before any verdict is produced. Anything that goes wrong
//! while probing a single endpoint is a `ProbeOutcome`, not a `HarnessError`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read suite file `{path}`: {source}")]
    SuiteRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse suite file `{path}`: {source}")]
    SuiteParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid suite: {0}")]
    InvalidSuite(String),

    #[error("no cases selected: {0}")]
    EmptySelection(String),

    #[error("invalid variable override `{0}`, expected key=value")]
    InvalidVariable(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("failed to write report `{path}`: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HarnessError>;
