//! # Test Suites
//!
//! A suite is an ordered list of sections, each an ordered list of
//! [`TestCase`]s. Adding coverage means adding data here or in a suite file;
//! the classifier and report never change.

mod builtin;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::testing::TestCase;

pub use builtin::builtin_suite;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub cases: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub name: String,
    /// Suite-scoped credential variables, layered over the built-in ones.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    pub sections: Vec<Section>,
}

impl Suite {
    pub fn case_count(&self) -> usize {
        self.sections.iter().map(|section| section.cases.len()).sum()
    }

    pub fn cases(&self) -> impl Iterator<Item = (&Section, &TestCase)> {
        self.sections
            .iter()
            .flat_map(|section| section.cases.iter().map(move |case| (section, case)))
    }

    /// Reject data the runner could not turn into a verdict.
    pub fn validate(&self) -> Result<()> {
        for (section, case) in self.cases() {
            if case.name.trim().is_empty() {
                return Err(HarnessError::InvalidSuite(format!(
                    "case with empty name in section `{}`",
                    section.title
                )));
            }
            if case.endpoint.trim_matches('/').trim().is_empty() {
                return Err(HarnessError::InvalidSuite(format!(
                    "case `{}` has an empty endpoint",
                    case.name
                )));
            }
        }
        Ok(())
    }

    /// Keep only cases whose name contains `needle`, ignoring case.
    /// Sections left without cases are dropped.
    pub fn filtered(&self, needle: &str) -> Suite {
        let needle = needle.to_lowercase();
        let sections = self
            .sections
            .iter()
            .filter_map(|section| {
                let cases: Vec<TestCase> = section
                    .cases
                    .iter()
                    .filter(|case| case.name.to_lowercase().contains(&needle))
                    .cloned()
                    .collect();
                (!cases.is_empty()).then(|| Section {
                    title: section.title.clone(),
                    note: section.note.clone(),
                    cases,
                })
            })
            .collect();

        Suite {
            name: self.name.clone(),
            variables: self.variables.clone(),
            sections,
        }
    }
}

pub fn load_suite(path: &Path) -> Result<Suite> {
    let raw = fs::read_to_string(path).map_err(|source| HarnessError::SuiteRead {
        path: path.to_path_buf(),
        source,
    })?;
    let suite: Suite = serde_json::from_str(&raw).map_err(|source| HarnessError::SuiteParse {
        path: path.to_path_buf(),
        source,
    })?;
    suite.validate()?;
    Ok(suite)
}
