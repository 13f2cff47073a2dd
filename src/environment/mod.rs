//! # Credential Variables
//!
//! Suite payloads refer to credentials through `{{name}}` placeholders so the
//! same suite can run against any backend's demo identities.
//!
//! Scopes, lowest to highest precedence: built-in defaults, suite file,
//! command-line overrides.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{HarnessError, Result};

pub const VALID_USER: &str = "user:test123";
pub const INVALID_TOKEN: &str = "invalid_token";
pub const WRONG_USER: &str = "user:different456";

/// Demo session tokens have the form `session:<userId>`.
pub fn session_token_for(user_id: &str) -> String {
    format!("session:{user_id}")
}

/// Scope at which a variable is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VariableScope {
    Builtin,
    Suite,
    Override,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub key: String,
    pub value: String,
    pub scope: VariableScope,
}

impl Variable {
    pub fn new(key: impl Into<String>, value: impl Into<String>, scope: VariableScope) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            scope,
        }
    }

    /// Parse a `key=value` override.
    pub fn parse_override(raw: &str) -> Result<Self> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| HarnessError::InvalidVariable(raw.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(HarnessError::InvalidVariable(raw.to_string()));
        }
        Ok(Self::new(key, value.trim(), VariableScope::Override))
    }
}

pub fn builtin_variables() -> Vec<Variable> {
    vec![
        Variable::new("validUser", VALID_USER, VariableScope::Builtin),
        Variable::new("validToken", session_token_for(VALID_USER), VariableScope::Builtin),
        Variable::new("invalidToken", INVALID_TOKEN, VariableScope::Builtin),
        Variable::new("wrongUser", WRONG_USER, VariableScope::Builtin),
    ]
}

/// Resolved variables for one run.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    /// Merge all scopes; a higher scope overrides a lower one.
    pub fn resolve(suite: &BTreeMap<String, String>, overrides: &[Variable]) -> Self {
        let mut layered: Vec<Variable> = builtin_variables();
        layered.extend(
            suite
                .iter()
                .map(|(key, value)| Variable::new(key.clone(), value.clone(), VariableScope::Suite)),
        );
        layered.extend(overrides.iter().cloned());
        layered.sort_by_key(|variable| variable.scope);

        let mut values = BTreeMap::new();
        for variable in layered {
            values.insert(variable.key, variable.value);
        }

        // Changing the user without naming a token keeps the two consistent.
        let user_overridden = overrides.iter().any(|v| v.key == "validUser") || suite.contains_key("validUser");
        let token_overridden = overrides.iter().any(|v| v.key == "validToken") || suite.contains_key("validToken");
        if user_overridden && !token_overridden {
            if let Some(user) = values.get("validUser").cloned() {
                values.insert("validToken".into(), session_token_for(&user));
            }
        }

        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Replace `{{name}}` placeholders in one left-to-right pass; unknown
    /// names are left as written. Substituted values are never rescanned, so
    /// a value containing `{{...}}` is sent literally.
    pub fn interpolate(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(open) = rest.find("{{") {
            result.push_str(&rest[..open]);
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                rest = &rest[open..];
                break;
            };

            let key = &after_open[..close];
            if key.contains("{{") {
                // `{{a{{b}}`: the inner opener is the real one.
                result.push_str("{{");
                rest = after_open;
                continue;
            }
            match self.values.get(key) {
                Some(value) => result.push_str(value),
                None => result.push_str(&rest[open..open + close + 4]),
            }
            rest = &after_open[close + 2..];
        }

        result.push_str(rest);
        result
    }

    /// Interpolate every string inside a payload, recursing into arrays and objects.
    pub fn apply(&self, payload: &Map<String, Value>) -> Value {
        Value::Object(
            payload
                .iter()
                .map(|(key, value)| (key.clone(), self.apply_value(value)))
                .collect(),
        )
    }

    fn apply_value(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.interpolate(text)),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.apply_value(item)).collect()),
            Value::Object(map) => self.apply(map),
            other => other.clone(),
        }
    }
}
