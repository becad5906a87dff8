//! Free-text query matching
//!
//! A [`Matcher`] is plain data (`queries` + `mode`), so it can be logged,
//! serialized or compared; [`Matcher::matches`] evaluates it.

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while building a matcher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatcherError {
    /// The combination mode is neither `and` nor `or`
    #[error("Unknown query mode: {0}")]
    InvalidConfiguration(String),
}

impl MatcherError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidConfiguration
    }
}

/// How multiple query terms combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every term must be present
    And,
    /// At least one term must be present
    Or,
}

impl FromStr for MatchMode {
    type Err = MatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "and" => Ok(MatchMode::And),
            "or" => Ok(MatchMode::Or),
            other => Err(MatcherError::InvalidConfiguration(other.to_string())),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::And => f.write_str("and"),
            MatchMode::Or => f.write_str("or"),
        }
    }
}

/// Case-insensitive substring matcher over a set of query terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    /// Lower-cased query terms
    queries: Vec<String>,
    mode: MatchMode,
}

impl Matcher {
    pub fn new<I, S>(queries: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            queries: queries
                .into_iter()
                .map(|q| q.as_ref().to_lowercase())
                .collect(),
            mode,
        }
    }

    /// Build a matcher from a textual mode (`"and"` or `"or"`)
    ///
    /// # Example
    /// ```
    /// # use quarry_index::Matcher;
    /// let m = Matcher::build(["foo", "bar"], "and").unwrap();
    /// assert!(m.matches("a foo bar z"));
    /// assert!(!m.matches("a foo z"));
    /// ```
    pub fn build<I, S>(queries: I, mode: &str) -> Result<Self, MatcherError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::new(queries, mode.parse()?))
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Test a candidate string against the query terms
    ///
    /// With no terms, `And` matches everything and `Or` matches nothing.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        let mut terms = self.queries.iter();
        match self.mode {
            MatchMode::And => terms.all(|q| candidate.contains(q.as_str())),
            MatchMode::Or => terms.any(|q| candidate.contains(q.as_str())),
        }
    }
}
