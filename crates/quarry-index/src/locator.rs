//! Candidate selection
//!
//! Given every download URL a remote index lists for one package, pick the
//! one to serve. Wheel compatibility is decided by an explicit strategy
//! rather than by the host platform, so a mirror can list wheels for every
//! platform it proxies.

use crate::filename::{Extension, WheelName};
use crate::score::{score_url_with_host, UrlScore, DEFAULT_TRUSTED_HOST};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Decides whether a wheel may be offered
pub trait CompatibilityCheck {
    fn is_compatible(&self, wheel: &WheelName) -> bool;
}

/// A `(python, abi, platform)` tag triple
pub type Tag = (String, String, String);

/// Set of supported wheel tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    tags: HashSet<Tag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, python: &str, abi: &str, platform: &str) {
        self.tags
            .insert((python.to_string(), abi.to_string(), platform.to_string()));
    }

    pub fn with(mut self, python: &str, abi: &str, platform: &str) -> Self {
        self.insert(python, abi, platform);
        self
    }

    pub fn contains(&self, python: &str, abi: &str, platform: &str) -> bool {
        self.tags
            .contains(&(python.to_string(), abi.to_string(), platform.to_string()))
    }
}

impl CompatibilityCheck for TagSet {
    fn is_compatible(&self, wheel: &WheelName) -> bool {
        wheel.tags().any(|(py, abi, plat)| self.contains(py, abi, plat))
    }
}

/// Built-in compatibility strategies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compatibility {
    /// Every wheel is offered, whatever platform it targets
    #[default]
    AcceptAll,
    /// Only wheels with at least one supported tag triple
    Tags(TagSet),
}

impl CompatibilityCheck for Compatibility {
    fn is_compatible(&self, wheel: &WheelName) -> bool {
        match self {
            Compatibility::AcceptAll => true,
            Compatibility::Tags(tags) => tags.is_compatible(wheel),
        }
    }
}

/// Candidate selection preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Prefer wheels over source archives
    pub prefer_binary: bool,
    /// Host whose URLs win ties on scheme and format
    pub trusted_host: String,
    pub compatibility: Compatibility,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            prefer_binary: true,
            trusted_host: DEFAULT_TRUSTED_HOST.to_string(),
            compatibility: Compatibility::AcceptAll,
        }
    }
}

/// A scored download URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub score: UrlScore,
}

/// Ranks candidate URLs for a single package
#[derive(Debug, Clone)]
pub struct Locator<S = Compatibility> {
    prefer_binary: bool,
    trusted_host: String,
    compatibility: S,
}

impl Locator<Compatibility> {
    pub fn new(config: LocatorConfig) -> Self {
        Self {
            prefer_binary: config.prefer_binary,
            trusted_host: config.trusted_host,
            compatibility: config.compatibility,
        }
    }
}

impl<S: CompatibilityCheck> Locator<S> {
    /// Use a custom compatibility strategy
    pub fn with_strategy(prefer_binary: bool, trusted_host: impl Into<String>, strategy: S) -> Self {
        Self {
            prefer_binary,
            trusted_host: trusted_host.into(),
            compatibility: strategy,
        }
    }

    /// Whether a URL survives the compatibility filter
    ///
    /// Anything that is not a parseable wheel passes.
    fn admits(&self, score: &UrlScore) -> bool {
        if Extension::from_filename(&score.filename) != Some(Extension::Wheel) {
            return true;
        }
        match WheelName::parse(&score.filename) {
            Ok(wheel) => self.compatibility.is_compatible(&wheel),
            Err(_) => true,
        }
    }

    /// Score, filter and sort candidates, best first
    pub fn rank<I, U>(&self, urls: I) -> Vec<Candidate>
    where
        I: IntoIterator<Item = U>,
        U: AsRef<str>,
    {
        let mut candidates: Vec<Candidate> = urls
            .into_iter()
            .map(|url| {
                let url = url.as_ref();
                Candidate {
                    url: url.to_string(),
                    score: score_url_with_host(url, self.prefer_binary, &self.trusted_host),
                }
            })
            .filter(|candidate| self.admits(&candidate.score))
            .collect();
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }

    /// The preferred candidate, if any survives filtering
    pub fn best<I, U>(&self, urls: I) -> Option<Candidate>
    where
        I: IntoIterator<Item = U>,
        U: AsRef<str>,
    {
        let best = self.rank(urls).into_iter().next();
        if let Some(candidate) = &best {
            debug!(url = %candidate.url, "selected download candidate");
        }
        best
    }
}
