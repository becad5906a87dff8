//! Quarry index core
//!
//! Support utilities for a package-index mirror, including:
//! - Package name normalization
//! - Artifact filename parsing (wheels, source archives, eggs)
//! - Free-text query matching
//! - Download URL scoring and candidate selection
//! - A time-bounded cache with lazy population
//! - Prefix-addressed settings
//!
//! Nothing here performs I/O; the surrounding server owns networking,
//! storage and request handling.

pub mod cache;
pub mod error;
pub mod filename;
pub mod locator;
pub mod matcher;
pub mod name;
pub mod score;
pub mod settings;

pub use cache::{CacheError, Clock, ManualClock, SharedTimedCache, SystemClock, TimedCache};
pub use error::ErrorKind;
pub use filename::{
    parse_filename, split_filename, ArtifactIdentity, Extension, FilenameError, SplitFilename,
    WheelName,
};
pub use locator::{Candidate, Compatibility, CompatibilityCheck, Locator, LocatorConfig, TagSet};
pub use matcher::{MatchMode, Matcher, MatcherError};
pub use name::normalize_name;
pub use score::{score_url, score_url_with_host, UrlScore, DEFAULT_TRUSTED_HOST};
pub use settings::{as_bool, MirrorSettings, Settings, SettingsError};
