//! Error classification shared by every module
//!
//! Each module reports failures through its own error enum; `ErrorKind`
//! is the coarse category a caller maps to a response (404 vs 400 vs 500).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Bad constructor or factory arguments
    InvalidConfiguration,
    /// Cache miss with nothing to fall back on, or deleting an absent key
    NotFound,
    /// Filename does not follow any recognized artifact naming convention
    UnparseableFilename,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidConfiguration => "invalid configuration",
            ErrorKind::NotFound => "not found",
            ErrorKind::UnparseableFilename => "unparseable filename",
        };
        f.write_str(s)
    }
}
