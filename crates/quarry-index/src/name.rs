//! Package name normalization
//!
//! Two spellings of the same project name (`My_Package.Name`,
//! `my-package-name`) must resolve to the same lookup key.

use regex::Regex;
use std::sync::OnceLock;

fn separator_run() -> &'static Regex {
    static SEPARATOR_RUN: OnceLock<Regex> = OnceLock::new();
    SEPARATOR_RUN.get_or_init(|| Regex::new(r"[-_.]+").expect("separator pattern is valid"))
}

/// Normalize a package name into its canonical form
///
/// Every run of `-`, `_` and `.` collapses into a single `-` and the
/// result is lower-cased. Normalizing an already normalized name is a no-op.
///
/// # Example
/// ```
/// # use quarry_index::normalize_name;
/// assert_eq!(normalize_name("My_Package.Name"), "my-package-name");
/// ```
pub fn normalize_name(name: &str) -> String {
    separator_run().replace_all(name, "-").to_lowercase()
}
