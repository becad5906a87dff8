//! Candidate download URL scoring
//!
//! Several mirrors and formats may offer the same artifact. Sorting
//! candidates by [`UrlScore`] in descending order puts the preferred one
//! first.

use crate::filename::Extension;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::Url;

/// Host of the canonical package index
pub const DEFAULT_TRUSTED_HOST: &str = "pypi.python.org";

/// Sort key for a candidate URL, most significant field first
///
/// The derived ordering compares fields in declaration order, which is the
/// preference order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UrlScore {
    /// URL uses `https`
    pub secure: bool,
    /// Artifact format (binary vs source) matches the caller's preference
    pub format_matches: bool,
    /// URL host is the trusted index host
    pub trusted_host: bool,
    /// Final path segment, used as a deterministic tie-break
    pub filename: String,
}

/// Split a URL into `(scheme, host, filename)`
///
/// The filename is percent-decoded, so `foo bar.zip` and `foo%20bar.zip`
/// tie-break identically. Strings the URL parser rejects still get a
/// best-effort split so every input has a score.
fn url_parts(url: &str) -> (String, String, String) {
    match Url::parse(url) {
        Ok(parsed) => {
            let segment = parsed.path().rsplit('/').next().unwrap_or_default();
            let filename = percent_decode_str(segment).decode_utf8_lossy().into_owned();
            let host = match (parsed.host_str(), parsed.port()) {
                (Some(host), Some(port)) => format!("{}:{}", host, port),
                (Some(host), None) => host.to_string(),
                (None, _) => String::new(),
            };
            (parsed.scheme().to_string(), host, filename)
        }
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or_default();
            let segment = path.rsplit('/').next().unwrap_or_default();
            let filename = percent_decode_str(segment).decode_utf8_lossy().into_owned();
            (String::new(), String::new(), filename)
        }
    }
}

/// Score a candidate URL against a specific trusted host
pub fn score_url_with_host(url: &str, prefer_binary: bool, trusted_host: &str) -> UrlScore {
    let (scheme, host, filename) = url_parts(url);
    let is_binary = Extension::from_filename(&filename) == Some(Extension::Wheel);

    UrlScore {
        secure: scheme == "https",
        format_matches: prefer_binary == is_binary,
        trusted_host: !trusted_host.is_empty() && host.contains(trusted_host),
        filename,
    }
}

/// Score a candidate URL
///
/// Only wheels count as the binary format here; eggs and installers are
/// treated like source archives.
///
/// # Example
/// ```
/// # use quarry_index::score_url;
/// let wheel = score_url("https://example.org/f/foo-1.0-py3-none-any.whl", true);
/// let sdist = score_url("http://example.org/f/foo-1.0.tar.gz", true);
/// assert!(wheel > sdist);
/// ```
pub fn score_url(url: &str, prefer_binary: bool) -> UrlScore {
    score_url_with_host(url, prefer_binary, DEFAULT_TRUSTED_HOST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields() {
        let score = score_url(
            "https://pypi.python.org/packages/foo-1.0-py3-none-any.whl#md5=abc",
            true,
        );
        assert!(score.secure);
        assert!(score.format_matches);
        assert!(score.trusted_host);
        assert_eq!(score.filename, "foo-1.0-py3-none-any.whl");
    }

    #[test]
    fn test_prefer_source() {
        let score = score_url("https://example.org/foo-1.0.tar.gz", false);
        assert!(score.format_matches);
        assert!(!score.trusted_host);
    }

    #[test]
    fn test_host_with_port() {
        let score = score_url_with_host("http://mirror.local:8080/foo-1.0.zip", false, "mirror.local:8080");
        assert!(score.trusted_host);
        assert!(!score.secure);
    }

    #[test]
    fn test_unparseable_url_still_scores() {
        let score = score_url("not a url/foo-1.0.whl?x=1", true);
        assert!(!score.secure);
        assert!(score.format_matches);
        assert_eq!(score.filename, "foo-1.0.whl");
    }

    #[test]
    fn test_filename_is_decoded() {
        let raw = score_url("https://x.org/a/foo bar-1.0.tar.gz", false);
        let escaped = score_url("https://x.org/a/foo%20bar-1.0.tar.gz", false);
        assert_eq!(raw.filename, "foo bar-1.0.tar.gz");
        assert_eq!(raw, escaped);
    }

    #[test]
    fn test_filename_breaks_ties() {
        let a = score_url("https://example.org/foo-1.0.tar.gz", false);
        let b = score_url("https://example.org/foo-1.1.tar.gz", false);
        assert!(b > a);
    }
}
