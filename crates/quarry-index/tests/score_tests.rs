//! Integration tests for URL scoring and candidate selection

use quarry_index::{score_url, Locator, LocatorConfig, UrlScore};

const HTTPS_WHEEL: &str = "https://files.example.org/packages/foo-1.0-py3-none-any.whl";
const HTTP_SDIST: &str = "http://files.example.org/packages/foo-1.0.tar.gz";

#[test]
fn test_secure_wheel_beats_insecure_sdist() {
    let mut urls = vec![HTTP_SDIST, HTTPS_WHEEL];
    urls.sort_by_key(|url| std::cmp::Reverse(score_url(url, true)));
    assert_eq!(urls, vec![HTTPS_WHEEL, HTTP_SDIST]);
}

#[test]
fn test_scheme_outranks_format() {
    let insecure_wheel = score_url("http://example.org/foo-1.0-py3-none-any.whl", true);
    let secure_sdist = score_url("https://example.org/foo-1.0.tar.gz", true);
    assert!(secure_sdist > insecure_wheel);
}

#[test]
fn test_format_outranks_host() {
    let trusted_sdist = score_url("https://pypi.python.org/packages/foo-1.0.tar.gz", true);
    let mirror_wheel = score_url("https://mirror.example.org/foo-1.0-py3-none-any.whl", true);
    assert!(mirror_wheel > trusted_sdist);
}

#[test]
fn test_trusted_host_breaks_format_tie() {
    let trusted = score_url("https://pypi.python.org/packages/foo-1.0.tar.gz", false);
    let mirror = score_url("https://mirror.example.org/foo-1.0.tar.gz", false);
    assert!(trusted > mirror);
}

#[test]
fn test_score_tuple_fields() {
    assert_eq!(
        score_url(HTTP_SDIST, true),
        UrlScore {
            secure: false,
            format_matches: false,
            trusted_host: false,
            filename: "foo-1.0.tar.gz".to_string(),
        }
    );
}

#[test]
fn test_egg_is_not_preferred_binary() {
    let score = score_url("https://example.org/foo-1.0-py2.7.egg", true);
    assert!(!score.format_matches);
}

#[test]
fn test_locator_best() {
    let locator = Locator::new(LocatorConfig::default());
    let best = locator.best([HTTP_SDIST, HTTPS_WHEEL]).unwrap();
    assert_eq!(best.url, HTTPS_WHEEL);
    assert_eq!(best.score, score_url(HTTPS_WHEEL, true));
}
