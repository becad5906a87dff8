//! Integration tests for artifact filename parsing

use proptest::prelude::*;
use quarry_index::{normalize_name, parse_filename, ArtifactIdentity, ErrorKind, FilenameError};

fn parsed(filename: &str, hint: Option<&str>) -> (String, String) {
    let id = parse_filename(filename, hint).unwrap();
    (id.name, id.version)
}

#[test]
fn test_wheel() {
    assert_eq!(
        parsed("Django-2.0.1-py3-none-any.whl", None),
        ("django".to_string(), "2.0.1".to_string())
    );
}

#[test]
fn test_wheel_name_is_normalized() {
    assert_eq!(
        parsed("zope.interface-4.5.0-cp36-cp36m-manylinux1_x86_64.whl", None),
        ("zope-interface".to_string(), "4.5.0".to_string())
    );
    assert_eq!(
        parsed("My_Package-1.0-py2.py3-none-any.whl", None),
        ("my-package".to_string(), "1.0".to_string())
    );
}

#[test]
fn test_wheel_with_build_tag() {
    assert_eq!(
        parsed("foo-1.0-1-py3-none-any.whl", None),
        ("foo".to_string(), "1.0".to_string())
    );
}

#[test]
fn test_malformed_wheel() {
    let err = parse_filename("foo.whl", None).unwrap_err();
    assert_eq!(err, FilenameError::UnparseableFilename("foo.whl".to_string()));
}

#[test]
fn test_source_archives() {
    assert_eq!(
        parsed("requests-2.18.4.tar.gz", None),
        ("requests".to_string(), "2.18.4".to_string())
    );
    assert_eq!(
        parsed("pytest-cov-2.5.1.tar.bz2", None),
        ("pytest-cov".to_string(), "2.5.1".to_string())
    );
    assert_eq!(
        parsed("Foo_Bar-0.3.zip", None),
        ("foo-bar".to_string(), "0.3".to_string())
    );
    assert_eq!(
        parsed("foo-1.0.tgz", None),
        ("foo".to_string(), "1.0".to_string())
    );
}

#[test]
fn test_egg_strips_python_version() {
    assert_eq!(
        parsed("foo-1.0-py2.7.egg", None),
        ("foo".to_string(), "1.0".to_string())
    );
}

#[test]
fn test_hint_disambiguates() {
    // Without a hint the dash before "2" ends the name
    assert_eq!(
        parsed("foo-2-bar-3.0.tar.gz", None),
        ("foo".to_string(), "2-bar-3.0".to_string())
    );
    assert_eq!(
        parsed("foo-2-bar-3.0.tar.gz", Some("foo-2-bar")),
        ("foo-2-bar".to_string(), "3.0".to_string())
    );
}

#[test]
fn test_hint_is_normalized() {
    assert_eq!(
        parsed("Foo_Bar-1.0.tar.gz", Some("Foo_Bar")),
        ("foo-bar".to_string(), "1.0".to_string())
    );
}

#[test]
fn test_hint_not_a_prefix() {
    // The split falls back to the generic pattern, but the hint is still the name
    assert_eq!(
        parsed("foo-1.0.tar.gz", Some("bar")),
        ("bar".to_string(), "1.0".to_string())
    );
}

#[test]
fn test_percent_escaped_source_archive() {
    assert_eq!(
        parsed("foo%20bar-1.0.tar.gz", None),
        ("foo-bar".to_string(), "1.0".to_string())
    );
    assert_eq!(
        parsed("Foo%5FBar-2.1.zip", None),
        ("foo-bar".to_string(), "2.1".to_string())
    );
}

#[test]
fn test_unrecognized_extension() {
    let err = parse_filename("not-a-real-file.txt", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnparseableFilename);
    assert_eq!(err.to_string(), "Cannot parse package file 'not-a-real-file.txt'");
}

#[test]
fn test_missing_version() {
    assert!(parse_filename("foo.tar.gz", None).is_err());
}

#[test]
fn test_identity_display() {
    let id = ArtifactIdentity::new("foo", "1.0");
    assert_eq!(id.to_string(), "foo==1.0");
}

proptest! {
    #[test]
    fn prop_wheel_fields_round_trip(
        name in "[A-Za-z][A-Za-z0-9_.]{0,15}",
        version in "[0-9]{1,3}(\\.[0-9]{1,3}){0,3}",
        python in "(py|cp)[23][0-9]?",
        abi in "(none|abi3|cp3[0-9]m?)",
        platform in "(any|manylinux1_x86_64|win_amd64|macosx_10_9_x86_64)",
    ) {
        let filename = format!("{}-{}-{}-{}-{}.whl", name, version, python, abi, platform);
        let id = parse_filename(&filename, None).unwrap();
        prop_assert_eq!(id.name, normalize_name(&name));
        prop_assert_eq!(id.version, version);
    }
}
