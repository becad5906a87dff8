//! Artifact filename parsing
//!
//! Recovers the `(name, version)` identity of a distributable artifact from
//! its filename. Wheels have a structured, dash-delimited layout and get a
//! dedicated parser; every other recognized format goes through a generic
//! "strip the extension, split on dashes" heuristic that can be guided by
//! the expected project name.

use crate::error::ErrorKind;
use crate::name::normalize_name;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while parsing an artifact filename
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilenameError {
    /// The filename matches no recognized artifact naming convention
    #[error("Cannot parse package file '{0}'")]
    UnparseableFilename(String),
}

impl FilenameError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::UnparseableFilename
    }
}

/// Recognized artifact extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extension {
    TarGz,
    TarBz2,
    Tar,
    Zip,
    Tgz,
    Tbz,
    Egg,
    Exe,
    Wheel,
}

impl Extension {
    /// All extensions in the order they are tried: source formats first,
    /// then binary formats.
    pub const ALL: [Extension; 9] = [
        Extension::TarGz,
        Extension::TarBz2,
        Extension::Tar,
        Extension::Zip,
        Extension::Tgz,
        Extension::Tbz,
        Extension::Egg,
        Extension::Exe,
        Extension::Wheel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Extension::TarGz => ".tar.gz",
            Extension::TarBz2 => ".tar.bz2",
            Extension::Tar => ".tar",
            Extension::Zip => ".zip",
            Extension::Tgz => ".tgz",
            Extension::Tbz => ".tbz",
            Extension::Egg => ".egg",
            Extension::Exe => ".exe",
            Extension::Wheel => ".whl",
        }
    }

    /// Whether this is a pre-built (binary) distribution format
    pub fn is_binary(self) -> bool {
        matches!(self, Extension::Egg | Extension::Exe | Extension::Wheel)
    }

    /// Find the first recognized extension the filename ends with
    pub fn from_filename(filename: &str) -> Option<Extension> {
        Self::ALL
            .into_iter()
            .find(|ext| filename.ends_with(ext.as_str()))
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical identity of an artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactIdentity {
    /// Normalized project name
    pub name: String,
    /// Version string as it appears in the filename
    pub version: String,
}

impl ArtifactIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ArtifactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.version)
    }
}

/// Fields of a wheel filename
///
/// `{name}-{version}(-{build})?-{python}-{abi}-{platform}.whl`, where each
/// tag field may be a dot-separated compressed tag set (`py2.py3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelName {
    /// Project name as written in the filename (not normalized)
    pub name: String,
    /// Version with any escaped local-version separator restored
    pub version: String,
    /// Optional build tag
    pub build: Option<String>,
    pub python_tags: Vec<String>,
    pub abi_tags: Vec<String>,
    pub platform_tags: Vec<String>,
}

fn wheel_pattern() -> &'static Regex {
    static WHEEL: OnceLock<Regex> = OnceLock::new();
    WHEEL.get_or_init(|| {
        Regex::new(
            r"(?i)^(?P<nm>[^-]+)-(?P<vn>\d+[^-]*)(-(?P<bn>\d+[^-]*))?-(?P<py>\w+\d+(\.\w+\d+)*)-(?P<bi>\w+)-(?P<ar>\w+(\.\w+)*)\.whl$",
        )
        .expect("wheel filename pattern is valid")
    })
}

fn name_and_version_pattern() -> &'static Regex {
    static NAME_AND_VERSION: OnceLock<Regex> = OnceLock::new();
    NAME_AND_VERSION.get_or_init(|| {
        Regex::new(r"(?i)^([a-z0-9_]+([.-][a-z_][a-z0-9_]*)*)-([a-z0-9_.+-]+)")
            .expect("name/version pattern is valid")
    })
}

fn python_version_pattern() -> &'static Regex {
    static PYTHON_VERSION: OnceLock<Regex> = OnceLock::new();
    PYTHON_VERSION.get_or_init(|| {
        Regex::new(r"-py(\d\.?\d?)").expect("python version pattern is valid")
    })
}

fn split_tags(field: &str) -> Vec<String> {
    field.split('.').map(String::from).collect()
}

impl WheelName {
    /// Parse a wheel filename
    pub fn parse(filename: &str) -> Result<Self, FilenameError> {
        let caps = wheel_pattern()
            .captures(filename)
            .ok_or_else(|| FilenameError::UnparseableFilename(filename.to_string()))?;

        Ok(Self {
            name: caps["nm"].to_string(),
            version: caps["vn"].replace('_', "-"),
            build: caps.name("bn").map(|m| m.as_str().to_string()),
            python_tags: split_tags(&caps["py"]),
            abi_tags: split_tags(&caps["bi"]),
            platform_tags: split_tags(&caps["ar"]),
        })
    }

    /// Expand the compressed tag sets into every `(python, abi, platform)` triple
    pub fn tags(&self) -> impl Iterator<Item = (&str, &str, &str)> + '_ {
        self.python_tags.iter().flat_map(move |py| {
            self.abi_tags.iter().flat_map(move |abi| {
                self.platform_tags
                    .iter()
                    .map(move |plat| (py.as_str(), abi.as_str(), plat.as_str()))
            })
        })
    }
}

/// Result of splitting an extension-less filename into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFilename {
    pub name: String,
    pub version: String,
    /// Python version suffix (`-py2.7`), if one was present
    pub python_version: Option<String>,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split an extension-less artifact filename into name and version
///
/// Percent-escapes are decoded and spaces become dashes before splitting.
///
/// When `project_name` is given and the stem starts with it (ending on a
/// word boundary), everything after the separating character is the version.
/// Otherwise the stem is split at the first dash that is followed by
/// something that cannot continue a project name.
pub fn split_filename(stem: &str, project_name: Option<&str>) -> Option<SplitFilename> {
    let mut stem = percent_decode_str(stem).decode_utf8_lossy().replace(' ', "-");
    let suffix = python_version_pattern()
        .captures(&stem)
        .and_then(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str().to_string())));
    let python_version = suffix.map(|(start, version)| {
        stem.truncate(start);
        version
    });

    if let Some(project) = project_name.filter(|p| !p.is_empty()) {
        if stem.len() > project.len() + 1 && stem.starts_with(project) {
            let before = project.chars().last();
            let after = stem[project.len()..].chars().next();
            let at_boundary = match (before, after) {
                (Some(b), Some(a)) => is_word_char(b) != is_word_char(a),
                _ => false,
            };
            if at_boundary {
                let separator_len = after.map_or(0, char::len_utf8);
                return Some(SplitFilename {
                    name: stem[..project.len()].to_string(),
                    version: stem[project.len() + separator_len..].to_string(),
                    python_version,
                });
            }
        }
    }

    let caps = name_and_version_pattern().captures(&stem)?;
    Some(SplitFilename {
        name: caps[1].to_string(),
        version: caps[3].to_string(),
        python_version,
    })
}

/// Parse a name and version out of an artifact filename
///
/// The extension decides the strategy: wheels are parsed structurally,
/// everything else through [`split_filename`]. When `hint` is given it is
/// used to disambiguate the split and becomes the returned name. The name
/// is always normalized.
///
/// # Example
/// ```
/// # use quarry_index::parse_filename;
/// let id = parse_filename("Django-2.0.1-py3-none-any.whl", None).unwrap();
/// assert_eq!((id.name.as_str(), id.version.as_str()), ("django", "2.0.1"));
/// ```
pub fn parse_filename(filename: &str, hint: Option<&str>) -> Result<ArtifactIdentity, FilenameError> {
    let unparseable = || {
        debug!(filename, "cannot parse package file");
        FilenameError::UnparseableFilename(filename.to_string())
    };

    let ext = Extension::from_filename(filename).ok_or_else(unparseable)?;

    if ext == Extension::Wheel {
        let wheel = WheelName::parse(filename).map_err(|_| unparseable())?;
        return Ok(ArtifactIdentity::new(normalize_name(&wheel.name), wheel.version));
    }

    let stem = &filename[..filename.len() - ext.as_str().len()];
    let split = split_filename(stem, hint).ok_or_else(unparseable)?;
    let name = hint.unwrap_or(&split.name);

    Ok(ArtifactIdentity::new(normalize_name(name), split.version))
}
