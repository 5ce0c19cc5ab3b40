use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors produced when a raw string cannot be resolved into a [`Locator`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("empty locator")]
    Empty,

    #[error("locator contains control characters: {0:?}")]
    Malformed(String),

    #[error("not an absolute path or URL: {0}")]
    Relative(String),

    #[error("invalid scheme in locator: {0}")]
    InvalidScheme(String),
}

/// Canonical address of a node's underlying resource.
///
/// Either an absolute path (`/proj/src/a.txt`) or a URL with a scheme
/// (`file:///proj/src/a.txt`, `sftp://host/home/a.txt`). URL segments are
/// percent-encoded and decoded for display; bare path segments are raw names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locator(String);

impl Locator {
    /// Resolve a raw string into a locator.
    pub fn parse(raw: &str) -> Result<Self, LocatorError> {
        if raw.is_empty() {
            return Err(LocatorError::Empty);
        }
        if raw.chars().any(char::is_control) {
            return Err(LocatorError::Malformed(raw.to_owned()));
        }
        if raw.starts_with('/') {
            return Ok(Self(raw.to_owned()));
        }

        let Some((scheme, rest)) = raw.split_once("://") else {
            return Err(LocatorError::Relative(raw.to_owned()));
        };

        let valid_scheme = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

        if !valid_scheme || rest.is_empty() || rest.contains(' ') {
            return Err(LocatorError::InvalidScheme(raw.to_owned()));
        }

        Ok(Self(raw.to_owned()))
    }

    /// Build a locator for an absolute filesystem path.
    pub fn from_path(path: &Path) -> Result<Self, LocatorError> {
        Self::parse(&path.to_string_lossy())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL scheme, or `None` for a bare absolute path.
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once("://").map(|(scheme, _)| scheme)
    }

    /// True for bare paths and `file:` URLs. Every other scheme is remote.
    pub fn is_local(&self) -> bool {
        self.scheme()
            .is_none_or(|scheme| scheme.eq_ignore_ascii_case("file"))
    }

    /// Scheme plus authority (`sftp://host`), empty for bare paths.
    pub fn origin(&self) -> &str {
        self.split().0
    }

    /// Path portion, always starting with `/` (or empty for `scheme://host`).
    pub fn path(&self) -> &str {
        self.split().1
    }

    /// Non-empty path segments, still encoded.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path().split('/').filter(|s| !s.is_empty())
    }

    /// Last path segment as stored (percent-encoded if the source was).
    pub fn last_segment(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Human-readable name. URL segments are percent-decoded; bare paths are
    /// not encoded, so their segments are returned verbatim.
    pub fn display_name(&self) -> String {
        match self.last_segment() {
            Some(segment) if self.scheme().is_some() => decode(segment),
            Some(segment) => segment.to_owned(),
            None if self.origin().is_empty() => "/".to_owned(),
            None => self.origin().to_owned(),
        }
    }

    /// The containing folder, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let segments: Vec<&str> = self.segments().collect();
        let (_, head) = segments.split_last()?;
        Some(self.with_segments(head))
    }

    /// Append one entry name to this locator.
    ///
    /// `name` is a plain (decoded) name. Under a URL it is percent-encoded,
    /// so the result always parses back to itself.
    pub fn join(&self, name: &str) -> Self {
        let name = name.trim_matches('/');
        let segment = match self.scheme() {
            Some(_) => urlencoding::encode(name),
            None => Cow::Borrowed(name),
        };
        let base = self.0.trim_end_matches('/');
        if base.ends_with(':') || base.is_empty() {
            // Root of a bare path or of a `file:///` URL.
            return Self(format!("{}/{segment}", self.origin()));
        }
        Self(format!("{base}/{segment}"))
    }

    /// Collapse `.`, `..`, duplicate and trailing slashes.
    pub fn canonical(&self) -> Self {
        let mut stack: Vec<&str> = Vec::new();
        for segment in self.path().split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    stack.pop();
                }
                other => stack.push(other),
            }
        }
        self.with_segments(&stack)
    }

    /// True when `other` lives strictly below `self` (same origin).
    pub fn is_ancestor_of(&self, other: &Locator) -> bool {
        let this = self.canonical();
        let other = other.canonical();
        if this.origin() != other.origin() {
            return false;
        }
        let ours: Vec<&str> = this.segments().collect();
        let theirs: Vec<&str> = other.segments().collect();
        theirs.len() > ours.len() && theirs.starts_with(&ours)
    }

    /// Path of `self` relative to the folder containing `base_file`.
    ///
    /// Returns `None` when the locators do not share an origin.
    pub fn relative_to(&self, base_file: &Locator) -> Option<String> {
        let target = self.canonical();
        let base = base_file.canonical();
        if !target.origin().eq_ignore_ascii_case(base.origin()) {
            return None;
        }

        let base_segments: Vec<&str> = base.segments().collect();
        let base_dir = base_segments.split_last().map_or(&[][..], |(_, dir)| dir);
        let target_segments: Vec<&str> = target.segments().collect();

        let common = base_dir
            .iter()
            .zip(&target_segments)
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = vec![".."; base_dir.len() - common];
        parts.extend(&target_segments[common..]);

        if parts.is_empty() {
            Some(".".to_owned())
        } else {
            Some(parts.join("/"))
        }
    }

    /// Filesystem path for local locators.
    pub fn to_path(&self) -> Option<PathBuf> {
        if !self.is_local() {
            return None;
        }
        match self.scheme() {
            Some(_) => Some(PathBuf::from(decode(self.path()))),
            None => Some(PathBuf::from(&self.0)),
        }
    }

    fn split(&self) -> (&str, &str) {
        let Some(scheme_end) = self.0.find("://") else {
            return ("", self.0.as_str());
        };
        let after = scheme_end + 3;
        match self.0[after..].find('/') {
            Some(slash) => self.0.split_at(after + slash),
            None => (self.0.as_str(), ""),
        }
    }

    fn with_segments(&self, segments: &[&str]) -> Self {
        Self(format!("{}/{}", self.origin(), segments.join("/")))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Locator {
    type Error = LocatorError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

fn decode(segment: &str) -> String {
    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes()))
            .into_owned(),
    }
}
