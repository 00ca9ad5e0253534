//! Dotted profile paths (`"work.backend"`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ProfileError;

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// A validated root-to-node address in the profile tree.
///
/// Always has at least one segment; no segment is empty or contains `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfilePath {
    segments: Vec<String>,
}

impl ProfilePath {
    /// Parse a dotted path.
    pub fn parse(path: &str) -> Result<Self, ProfileError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(ProfileError::InvalidPath {
                path: path.to_string(),
                reason: "path is empty",
            });
        }
        let segments: Vec<String> = path.split(SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ProfileError::InvalidPath {
                path: path.to_string(),
                reason: "path contains an empty segment",
            });
        }
        Ok(Self { segments })
    }

    /// Path consisting of a single top-level segment.
    pub fn root(name: &str) -> Result<Self, ProfileError> {
        validate_segment(name)?;
        Ok(Self {
            segments: vec![name.to_string()],
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always at least 1).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Final segment (the node's local name).
    pub fn name(&self) -> &str {
        // Construction guarantees at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Path of the parent node, or `None` for a top-level path.
    pub fn parent(&self) -> Option<ProfilePath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Path of a direct child of this path.
    pub fn child(&self, name: &str) -> Result<ProfilePath, ProfileError> {
        validate_segment(name)?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// Dotted form of the first `count` segments.
    pub fn prefix(&self, count: usize) -> String {
        let count = count.min(self.segments.len());
        self.segments[..count].join(".")
    }
}

fn validate_segment(name: &str) -> Result<(), ProfileError> {
    if name.is_empty() {
        return Err(ProfileError::InvalidPath {
            path: name.to_string(),
            reason: "profile name is empty",
        });
    }
    if name.contains(SEPARATOR) {
        return Err(ProfileError::InvalidPath {
            path: name.to_string(),
            reason: "profile name must not contain '.'",
        });
    }
    Ok(())
}

impl fmt::Display for ProfilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for ProfilePath {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ProfilePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProfilePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        let path = ProfilePath::parse("work.backend.rust").unwrap();
        assert_eq!(path.segments(), &["work", "backend", "rust"]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.name(), "rust");
        assert_eq!(path.to_string(), "work.backend.rust");
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for bad in ["", "  ", "a..b", ".a", "a."] {
            let err = ProfilePath::parse(bad).unwrap_err();
            assert!(
                matches!(err, ProfileError::InvalidPath { .. }),
                "expected InvalidPath for {bad:?}"
            );
        }
    }

    #[test]
    fn test_parent_and_prefix() {
        let path: ProfilePath = "a.b.c".parse().unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "a.b");
        assert_eq!(path.prefix(1), "a");
        assert_eq!(path.prefix(2), "a.b");
        assert_eq!(path.prefix(10), "a.b.c");
        assert!(ProfilePath::root("a").unwrap().parent().is_none());
    }

    #[test]
    fn test_child_rejects_dotted_name() {
        let path = ProfilePath::root("work").unwrap();
        assert_eq!(path.child("rust").unwrap().to_string(), "work.rust");
        assert!(path.child("x.y").is_err());
        assert!(path.child("").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let path: ProfilePath = "work.backend".parse().unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"work.backend\"");
        let back: ProfilePath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<ProfilePath>("\"a..b\"").is_err());
    }
}
