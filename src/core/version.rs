//! Minimum OS versions.
//!
//! Apple deployment targets are written as `major[.minor[.patch]]`. They are
//! padded out to a full `semver::Version` so they sort numerically.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error parsing a minimum OS version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid OS version `{0}`")]
pub struct VersionParseError(pub String);

/// An OS version such as `11.0` or `13.2.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OsVersion(Version);

impl OsVersion {
    const MAX_PARTS: usize = 3;

    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        OsVersion(Version::new(major, minor, patch))
    }

    /// Fully qualified form, e.g. `11.0.0`.
    pub fn full(&self) -> String {
        self.0.to_string()
    }

    /// Short form that drops a zero patch component, e.g. `11.0`.
    pub fn pretty(&self) -> String {
        if self.0.patch == 0 {
            format!("{}.{}", self.0.major, self.0.minor)
        } else {
            self.full()
        }
    }
}

impl FromStr for OsVersion {
    type Err = VersionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split('.').collect();
        if parts.len() > Self::MAX_PARTS {
            return Err(VersionParseError(value.to_string()));
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| VersionParseError(value.to_string()))?;
        }

        Ok(OsVersion::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

impl Serialize for OsVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.full())
    }
}

impl<'de> Deserialize<'de> for OsVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
