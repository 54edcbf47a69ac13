//! Bazel labels.
//!
//! Labels are parsed into `repository//package:name`. The short form
//! `//foo/bar` is accepted and means `//foo/bar:bar`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error parsing a Bazel label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid Bazel label `{0}`")]
pub struct LabelParseError(pub String);

/// A Bazel build-graph coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BazelLabel {
    repository: String,
    package: String,
    name: String,
}

impl BazelLabel {
    const ROOT_SEPARATOR: &'static str = "//";

    pub fn new(
        repository: impl Into<String>,
        package: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        BazelLabel {
            repository: repository.into(),
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for BazelLabel {
    type Err = LabelParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || LabelParseError(value.to_string());

        let (repository, rest) = value.split_once(Self::ROOT_SEPARATOR).ok_or_else(invalid)?;
        if rest.contains(Self::ROOT_SEPARATOR) {
            return Err(invalid());
        }

        let mut parts = rest.split(':');
        let package = parts.next().unwrap_or_default();
        let explicit_name = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        let name = match explicit_name {
            Some(name) if !name.is_empty() => name,
            Some(_) => return Err(invalid()),
            None => {
                if package.is_empty() {
                    return Err(invalid());
                }
                package.rsplit('/').next().ok_or_else(invalid)?
            }
        };

        Ok(BazelLabel::new(repository, package, name))
    }
}

impl fmt::Display for BazelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}//{}:{}", self.repository, self.package, self.name)
    }
}

impl Serialize for BazelLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BazelLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
