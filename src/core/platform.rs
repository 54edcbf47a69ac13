//! Apple platforms a target is configured for.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::version::OsVersion;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Os {
    #[serde(rename = "macos")]
    MacOs,
    #[serde(rename = "ios")]
    IOs,
    #[serde(rename = "tvos")]
    TvOs,
    #[serde(rename = "watchos")]
    WatchOs,
}

impl Os {
    /// User-facing name, as used in target name distinguishers.
    pub fn pretty_name(&self) -> &'static str {
        match self {
            Os::MacOs => "macOS",
            Os::IOs => "iOS",
            Os::TvOs => "tvOS",
            Os::WatchOs => "watchOS",
        }
    }

    /// Stable lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::MacOs => "macos",
            Os::IOs => "ios",
            Os::TvOs => "tvos",
            Os::WatchOs => "watchos",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pretty_name())
    }
}

/// Where a binary runs, derived from the SDK variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Environment {
    Simulator,
    Device,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Simulator => "Simulator",
            Environment::Device => "Device",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SDK platform name (`platform.name` in Xcode terms).
///
/// Declaration order is the sort order: macOS first, then each OS with its
/// simulator before its device SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlatformVariant {
    #[serde(rename = "macosx")]
    MacOs,
    #[serde(rename = "iphonesimulator")]
    IOsSimulator,
    #[serde(rename = "iphoneos")]
    IOsDevice,
    #[serde(rename = "appletvsimulator")]
    TvOsSimulator,
    #[serde(rename = "appletvos")]
    TvOsDevice,
    #[serde(rename = "watchsimulator")]
    WatchOsSimulator,
    #[serde(rename = "watchos")]
    WatchOsDevice,
}

impl PlatformVariant {
    pub fn name(&self) -> &'static str {
        match self {
            PlatformVariant::MacOs => "macosx",
            PlatformVariant::IOsSimulator => "iphonesimulator",
            PlatformVariant::IOsDevice => "iphoneos",
            PlatformVariant::TvOsSimulator => "appletvsimulator",
            PlatformVariant::TvOsDevice => "appletvos",
            PlatformVariant::WatchOsSimulator => "watchsimulator",
            PlatformVariant::WatchOsDevice => "watchos",
        }
    }

    pub fn os(&self) -> Os {
        match self {
            PlatformVariant::MacOs => Os::MacOs,
            PlatformVariant::IOsSimulator | PlatformVariant::IOsDevice => Os::IOs,
            PlatformVariant::TvOsSimulator | PlatformVariant::TvOsDevice => Os::TvOs,
            PlatformVariant::WatchOsSimulator | PlatformVariant::WatchOsDevice => Os::WatchOs,
        }
    }

    pub fn environment(&self) -> Environment {
        match self {
            PlatformVariant::IOsSimulator
            | PlatformVariant::TvOsSimulator
            | PlatformVariant::WatchOsSimulator => Environment::Simulator,
            PlatformVariant::MacOs
            | PlatformVariant::IOsDevice
            | PlatformVariant::TvOsDevice
            | PlatformVariant::WatchOsDevice => Environment::Device,
        }
    }
}

/// The platform half of a target's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub os: Os,
    pub variant: PlatformVariant,
    pub arch: String,
    pub minimum_os_version: OsVersion,
}

impl Platform {
    pub const APPLE_SILICON: &'static str = "arm64";

    /// The SDK platform name; only one target per name may join a
    /// consolidation bucket.
    pub fn name(&self) -> &'static str {
        self.variant.name()
    }

    pub fn environment(&self) -> Environment {
        self.variant.environment()
    }
}

/// Sorts `arm64` ahead of every other architecture, then lexicographically.
pub(crate) fn compare_arch(lhs: &str, rhs: &str) -> Ordering {
    let lhs_silicon = lhs == Platform::APPLE_SILICON;
    let rhs_silicon = rhs == Platform::APPLE_SILICON;
    rhs_silicon.cmp(&lhs_silicon).then_with(|| lhs.cmp(rhs))
}

impl Ord for Platform {
    fn cmp(&self, other: &Self) -> Ordering {
        self.os
            .cmp(&other.os)
            .then_with(|| self.minimum_os_version.cmp(&other.minimum_os_version))
            .then_with(|| self.variant.cmp(&other.variant))
            .then_with(|| compare_arch(&self.arch, &other.arch))
    }
}

impl PartialOrd for Platform {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
