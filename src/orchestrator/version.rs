//! Semantic version bump keywords and increment rules.
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use semver::Version;

use crate::error::HeraldError;

/// Which semantic version component to increment. Parsed at the presentation
/// boundary so an unrecognized keyword never reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl VersionBump {
    /// Increment `current` by this bump, resetting lower components to zero.
    pub fn apply(&self, current: &Version) -> Version {
        match self {
            VersionBump::Major => Version::new(current.major + 1, 0, 0),
            VersionBump::Minor => {
                Version::new(current.major, current.minor + 1, 0)
            }
            VersionBump::Patch => {
                Version::new(current.major, current.minor, current.patch + 1)
            }
        }
    }
}

impl FromStr for VersionBump {
    type Err = HeraldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            _ => Err(HeraldError::InvalidBumpKeyword(s.to_string())),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}
