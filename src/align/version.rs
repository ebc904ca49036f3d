//! Version arithmetic for release alignment
//!
//! Versions ride on `semver::Version` for ordering and display, but parsing
//! is stricter than semver: exactly three dot-separated non-negative
//! integers. Pre-release or build suffixes would silently break the global
//! ordering the reconciler depends on, so they are rejected loudly.

use crate::core::error::{AlignResult, VersionError};
use semver::Version;
use serde::{Deserialize, Serialize};

/// Severity of a version increment, totally ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bump {
  /// No bump needed (empty commit window)
  None,
  /// Bug fixes only
  Patch,
  /// New features
  Minor,
  /// Breaking changes
  Major,
}

impl Bump {
  /// Apply this bump to a version
  pub fn apply(&self, version: &Version) -> Version {
    match self {
      Bump::Major => Version::new(version.major + 1, 0, 0),
      Bump::Minor => Version::new(version.major, version.minor + 1, 0),
      Bump::Patch => Version::new(version.major, version.minor, version.patch + 1),
      Bump::None => version.clone(),
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Bump::Major => "major",
      Bump::Minor => "minor",
      Bump::Patch => "patch",
      Bump::None => "none",
    }
  }
}

/// Parse a strict MAJOR.MINOR.PATCH string
pub fn parse_version(input: &str) -> AlignResult<Version> {
  let trimmed = input.trim();
  let parts: Vec<&str> = trimmed.split('.').collect();

  if parts.len() != 3 {
    return Err(
      VersionError::Malformed {
        input: trimmed.to_string(),
      }
      .into(),
    );
  }

  let mut numbers = [0u64; 3];
  for (slot, part) in numbers.iter_mut().zip(&parts) {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
      return Err(
        VersionError::Malformed {
          input: trimmed.to_string(),
        }
        .into(),
      );
    }
    *slot = part.parse().map_err(|_| VersionError::Malformed {
      input: trimmed.to_string(),
    })?;
  }

  Ok(Version::new(numbers[0], numbers[1], numbers[2]))
}

/// Highest version in a collection, defaulting to 0.0.0 when empty
pub fn max_version<'a, I>(versions: I) -> Version
where
  I: IntoIterator<Item = &'a Version>,
{
  versions
    .into_iter()
    .max()
    .cloned()
    .unwrap_or_else(|| Version::new(0, 0, 0))
}
