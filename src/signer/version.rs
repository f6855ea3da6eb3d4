use crate::{prelude::*, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Firmware (or app) version reported by a signer. Field order gives semver ordering.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
pub struct AppVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl AppVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for AppVersion {
    type Err = Error;

    /// Accepts `major.minor.patch`, optionally prefixed with `v`; missing parts are zero.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches('v');
        let mut parts = trimmed.split('.');
        let mut next = || -> Result<u32> {
            match parts.next() {
                None => Ok(0),
                Some(part) => part.parse().map_err(|_| Error::parse("appVersion", s)),
            }
        };
        let version = AppVersion::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(Error::parse("appVersion", s));
        }
        Ok(version)
    }
}
