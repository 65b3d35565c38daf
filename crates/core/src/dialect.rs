//! Which damage formula the bridged client's ecosystem implements.
//!
//! Resolved once at startup from the host server version and handed to the
//! damage model as configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TooltipError;

/// Damage formula generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialectVariant {
    /// Before the combat update: sharpness adds `1.25` per level.
    Legacy,
    /// After the combat update: sharpness adds `0.5 * level + 0.5`.
    CombatUpdate,
}

impl DialectVariant {
    /// Resolve the variant for a host version, refusing versions outside the supported range.
    pub fn detect(version: &ServerVersion) -> Result<Self, TooltipError> {
        if version.major != 1 {
            return Err(TooltipError::UnsupportedHost {
                version: version.to_string(),
                reason: "only 1.x servers are supported",
            });
        }
        match version.minor {
            0..=7 => Err(TooltipError::UnsupportedHost {
                version: version.to_string(),
                reason: "servers older than 1.8 lack item custom data",
            }),
            8 => Ok(Self::Legacy),
            _ => Ok(Self::CombatUpdate),
        }
    }

    /// Extra damage granted by sharpness at `level` under this formula.
    pub fn sharpness_bonus(self, level: u32) -> f64 {
        let level = f64::from(level);
        match self {
            Self::Legacy => level * 1.25,
            Self::CombatUpdate => level * 0.5 + 0.5,
        }
    }
}

/// Host server version (`1.20.4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerVersion {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
    /// Patch component (0 when omitted)
    pub patch: u32,
}

impl ServerVersion {
    /// Create a version from components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse `1.20`, `1.20.4`, `1.20.4-R0.1-SNAPSHOT` or a full
    /// `git-Paper-196 (MC: 1.20.4)` server banner.
    pub fn parse(input: &str) -> Result<Self, TooltipError> {
        let trimmed = input.trim();
        let core = match trimmed.find("(MC:") {
            Some(start) => trimmed[start + 4..].trim_end_matches(')').trim(),
            None => trimmed,
        };
        let core = core.split('-').next().unwrap_or(core);

        let mut parts = core.split('.');
        let mut next = |required: bool| -> Result<u32, TooltipError> {
            match parts.next() {
                Some(part) => part
                    .parse()
                    .map_err(|_| TooltipError::InvalidVersion(input.to_string())),
                None if required => Err(TooltipError::InvalidVersion(input.to_string())),
                None => Ok(0),
            }
        };
        let major = next(true)?;
        let minor = next(true)?;
        let patch = next(false)?;
        if parts.next().is_some() {
            return Err(TooltipError::InvalidVersion(input.to_string()));
        }
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
