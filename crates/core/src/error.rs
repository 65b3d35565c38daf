use thiserror::Error;

use crate::registry::RegistryKeyError;

/// Errors surfaced while configuring the damage display.
///
/// Packet handling itself never fails; these only occur at startup or reload.
#[derive(Debug, Error)]
pub enum TooltipError {
    /// The host server runs a version this crate cannot model.
    #[error("unsupported server version {version}: {reason}")]
    UnsupportedHost {
        /// Version string reported by the host
        version: String,
        /// Why the version is rejected
        reason: &'static str,
    },
    /// The host reported a version string that could not be parsed.
    #[error("unrecognised server version string '{0}'")]
    InvalidVersion(String),
    /// An attack damage table could not be parsed.
    #[error("invalid attack damage table: {0}")]
    DamageTable(#[from] serde_json::Error),
    /// An attack damage table names an invalid item type.
    #[error("invalid item type '{name}' in attack damage table: {source}")]
    InvalidItemType {
        /// Offending entry
        name: String,
        /// Parse failure
        source: RegistryKeyError,
    },
    /// An attack damage table carries NaN or infinite damage.
    #[error("attack damage for {item} must be finite, got {value}")]
    NonFiniteDamage {
        /// Offending item type
        item: String,
        /// Offending value
        value: f64,
    },
}
