//! Enchantment kinds and their legacy constant names.

use serde::{Deserialize, Serialize};

use crate::registry::{RegistryKey, RegistryKeyError};

/// Enchantment kinds carried in item metadata.
///
/// Only a handful of kinds matter to damage display; everything else is kept
/// as [`EnchantmentKind::Other`] so that unknown enchantments survive a
/// transform untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EnchantmentKind {
    /// Flat melee damage bonus (legacy name `DAMAGE_ALL`)
    Sharpness,
    /// Bonus against undead (legacy name `DAMAGE_UNDEAD`)
    Smite,
    /// Bonus against arthropods (legacy name `DAMAGE_ARTHROPODS`)
    BaneOfArthropods,
    /// Increases knockback
    Knockback,
    /// Sets targets on fire
    FireAspect,
    /// Increases mob drops (legacy name `LOOT_BONUS_MOBS`)
    Looting,
    /// Increases mining speed (legacy name `DIG_SPEED`)
    Efficiency,
    /// Reduces durability loss (legacy name `DURABILITY`)
    Unbreaking,
    /// Repairs item using XP
    Mending,
    /// Any enchantment without special handling
    Other(RegistryKey),
}

static KNOWN: [(EnchantmentKind, RegistryKey, &str); 9] = [
    (
        EnchantmentKind::Sharpness,
        RegistryKey::from_static("minecraft", "sharpness"),
        "DAMAGE_ALL",
    ),
    (
        EnchantmentKind::Smite,
        RegistryKey::from_static("minecraft", "smite"),
        "DAMAGE_UNDEAD",
    ),
    (
        EnchantmentKind::BaneOfArthropods,
        RegistryKey::from_static("minecraft", "bane_of_arthropods"),
        "DAMAGE_ARTHROPODS",
    ),
    (
        EnchantmentKind::Knockback,
        RegistryKey::from_static("minecraft", "knockback"),
        "KNOCKBACK",
    ),
    (
        EnchantmentKind::FireAspect,
        RegistryKey::from_static("minecraft", "fire_aspect"),
        "FIRE_ASPECT",
    ),
    (
        EnchantmentKind::Looting,
        RegistryKey::from_static("minecraft", "looting"),
        "LOOT_BONUS_MOBS",
    ),
    (
        EnchantmentKind::Efficiency,
        RegistryKey::from_static("minecraft", "efficiency"),
        "DIG_SPEED",
    ),
    (
        EnchantmentKind::Unbreaking,
        RegistryKey::from_static("minecraft", "unbreaking"),
        "DURABILITY",
    ),
    (
        EnchantmentKind::Mending,
        RegistryKey::from_static("minecraft", "mending"),
        "MENDING",
    ),
];

impl EnchantmentKind {
    /// Registry key identifying this enchantment.
    pub fn key(&self) -> RegistryKey {
        if let Self::Other(key) = self {
            return key.clone();
        }
        KNOWN
            .iter()
            .find(|(kind, _, _)| kind == self)
            .map(|(_, key, _)| key.clone())
            .unwrap_or_else(|| RegistryKey::from_static("minecraft", "unknown"))
    }

    /// Resolve a registry key to a kind; unknown keys become [`EnchantmentKind::Other`].
    pub fn from_key(key: RegistryKey) -> Self {
        KNOWN
            .iter()
            .find(|(_, known, _)| *known == key)
            .map(|(kind, _, _)| kind.clone())
            .unwrap_or(Self::Other(key))
    }

    /// Parse either a registry key (`minecraft:sharpness`, `sharpness`) or a
    /// legacy upper-case constant (`DAMAGE_ALL`).
    pub fn parse(input: &str) -> Result<Self, RegistryKeyError> {
        let input = input.trim();
        if let Some((kind, _, _)) = KNOWN.iter().find(|(_, _, legacy)| *legacy == input) {
            return Ok(kind.clone());
        }
        if input.chars().any(|c| c.is_ascii_uppercase()) && !input.contains(':') {
            return RegistryKey::parse(&input.to_ascii_lowercase()).map(Self::from_key);
        }
        RegistryKey::parse(input).map(Self::from_key)
    }
}

impl TryFrom<String> for EnchantmentKind {
    type Error = RegistryKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EnchantmentKind> for String {
    fn from(kind: EnchantmentKind) -> Self {
        kind.key().to_string()
    }
}
