//! Item snapshots as carried by inventory packets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::enchantment::EnchantmentKind;
use crate::persistent::PersistentDataContainer;
use crate::registry::{RegistryKey, RegistryKeyError};

/// Item type identifier (`minecraft:diamond_sword`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemType(RegistryKey);

impl ItemType {
    /// Wrap an already parsed registry key.
    pub fn new(key: RegistryKey) -> Self {
        Self(key)
    }

    /// Parse a registry key or a legacy upper-case material name (`DIAMOND_SWORD`).
    pub fn parse(input: &str) -> Result<Self, RegistryKeyError> {
        let input = input.trim();
        if !input.contains(':') && input.chars().any(|c| c.is_ascii_uppercase()) {
            return RegistryKey::parse(&input.to_ascii_lowercase()).map(Self);
        }
        RegistryKey::parse(input).map(Self)
    }

    /// Registry key of this type.
    pub fn key(&self) -> &RegistryKey {
        &self.0
    }

    /// Swords get extra care in the damage model.
    pub fn is_sword(&self) -> bool {
        self.0.path().contains("sword")
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Item metadata block: display data, enchantments and custom data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Custom display name, if any
    #[serde(default)]
    pub display_name: Option<String>,
    /// Description lines shown under the name; an absent list reads as empty
    #[serde(default)]
    pub lore: Vec<String>,
    /// Enchantment levels keyed by kind
    #[serde(default)]
    pub enchantments: BTreeMap<EnchantmentKind, u32>,
    /// Custom key-value data that survives serialization
    #[serde(default)]
    pub custom_data: PersistentDataContainer,
}

impl ItemMeta {
    /// Level of `kind`, or 0 when absent.
    pub fn enchantment_level(&self, kind: &EnchantmentKind) -> u32 {
        self.enchantments.get(kind).copied().unwrap_or(0)
    }

    /// Builder-style enchantment setter.
    pub fn with_enchantment(mut self, kind: EnchantmentKind, level: u32) -> Self {
        self.enchantments.insert(kind, level);
        self
    }

    /// Builder-style lore setter.
    pub fn with_lore<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lore = lines.into_iter().map(Into::into).collect();
        self
    }
}

/// One inventory slot's contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Type of item
    pub item_type: ItemType,
    /// Quantity in stack
    pub count: u8,
    /// Metadata block, absent for plain items
    #[serde(default)]
    pub meta: Option<ItemMeta>,
}

impl ItemSnapshot {
    /// Create a plain item without metadata.
    pub fn new(item_type: ItemType, count: u8) -> Self {
        Self {
            item_type,
            count,
            meta: None,
        }
    }

    /// Builder-style metadata setter.
    pub fn with_meta(mut self, meta: ItemMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Sharpness level, or 0 when the item has no metadata.
    pub fn sharpness_level(&self) -> u32 {
        self.meta
            .as_ref()
            .map(|meta| meta.enchantment_level(&EnchantmentKind::Sharpness))
            .unwrap_or(0)
    }
}
