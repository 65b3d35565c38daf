//! Default main-hand attack damage per item type.
//!
//! Values are attribute modifier amounts, i.e. they exclude the player's
//! implicit 1.0 punch damage.

use std::collections::{BTreeMap, HashMap};

use crate::error::TooltipError;
use crate::item::ItemType;
use crate::registry::RegistryKey;

const BUILTIN: &[(&str, f64)] = &[
    ("wooden_sword", 3.0),
    ("golden_sword", 3.0),
    ("stone_sword", 4.0),
    ("iron_sword", 5.0),
    ("diamond_sword", 6.0),
    ("netherite_sword", 7.0),
    ("wooden_axe", 6.0),
    ("golden_axe", 6.0),
    ("stone_axe", 8.0),
    ("iron_axe", 8.0),
    ("diamond_axe", 8.0),
    ("netherite_axe", 9.0),
    ("wooden_pickaxe", 1.0),
    ("golden_pickaxe", 1.0),
    ("stone_pickaxe", 2.0),
    ("iron_pickaxe", 3.0),
    ("diamond_pickaxe", 4.0),
    ("netherite_pickaxe", 5.0),
    ("wooden_shovel", 1.5),
    ("golden_shovel", 1.5),
    ("stone_shovel", 2.5),
    ("iron_shovel", 3.5),
    ("diamond_shovel", 4.5),
    ("netherite_shovel", 5.5),
    ("wooden_hoe", 0.0),
    ("golden_hoe", 0.0),
    ("stone_hoe", 0.0),
    ("iron_hoe", 0.0),
    ("diamond_hoe", 0.0),
    ("netherite_hoe", 0.0),
    ("trident", 8.0),
];

/// Static lookup from item type to its default attack damage.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackDamageTable {
    entries: HashMap<ItemType, f64>,
}

impl AttackDamageTable {
    /// Table of vanilla weapons and tools.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|&(path, damage)| {
                (
                    ItemType::new(RegistryKey::from_static("minecraft", path)),
                    damage,
                )
            })
            .collect();
        Self { entries }
    }

    /// Build a table from explicit entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ItemType, f64)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Parse a JSON object mapping item type names to damage amounts.
    ///
    /// Names may be registry keys or legacy material names.
    pub fn from_json_str(json: &str) -> Result<Self, TooltipError> {
        let raw: BTreeMap<String, f64> = serde_json::from_str(json)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (name, damage) in raw {
            let item_type = ItemType::parse(&name)
                .map_err(|source| TooltipError::InvalidItemType {
                    name: name.clone(),
                    source,
                })?;
            if !damage.is_finite() {
                return Err(TooltipError::NonFiniteDamage {
                    item: item_type.to_string(),
                    value: damage,
                });
            }
            entries.insert(item_type, damage);
        }
        Ok(Self { entries })
    }

    /// Default attack damage for `item_type`, or `None` if it is not a weapon or tool.
    pub fn attack_damage(&self, item_type: &ItemType) -> Option<f64> {
        self.entries.get(item_type).copied()
    }

    /// Number of item types in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AttackDamageTable {
    fn default() -> Self {
        Self::builtin()
    }
}
