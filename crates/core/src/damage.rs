//! Damage as a bridged client would display it.
//!
//! Native and bridged clients disagree on how much damage sharpness adds. The
//! model reproduces the bridged formula so the native tooltip can be amended
//! with the value the bridged player actually sees applied.

use crate::attributes::AttackDamageTable;
use crate::dialect::DialectVariant;
use crate::item::ItemType;

/// Inputs of a single damage computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageProfile {
    /// Default main-hand attack damage of the item type
    pub base_damage: f64,
    /// Sharpness level
    pub enchantment_level: u32,
    /// Formula generation in effect
    pub variant: DialectVariant,
}

impl DamageProfile {
    /// Damage under the profile's own formula.
    pub fn equivalent_damage(&self) -> f64 {
        self.base_damage + self.variant.sharpness_bonus(self.enchantment_level)
    }

    /// Damage under the pre-combat-update formula, whatever the profile's variant.
    pub fn legacy_damage(&self) -> f64 {
        self.base_damage + DialectVariant::Legacy.sharpness_bonus(self.enchantment_level)
    }
}

/// Stateless damage model configured once at startup.
#[derive(Debug, Clone)]
pub struct DamageModel {
    variant: DialectVariant,
    table: AttackDamageTable,
}

impl DamageModel {
    /// Create a model for `variant` backed by `table`.
    pub fn new(variant: DialectVariant, table: AttackDamageTable) -> Self {
        Self { variant, table }
    }

    /// Formula generation this model was configured with.
    pub fn variant(&self) -> DialectVariant {
        self.variant
    }

    /// Attack damage table backing this model.
    pub fn table(&self) -> &AttackDamageTable {
        &self.table
    }

    /// Bridged-equivalent damage, or `None` when no display line is needed.
    ///
    /// Returns `None` for types without attack damage, for unenchanted items,
    /// and for swords whose bridged damage floors to the same value as the
    /// pre-combat-update damage (the two displays already agree).
    pub fn equivalent_damage(&self, item_type: &ItemType, sharpness_level: u32) -> Option<f64> {
        let base_damage = self.table.attack_damage(item_type)?;
        if sharpness_level == 0 {
            return None;
        }

        let profile = DamageProfile {
            base_damage,
            enchantment_level: sharpness_level,
            variant: self.variant,
        };
        let damage = profile.equivalent_damage();

        if item_type.is_sword() && damage.floor() == profile.legacy_damage().floor() {
            return None;
        }
        Some(damage)
    }
}
