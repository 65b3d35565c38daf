#![warn(missing_docs)]
//! Core primitives for bridged-client damage display: item snapshots, the
//! attack damage table, the damage model and the display-line template.

pub mod attributes;
pub mod damage;
pub mod dialect;
pub mod enchantment;
pub mod error;
pub mod item;
pub mod persistent;
pub mod registry;
pub mod template;

// Re-export commonly used types
pub use attributes::AttackDamageTable;
pub use damage::{DamageModel, DamageProfile};
pub use dialect::{DialectVariant, ServerVersion};
pub use enchantment::EnchantmentKind;
pub use error::TooltipError;
pub use item::{ItemMeta, ItemSnapshot, ItemType};
pub use persistent::{PersistentDataContainer, PersistentValue};
pub use registry::{RegistryKey, RegistryKeyError};
pub use template::{format_damage, DisplayLineTemplate, SharedTemplate, DEFAULT_TEMPLATE};

/// Custom-data key recording where the synthetic damage line was inserted.
///
/// Stable across restarts; paired clients rely on it surviving the round trip.
pub const LORE_INDEX_KEY: RegistryKey = RegistryKey::from_static("damagetooltipfix", "lore_index");
