//! TOML plugin configuration with default write-back.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tooltipfix_core::{AttackDamageTable, DisplayLineTemplate, DEFAULT_TEMPLATE};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config/damagetooltipfix.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Damage line template. `&` colour codes are translated and the first
    /// `%damage%` is replaced with the value.
    pub lore: String,
    /// JSON file replacing the built-in attack damage table.
    pub attack_damage_table: Option<PathBuf>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            lore: DEFAULT_TEMPLATE.to_string(),
            attack_damage_table: None,
        }
    }
}

impl PluginConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<PluginConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    PluginConfig::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    info!("Config not found at {}. Using defaults", path.display());
                }
                PluginConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

/// File-backed configuration the plugin reads and, for defaults, writes back.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: PluginConfig,
}

impl ConfigStore {
    /// Open the store, writing a default file if none exists yet.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = PluginConfig::load_from_path(&path);
        let store = Self { path, config };
        if !store.path.exists() {
            if let Err(err) = store.save() {
                warn!("Failed to write default config: {err:#}");
            }
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Re-read the file, discarding in-memory changes.
    pub fn reload(&mut self) {
        self.config = PluginConfig::load_from_path(&self.path);
    }

    pub fn save(&self) -> Result<()> {
        self.config.save_to_path(&self.path)
    }

    /// Normalized damage line template, repairing a blank `lore` entry.
    ///
    /// A blank template is replaced by the default, persisted, and the file
    /// re-read, so operators see the repaired value on disk.
    pub fn display_template(&mut self) -> DisplayLineTemplate {
        if self.config.lore.trim().is_empty() {
            warn!("Lore is blank, resetting value");
            self.config.lore = DEFAULT_TEMPLATE.to_string();
            match self.save() {
                Ok(()) => self.reload(),
                Err(err) => warn!("Failed to persist default lore: {err:#}"),
            }
        }
        if self.config.lore.trim().is_empty() {
            return DisplayLineTemplate::default();
        }
        DisplayLineTemplate::normalize(&self.config.lore)
    }

    /// Attack damage table named by the config, or the built-in one.
    pub fn damage_table(&self) -> AttackDamageTable {
        let Some(path) = &self.config.attack_damage_table else {
            return AttackDamageTable::builtin();
        };
        match load_damage_table(path) {
            Ok(table) => {
                info!(
                    "Loaded {} attack damage entries from {}",
                    table.len(),
                    path.display()
                );
                table
            }
            Err(err) => {
                warn!(
                    "Failed to load attack damage table {}: {err:#}. Using built-in table",
                    path.display()
                );
                AttackDamageTable::builtin()
            }
        }
    }
}

fn load_damage_table(path: &Path) -> Result<AttackDamageTable> {
    let contents = fs::read_to_string(path)?;
    Ok(AttackDamageTable::from_json_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tooltipfix_core::ItemType;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config").join("damagetooltipfix.toml");

        let store = ConfigStore::open(&path);

        assert_eq!(store.config(), &PluginConfig::default());
        let written = fs::read_to_string(&path).expect("default config written");
        assert!(written.contains("Actual Damage"));
    }

    #[test]
    fn blank_lore_is_reset_and_persisted() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("damagetooltipfix.toml");
        fs::write(&path, "lore = \"  \"\n").expect("write config");

        let mut store = ConfigStore::open(&path);
        let template = store.display_template();

        assert_eq!(template, DisplayLineTemplate::default());
        let reread = PluginConfig::load_from_path(&path);
        assert_eq!(reread.lore, DEFAULT_TEMPLATE);
    }

    #[test]
    fn custom_lore_is_normalized() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("damagetooltipfix.toml");
        fs::write(&path, "lore = \"&aDeals %damage% dmg\"\n").expect("write config");

        let mut store = ConfigStore::open(&path);

        assert_eq!(store.display_template().render(6.5), "\u{a7}aDeals 6.5 dmg");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("damagetooltipfix.toml");
        fs::write(&path, "lore = [").expect("write config");

        assert_eq!(PluginConfig::load_from_path(&path), PluginConfig::default());
    }

    #[test]
    fn damage_table_override_and_fallback() {
        let dir = tempdir().expect("temp dir");
        let table_path = dir.path().join("damage.json");
        fs::write(&table_path, r#"{"custom:hammer": 11.0}"#).expect("write table");

        let mut store = ConfigStore::open(dir.path().join("damagetooltipfix.toml"));
        store.config.attack_damage_table = Some(table_path.clone());
        let table = store.damage_table();
        assert_eq!(
            table.attack_damage(&ItemType::parse("custom:hammer").unwrap()),
            Some(11.0)
        );

        fs::write(&table_path, "not json").expect("write table");
        assert_eq!(store.damage_table(), AttackDamageTable::builtin());
    }
}
