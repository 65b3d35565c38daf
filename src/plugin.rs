//! Plugin lifecycle and packet listener wiring.

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use tooltipfix_core::{DamageModel, DialectVariant, ServerVersion, SharedTemplate};
use tooltipfix_net::{BridgeClassifier, ClientPacket, ConnectionId, ServerPacket, TooltipTransformer};
use tracing::{error, info};

use crate::config::ConfigStore;

/// Enabled damage tooltip plugin.
///
/// Owns the configuration store and the transformer; the template slot is
/// shared so that a reload is visible to every later packet at once.
pub struct DamageTooltipPlugin {
    store: ConfigStore,
    template: SharedTemplate,
    transformer: TooltipTransformer,
    version: ServerVersion,
}

impl DamageTooltipPlugin {
    /// Activate against a host reporting `server_version`.
    ///
    /// Fails for unparseable or unsupported versions; the host must then keep
    /// the plugin disabled.
    pub fn enable(
        config_path: impl Into<PathBuf>,
        server_version: &str,
        classifier: Arc<dyn BridgeClassifier + Send + Sync>,
    ) -> Result<Self> {
        let version = ServerVersion::parse(server_version)
            .and_then(|version| DialectVariant::detect(&version).map(|variant| (version, variant)));
        let (version, variant) = match version {
            Ok(resolved) => resolved,
            Err(err) => {
                error!("Refusing to enable damage tooltips: {err}");
                return Err(err).context("unsupported host");
            }
        };

        let mut store = ConfigStore::open(config_path);
        let template = SharedTemplate::new(store.display_template());
        let model = DamageModel::new(variant, store.damage_table());
        let transformer = TooltipTransformer::new(classifier, model, template.clone());

        info!("Damage tooltips enabled, config {}", store.path().display());
        Ok(Self {
            store,
            template,
            transformer,
            version,
        })
    }

    pub fn version(&self) -> ServerVersion {
        self.version
    }

    pub fn variant(&self) -> DialectVariant {
        self.transformer.model().variant()
    }

    /// Re-read the config file and swap in the new template.
    pub fn reload(&mut self) {
        self.store.reload();
        self.template.replace(self.store.display_template());
        info!("Reloaded damage tooltip config");
    }

    /// Outbound listener: runs before the packet is handed to any other sender.
    pub fn on_packet_sending<'a>(
        &self,
        connection: ConnectionId,
        packet: &'a ServerPacket,
    ) -> Cow<'a, ServerPacket> {
        self.transformer.transform_outbound(connection, packet)
    }

    /// Inbound listener: strips the damage line before the host trusts the item.
    pub fn on_packet_receiving(&self, packet: &mut ClientPacket) -> bool {
        self.transformer.reverse_inbound(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use tooltipfix_core::{EnchantmentKind, ItemMeta, ItemSnapshot, ItemType};
    use tooltipfix_net::BridgedConnections;

    fn bridged(id: u128) -> Arc<BridgedConnections> {
        let connections = Arc::new(BridgedConnections::new());
        connections.insert(ConnectionId(id));
        connections
    }

    fn axe_slot() -> ServerPacket {
        ServerPacket::SetSlot {
            window_id: 0,
            state_id: 0,
            slot: 36,
            item: Some(
                ItemSnapshot::new(ItemType::parse("diamond_axe").unwrap(), 1).with_meta(
                    ItemMeta::default().with_enchantment(EnchantmentKind::Sharpness, 1),
                ),
            ),
        }
    }

    fn lore_of(packet: &ServerPacket) -> Vec<String> {
        match packet {
            ServerPacket::SetSlot { item: Some(item), .. } => item
                .meta
                .as_ref()
                .map(|meta| meta.lore.clone())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn refuses_unsupported_versions() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("damagetooltipfix.toml");
        assert!(DamageTooltipPlugin::enable(&path, "1.7.10", bridged(1)).is_err());
        assert!(DamageTooltipPlugin::enable(&path, "nonsense", bridged(1)).is_err());
    }

    #[test]
    fn detects_dialect_from_version() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("damagetooltipfix.toml");
        let plugin = DamageTooltipPlugin::enable(&path, "1.8.8", bridged(1)).unwrap();
        assert_eq!(plugin.variant(), DialectVariant::Legacy);
        assert_eq!(plugin.version(), ServerVersion::new(1, 8, 8));
    }

    #[test]
    fn reload_swaps_template_for_later_packets() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("damagetooltipfix.toml");
        let mut plugin = DamageTooltipPlugin::enable(&path, "1.20.4", bridged(1)).unwrap();
        let packet = axe_slot();

        // diamond axe: 8 + (1 * 0.5 + 0.5) + 1
        let out = plugin.on_packet_sending(ConnectionId(1), &packet);
        assert_eq!(lore_of(&out), vec!["\u{a7}9Actual Damage: 10".to_string()]);

        fs::write(&path, "lore = \"&eDmg %damage%\"\n").expect("write config");
        plugin.reload();

        let out = plugin.on_packet_sending(ConnectionId(1), &packet);
        assert_eq!(lore_of(&out), vec!["\u{a7}eDmg 10".to_string()]);
        assert!(lore_of(&packet).is_empty());
    }
}
