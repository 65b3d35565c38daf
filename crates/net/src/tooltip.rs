//! Damage tooltip transform for bridged connections.
//!
//! Outbound inventory packets headed to a bridged client get one synthetic
//! lore line per eligible item, and the line's index is recorded in the
//! item's custom data under [`LORE_INDEX_KEY`]. When the client echoes the item
//! back (creative slot set), the recorded line is stripped again so it never
//! becomes authoritative item data.

use std::borrow::Cow;
use std::sync::Arc;

use tooltipfix_core::{
    DamageModel, DisplayLineTemplate, ItemSnapshot, PersistentValue,
    SharedTemplate, LORE_INDEX_KEY,
};
use tracing::{debug, trace, warn};

use crate::connection::{BridgeClassifier, ConnectionId};
use crate::protocol::{ClientPacket, ServerPacket};

/// Implicit fist damage added on top of the weapon's attack damage when displayed.
pub const PUNCH_DAMAGE: f64 = 1.0;

/// Per-packet tooltip rewriting for one server process.
pub struct TooltipTransformer {
    classifier: Arc<dyn BridgeClassifier + Send + Sync>,
    model: DamageModel,
    template: SharedTemplate,
}

impl TooltipTransformer {
    /// Create a transformer. `template` is shared with whatever performs reloads.
    pub fn new(
        classifier: Arc<dyn BridgeClassifier + Send + Sync>,
        model: DamageModel,
        template: SharedTemplate,
    ) -> Self {
        Self {
            classifier,
            model,
            template,
        }
    }

    /// Damage model in use.
    pub fn model(&self) -> &DamageModel {
        &self.model
    }

    /// Rewrite a server packet for `connection`.
    ///
    /// Non-bridged connections and packets without items get the original
    /// packet back untouched. Otherwise the packet is deep-copied before any
    /// item is amended, since the host may send the same packet elsewhere.
    pub fn transform_outbound<'a>(
        &self,
        connection: ConnectionId,
        packet: &'a ServerPacket,
    ) -> Cow<'a, ServerPacket> {
        if !self.classifier.is_bridged(connection) {
            trace!(%connection, "native connection, passing packet through");
            return Cow::Borrowed(packet);
        }
        if !packet.carries_items() {
            return Cow::Borrowed(packet);
        }

        let template = self.template.load();
        let mut copy = packet.clone();
        let annotated = match &mut copy {
            ServerPacket::SetSlot { item, .. } => item
                .as_mut()
                .map(|item| annotate_item(item, &self.model, &template))
                .map(usize::from)
                .unwrap_or(0),
            ServerPacket::WindowItems { items, .. } => items
                .iter_mut()
                .flatten()
                .map(|item| annotate_item(item, &self.model, &template))
                .filter(|&annotated| annotated)
                .count(),
            ServerPacket::Chat { .. } => 0,
        };
        if annotated > 0 {
            debug!(%connection, annotated, "added damage lines to outbound packet");
        }
        Cow::Owned(copy)
    }

    /// Strip a previously added damage line from an inbound packet in place.
    ///
    /// Applied to every connection: only a bridged client could have echoed a
    /// marked item back. Returns `true` if a line was removed.
    pub fn reverse_inbound(&self, packet: &mut ClientPacket) -> bool {
        reverse_inbound(packet)
    }
}

/// Strip the synthetic line from the item carried by `packet`, if any.
pub fn reverse_inbound(packet: &mut ClientPacket) -> bool {
    match packet.item_mut() {
        Some(Some(item)) => strip_synthetic_line(item),
        _ => false,
    }
}

/// Append the bridged-equivalent damage line to `item` and record its index.
///
/// Returns `false` and leaves the item untouched when no line is needed:
/// no metadata, an unenchanted sword, or a type the damage model rejects.
pub fn annotate_item(
    item: &mut ItemSnapshot,
    model: &DamageModel,
    template: &DisplayLineTemplate,
) -> bool {
    let sharpness = item.sharpness_level();
    let Some(meta) = item.meta.as_mut() else {
        return false;
    };
    if item.item_type.is_sword() && sharpness == 0 {
        return false;
    }

    let Some(damage) = model.equivalent_damage(&item.item_type, sharpness) else {
        return false;
    };

    let Ok(index) = i32::try_from(meta.lore.len()) else {
        return false;
    };
    meta.lore.push(template.render(damage + PUNCH_DAMAGE));
    meta.custom_data.set_int(LORE_INDEX_KEY, index);

    debug!(item = %item.item_type, damage, index, "annotated item");
    true
}

/// Remove the line recorded under [`LORE_INDEX_KEY`] and clear the marker.
///
/// Items without a marker, with a non-integer marker, or whose marker no
/// longer points inside the lore are left exactly as they are.
pub fn strip_synthetic_line(item: &mut ItemSnapshot) -> bool {
    let Some(meta) = item.meta.as_mut() else {
        return false;
    };

    let index = match meta.custom_data.get(&LORE_INDEX_KEY) {
        None => return false,
        Some(PersistentValue::Int(index)) => *index,
        Some(other) => {
            warn!(item = %item.item_type, ?other, "ignoring lore marker with unexpected type");
            return false;
        }
    };

    let len = meta.lore.len();
    let Some(index) = usize::try_from(index).ok().filter(|&index| index < len) else {
        debug!(item = %item.item_type, index, len, "stale lore marker, leaving item unchanged");
        return false;
    };

    meta.lore.remove(index);
    meta.custom_data.remove(&LORE_INDEX_KEY);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::BridgedConnections;
    use tooltipfix_core::{AttackDamageTable, DialectVariant, EnchantmentKind, ItemMeta, ItemType};

    fn ty(s: &str) -> ItemType {
        ItemType::parse(s).unwrap()
    }

    fn model() -> DamageModel {
        let table = AttackDamageTable::from_entries([
            (ty("test:heavy_pick"), 7.0),
            (ty("test:heavy_sword"), 7.0),
        ]);
        DamageModel::new(DialectVariant::CombatUpdate, table)
    }

    fn sharp(item_type: &str, level: u32) -> ItemSnapshot {
        ItemSnapshot::new(ty(item_type), 1)
            .with_meta(ItemMeta::default().with_enchantment(EnchantmentKind::Sharpness, level))
    }

    fn transformer(bridged: &[u128]) -> TooltipTransformer {
        let connections = BridgedConnections::new();
        for id in bridged {
            connections.insert(ConnectionId(*id));
        }
        TooltipTransformer::new(
            Arc::new(connections),
            model(),
            SharedTemplate::new(DisplayLineTemplate::normalize("Damage: %damage%")),
        )
    }

    #[test]
    fn annotates_enchanted_tool() {
        let mut item = sharp("test:heavy_pick", 3);
        let template = DisplayLineTemplate::normalize("Damage: %damage%");

        assert!(annotate_item(&mut item, &model(), &template));

        let meta = item.meta.unwrap();
        assert_eq!(meta.lore, vec!["Damage: 10".to_string()]);
        assert_eq!(meta.custom_data.get_int(&LORE_INDEX_KEY), Some(0));
    }

    #[test]
    fn marker_records_existing_lore_length() {
        let mut item = sharp("test:heavy_pick", 3);
        item.meta.as_mut().unwrap().lore = vec!["a".into(), "b".into()];
        let template = DisplayLineTemplate::normalize("Damage: %damage%");

        assert!(annotate_item(&mut item, &model(), &template));

        let meta = item.meta.unwrap();
        assert_eq!(meta.custom_data.get_int(&LORE_INDEX_KEY), Some(2));
        assert_eq!(meta.lore[2], "Damage: 10");
    }

    #[test]
    fn sword_tie_break_still_adds_line_when_floors_differ() {
        let mut item = sharp("test:heavy_sword", 2);
        let template = DisplayLineTemplate::normalize("%damage%");

        assert!(annotate_item(&mut item, &model(), &template));
        assert_eq!(item.meta.unwrap().lore, vec!["9.5".to_string()]);
    }

    #[test]
    fn ineligible_items_are_untouched() {
        let template = DisplayLineTemplate::default();
        for original in [
            sharp("test:heavy_pick", 0),
            sharp("test:heavy_sword", 0),
            sharp("minecraft:stick", 5),
            ItemSnapshot::new(ty("test:heavy_pick"), 1),
        ] {
            let mut item = original.clone();
            assert!(!annotate_item(&mut item, &model(), &template));
            assert_eq!(item, original);
        }
    }

    #[test]
    fn native_connections_get_the_original_packet() {
        let transformer = transformer(&[1]);
        let packet = ServerPacket::SetSlot {
            window_id: 0,
            state_id: 0,
            slot: 36,
            item: Some(sharp("test:heavy_pick", 3)),
        };

        let out = transformer.transform_outbound(ConnectionId(2), &packet);
        assert!(matches!(out, Cow::Borrowed(p) if std::ptr::eq(p, &packet)));
    }

    #[test]
    fn bridged_connections_get_a_modified_copy() {
        let transformer = transformer(&[1]);
        let packet = ServerPacket::WindowItems {
            window_id: 0,
            state_id: 3,
            items: vec![None, Some(sharp("test:heavy_pick", 3)), Some(sharp("test:heavy_pick", 0))],
            carried: None,
        };
        let before = packet.clone();

        let out = transformer.transform_outbound(ConnectionId(1), &packet).into_owned();

        assert_eq!(packet, before);
        let ServerPacket::WindowItems { items, .. } = out else {
            panic!("packet kind changed");
        };
        assert_eq!(items[0], None);
        assert_eq!(
            items[1].as_ref().unwrap().meta.as_ref().unwrap().lore,
            vec!["Damage: 10".to_string()]
        );
        assert_eq!(items[2], Some(sharp("test:heavy_pick", 0)));
    }

    #[test]
    fn reversal_removes_line_and_marker() {
        let mut item = sharp("test:heavy_pick", 3);
        item.meta.as_mut().unwrap().lore = vec!["Lore".into()];
        let original = item.clone();
        annotate_item(&mut item, &model(), &DisplayLineTemplate::default());

        assert!(strip_synthetic_line(&mut item));
        assert_eq!(item, original);
        assert!(!strip_synthetic_line(&mut item));
        assert_eq!(item, original);
    }

    #[test]
    fn stale_marker_is_ignored() {
        let mut item = sharp("test:heavy_pick", 3);
        let meta = item.meta.as_mut().unwrap();
        meta.lore = vec!["a".into(), "b".into()];
        meta.custom_data.set_int(LORE_INDEX_KEY, 2);
        let original = item.clone();

        assert!(!strip_synthetic_line(&mut item));
        assert_eq!(item, original);

        item.meta.as_mut().unwrap().custom_data.set_int(LORE_INDEX_KEY, -1);
        assert!(!strip_synthetic_line(&mut item));
    }

    #[test]
    fn marker_without_lore_is_ignored() {
        let mut item = sharp("test:heavy_pick", 3);
        item.meta
            .as_mut()
            .unwrap()
            .custom_data
            .set_int(LORE_INDEX_KEY, 0);
        let original = item.clone();

        assert!(!strip_synthetic_line(&mut item));
        assert_eq!(item, original);
    }

    #[test]
    fn inbound_creative_slot_is_reversed_in_place() {
        let transformer = transformer(&[]);
        let mut item = sharp("test:heavy_pick", 3);
        annotate_item(&mut item, &model(), &DisplayLineTemplate::default());
        let mut packet = ClientPacket::SetCreativeSlot {
            slot: 36,
            item: Some(item),
        };

        assert!(transformer.reverse_inbound(&mut packet));
        let ClientPacket::SetCreativeSlot { item: Some(item), .. } = packet else {
            panic!("item vanished");
        };
        assert!(item.meta.unwrap().lore.is_empty());
    }

    #[test]
    fn empty_lore_round_trips_exactly() {
        let original = sharp("test:heavy_pick", 3);
        assert!(original.meta.as_ref().unwrap().lore.is_empty());
        let mut item = original.clone();

        assert!(annotate_item(&mut item, &model(), &DisplayLineTemplate::default()));
        assert_eq!(item.meta.as_ref().unwrap().custom_data.get_int(&LORE_INDEX_KEY), Some(0));
        assert!(strip_synthetic_line(&mut item));
        assert_eq!(item, original);
    }
}
