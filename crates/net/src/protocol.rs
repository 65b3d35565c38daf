//! Packet definitions for the inventory traffic the tooltip transform touches.
//!
//! Only item payloads matter here; other packets are modelled so that hosts
//! can route every message through the same entry points.

use serde::{Deserialize, Serialize};
use tooltipfix_core::ItemSnapshot;

/// Container window identifier (0 is the player inventory).
pub type WindowId = u8;

/// Slot index inside a window (-1 addresses the cursor on some packets).
pub type SlotIndex = i16;

/// Maximum number of slots in a bulk window update.
pub const MAX_WINDOW_SLOTS: usize = 256;

/// Maximum lore lines on a single item.
pub const MAX_LORE_LINES: usize = 256;

/// Maximum length of a chat message (characters).
pub const MAX_CHAT_LEN: usize = 256;

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ServerPacket {
    /// Bulk window contents.
    WindowItems {
        /// Target window.
        window_id: WindowId,
        /// Window state counter echoed back by the client.
        state_id: i32,
        /// Slot contents in slot order (`None` for empty slots).
        items: Vec<Option<ItemSnapshot>>,
        /// Item held on the cursor.
        carried: Option<ItemSnapshot>,
    },

    /// Single slot update.
    SetSlot {
        /// Target window.
        window_id: WindowId,
        /// Window state counter echoed back by the client.
        state_id: i32,
        /// Slot being updated.
        slot: SlotIndex,
        /// New contents (`None` clears the slot).
        item: Option<ItemSnapshot>,
    },

    /// Chat message from the server.
    Chat {
        /// Message text.
        text: String,
    },
}

impl ServerPacket {
    /// Whether this packet carries item snapshots the tooltip transform may rewrite.
    pub fn carries_items(&self) -> bool {
        matches!(self, Self::WindowItems { .. } | Self::SetSlot { .. })
    }

    /// Verify message limits and validity.
    pub fn verify(&self) -> Result<(), &'static str> {
        match self {
            ServerPacket::WindowItems { items, carried, .. } => {
                if items.len() > MAX_WINDOW_SLOTS {
                    return Err("Too many window slots");
                }
                for item in items.iter().flatten().chain(carried.iter()) {
                    verify_item(item)?;
                }
            }
            ServerPacket::SetSlot { item, .. } => {
                if let Some(item) = item {
                    verify_item(item)?;
                }
            }
            ServerPacket::Chat { text } => {
                if text.len() > MAX_CHAT_LEN {
                    return Err("Chat message too long");
                }
            }
        }
        Ok(())
    }
}

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ClientPacket {
    /// Creative-mode inventory slot set.
    SetCreativeSlot {
        /// Slot being set.
        slot: SlotIndex,
        /// Item the client claims to hold (`None` clears the slot).
        item: Option<ItemSnapshot>,
    },

    /// Chat message from the player.
    Chat {
        /// Message text.
        text: String,
    },
}

impl ClientPacket {
    /// Mutable access to the item payload, if this packet kind has one.
    pub fn item_mut(&mut self) -> Option<&mut Option<ItemSnapshot>> {
        match self {
            ClientPacket::SetCreativeSlot { item, .. } => Some(item),
            ClientPacket::Chat { .. } => None,
        }
    }

    /// Verify message limits and validity.
    ///
    /// This should be called on all received messages to prevent DoS attacks.
    pub fn verify(&self) -> Result<(), &'static str> {
        match self {
            ClientPacket::SetCreativeSlot { item, .. } => {
                if let Some(item) = item {
                    verify_item(item)?;
                }
            }
            ClientPacket::Chat { text } => {
                if text.len() > MAX_CHAT_LEN {
                    return Err("Chat message too long");
                }
            }
        }
        Ok(())
    }
}

fn verify_item(item: &ItemSnapshot) -> Result<(), &'static str> {
    let lore_lines = item.meta.as_ref().map_or(0, |meta| meta.lore.len());
    if lore_lines > MAX_LORE_LINES {
        return Err("Too many lore lines");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tooltipfix_core::{ItemMeta, ItemType};

    fn lored_item(lines: usize) -> ItemSnapshot {
        ItemSnapshot::new(ItemType::parse("iron_axe").unwrap(), 1)
            .with_meta(ItemMeta::default().with_lore(vec!["x"; lines]))
    }

    #[test]
    fn only_inventory_packets_carry_items() {
        let set_slot = ServerPacket::SetSlot {
            window_id: 0,
            state_id: 1,
            slot: 36,
            item: None,
        };
        assert!(set_slot.carries_items());
        assert!(!ServerPacket::Chat { text: "hi".into() }.carries_items());
    }

    #[test]
    fn verify_rejects_oversized_windows() {
        let packet = ServerPacket::WindowItems {
            window_id: 0,
            state_id: 0,
            items: vec![None; MAX_WINDOW_SLOTS + 1],
            carried: None,
        };
        assert_eq!(packet.verify(), Err("Too many window slots"));
    }

    #[test]
    fn verify_rejects_oversized_lore() {
        let packet = ClientPacket::SetCreativeSlot {
            slot: 36,
            item: Some(lored_item(MAX_LORE_LINES + 1)),
        };
        assert_eq!(packet.verify(), Err("Too many lore lines"));

        let packet = ClientPacket::SetCreativeSlot {
            slot: 36,
            item: Some(lored_item(3)),
        };
        assert!(packet.verify().is_ok());
    }

    #[test]
    fn chat_has_no_item_payload() {
        let mut packet = ClientPacket::Chat { text: "hi".into() };
        assert!(packet.item_mut().is_none());
    }
}
