#![warn(missing_docs)]
//! Inventory packet model, codec and the damage tooltip transform.

mod codec;
mod connection;
mod protocol;
pub mod tooltip;

pub use codec::{
    decode_client_packet, decode_server_packet, encode_client_packet, encode_server_packet,
};
pub use connection::{BridgeClassifier, BridgedConnections, ConnectionId};
pub use protocol::{
    ClientPacket, ServerPacket, SlotIndex, WindowId, MAX_CHAT_LEN, MAX_LORE_LINES,
    MAX_WINDOW_SLOTS,
};
pub use tooltip::{
    annotate_item, reverse_inbound, strip_synthetic_line, TooltipTransformer, PUNCH_DAMAGE,
};
