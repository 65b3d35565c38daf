//! Packet encoding and decoding with framing.
//!
//! Frame format: `[length: u32][packet_type: u8][payload: bytes]`, where the
//! length excludes the length field itself and the payload is postcard.

use crate::protocol::{ClientPacket, ServerPacket};
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Encode a server packet with length prefix.
pub fn encode_server_packet(packet: &ServerPacket) -> Result<Vec<u8>> {
    encode_frame(server_packet_tag(packet), packet).context("Failed to serialize server packet")
}

/// Encode a client packet with length prefix.
pub fn encode_client_packet(packet: &ClientPacket) -> Result<Vec<u8>> {
    encode_frame(client_packet_tag(packet), packet).context("Failed to serialize client packet")
}

/// Decode a server packet from frame data.
///
/// Expects data to start with length prefix.
pub fn decode_server_packet(data: &[u8]) -> Result<ServerPacket> {
    decode_frame(data).context("Failed to deserialize server packet")
}

/// Decode a client packet from frame data.
///
/// Expects data to start with length prefix.
pub fn decode_client_packet(data: &[u8]) -> Result<ClientPacket> {
    decode_frame(data).context("Failed to deserialize client packet")
}

fn encode_frame<T: Serialize>(tag: u8, packet: &T) -> Result<Vec<u8>> {
    let payload = postcard::to_allocvec(packet)?;

    let mut frame = Vec::with_capacity(4 + 1 + payload.len());

    // Length (excluding length field itself)
    let length = u32::try_from(1 + payload.len()).context("Packet too large to frame")?;
    frame.extend_from_slice(&length.to_le_bytes());
    frame.push(tag);
    frame.extend_from_slice(&payload);

    Ok(frame)
}

fn decode_frame<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    if data.len() < 5 {
        return Err(anyhow::anyhow!(
            "Frame too short: {} bytes (minimum 5)",
            data.len()
        ));
    }

    let length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

    if length == 0 || data.len() - 4 < length {
        return Err(anyhow::anyhow!(
            "Incomplete frame: expected {} bytes, got {}",
            4 + length,
            data.len()
        ));
    }

    // Skip packet type tag (data[4])
    let payload = &data[5..4 + length];

    Ok(postcard::from_bytes(payload)?)
}

fn server_packet_tag(packet: &ServerPacket) -> u8 {
    match packet {
        ServerPacket::WindowItems { .. } => 0,
        ServerPacket::SetSlot { .. } => 1,
        ServerPacket::Chat { .. } => 2,
    }
}

fn client_packet_tag(packet: &ClientPacket) -> u8 {
    match packet {
        ClientPacket::SetCreativeSlot { .. } => 0,
        ClientPacket::Chat { .. } => 1,
    }
}
