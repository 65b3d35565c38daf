//! Drives recorded packet events through the plugin and reports the results
//! as JSON lines, one per event.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::{fs, io::Write, path::Path};
use tooltipfix_net::{BridgedConnections, ClientPacket, ConnectionId, ServerPacket};
use tracing::{debug, warn};

use crate::commands::{self, CommandSender};
use crate::plugin::DamageTooltipPlugin;

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    /// Connections to register as bridged before the first event.
    #[serde(default)]
    pub bridged: Vec<ConnectionId>,
    pub events: Vec<ReplayEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub enum ReplayEvent {
    Outbound {
        connection: ConnectionId,
        packet: ServerPacket,
    },
    Inbound {
        connection: ConnectionId,
        packet: ClientPacket,
    },
}

#[derive(Debug, Serialize)]
struct ReplayRecord<'a> {
    index: usize,
    direction: &'static str,
    connection: ConnectionId,
    changed: bool,
    packet: ReplayPacket<'a>,
    /// Command feedback for chat lines starting with `/`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reply: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ReplayPacket<'a> {
    Server(&'a ServerPacket),
    Client(&'a ClientPacket),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub outbound: usize,
    pub inbound: usize,
    pub changed: usize,
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read replay {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("failed to parse replay {}", path.display()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub fn run(
    plugin: &mut DamageTooltipPlugin,
    bridged: &BridgedConnections,
    script: ReplayScript,
    mut out: impl Write,
) -> Result<ReplaySummary> {
    for connection in &script.bridged {
        bridged.insert(*connection);
    }

    let mut summary = ReplaySummary::default();
    for (index, event) in script.events.into_iter().enumerate() {
        match event {
            ReplayEvent::Outbound { connection, packet } => {
                if let Err(reason) = packet.verify() {
                    warn!(index, reason, "skipping invalid outbound packet");
                    continue;
                }
                summary.outbound += 1;
                let sent = plugin.on_packet_sending(connection, &packet);
                let changed = matches!(&sent, Cow::Owned(copy) if *copy != packet);
                write_record(
                    &mut out,
                    &ReplayRecord {
                        index,
                        direction: "outbound",
                        connection,
                        changed,
                        packet: ReplayPacket::Server(&sent),
                        reply: Vec::new(),
                    },
                )?;
                summary.changed += usize::from(changed);
            }
            ReplayEvent::Inbound {
                connection,
                mut packet,
            } => {
                if let Err(reason) = packet.verify() {
                    warn!(index, reason, "skipping invalid inbound packet");
                    continue;
                }
                summary.inbound += 1;
                let changed = plugin.on_packet_receiving(&mut packet);
                let reply = match &packet {
                    ClientPacket::Chat { text } if text.starts_with('/') => {
                        player_command(plugin, connection, text)
                    }
                    _ => Vec::new(),
                };
                write_record(
                    &mut out,
                    &ReplayRecord {
                        index,
                        direction: "inbound",
                        connection,
                        changed,
                        packet: ReplayPacket::Client(&packet),
                        reply,
                    },
                )?;
                summary.changed += usize::from(changed);
            }
        }
    }
    debug!(?summary, "replay finished");
    Ok(summary)
}

fn player_command(
    plugin: &mut DamageTooltipPlugin,
    connection: ConnectionId,
    text: &str,
) -> Vec<String> {
    match commands::parse_command(text) {
        Ok(cmd) => {
            commands::execute_command(plugin, CommandSender::Player(connection), cmd).lines
        }
        Err(err) => vec![err.to_string()],
    }
}

fn write_record(out: &mut impl Write, record: &ReplayRecord<'_>) -> Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::Arc;
    use tempfile::tempdir;

    const SAMPLE: &str = include_str!("../demos/replay_sample.json");

    #[test]
    fn sample_replay_annotates_and_strips() {
        let dir = tempdir().expect("temp dir");
        let bridged = Arc::new(BridgedConnections::new());
        let mut plugin = DamageTooltipPlugin::enable(
            dir.path().join("damagetooltipfix.toml"),
            "1.20.4",
            bridged.clone(),
        )
        .expect("plugin enables");
        let script = ReplayScript::from_json_str(SAMPLE).expect("sample parses");

        let mut buf = Vec::new();
        let summary = run(&mut plugin, &bridged, script, &mut buf).expect("replay runs");

        assert_eq!(
            summary,
            ReplaySummary {
                outbound: 2,
                inbound: 2,
                changed: 2,
            }
        );

        let records: Vec<Value> = String::from_utf8(buf)
            .expect("utf8 output")
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(records.len(), 4);

        let window_lore = &records[0]["packet"]["WindowItems"]["items"][1]["meta"]["lore"];
        // diamond axe: 8 + (3 * 0.5 + 0.5) + 1
        assert_eq!(window_lore[1], "\u{a7}9Actual Damage: 11");
        assert_eq!(records[1]["changed"], false);

        let inbound_meta = &records[2]["packet"]["SetCreativeSlot"]["item"]["meta"];
        assert_eq!(inbound_meta["lore"], serde_json::json!(["Heirloom"]));
        assert_eq!(inbound_meta["custom_data"], serde_json::json!({}));
        assert!(records[2].get("reply").is_none());

        assert_eq!(records[3]["changed"], false);
        assert_eq!(
            records[3]["reply"],
            serde_json::json!(["Only console can run this!"])
        );
    }

    #[test]
    fn rejects_malformed_scripts() {
        assert!(ReplayScript::from_json_str("{\"events\": 3}").is_err());
    }
}
