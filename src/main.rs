//! tooltipfix - bridged-client damage tooltips
//!
//! Headless host: enables the plugin against a server version, then either
//! replays recorded packet events or serves console commands from stdin.

mod commands;
mod config;
mod plugin;
mod replay;

use anyhow::{Context, Result};
use commands::{CommandSender, PluginCommand};
use plugin::DamageTooltipPlugin;
use std::io::{self, BufRead};
use std::{env, path::PathBuf, sync::Arc};
use tooltipfix_net::{BridgedConnections, ConnectionId};
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize tracing with INFO level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    info!("Starting tooltipfix v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let bridged = Arc::new(BridgedConnections::new());
    for connection in &cli.bridged {
        bridged.insert(*connection);
    }

    let mut plugin =
        DamageTooltipPlugin::enable(&cli.config_path, &cli.server_version, bridged.clone())
            .context("damage tooltips stay disabled")?;
    info!(
        "Server {} uses {:?} damage formula",
        plugin.version(),
        plugin.variant()
    );

    if let Some(path) = &cli.replay {
        let script = replay::ReplayScript::load(path)?;
        let summary = replay::run(&mut plugin, &bridged, script, io::stdout().lock())?;
        info!(
            outbound = summary.outbound,
            inbound = summary.inbound,
            changed = summary.changed,
            "Replay complete"
        );
        return Ok(());
    }

    run_console(&mut plugin)
}

fn run_console(plugin: &mut DamageTooltipPlugin) -> Result<()> {
    info!("Reading console commands from stdin (try /help)");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let cmd = match commands::parse_command(&line) {
            Ok(cmd) => cmd,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        let out = commands::execute_command(plugin, CommandSender::Console, cmd);
        for line in out.lines {
            println!("{line}");
        }
        if cmd == PluginCommand::Stop {
            break;
        }
    }
    Ok(())
}

struct CliOptions {
    config_path: PathBuf,
    server_version: String,
    replay: Option<PathBuf>,
    bridged: Vec<ConnectionId>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            config_path: PathBuf::from(config::DEFAULT_CONFIG_PATH),
            server_version: "1.20.4".to_string(),
            replay: None,
            bridged: Vec::new(),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => match args.next() {
                    Some(path) => opts.config_path = PathBuf::from(path),
                    None => warn!("--config requires a path"),
                },
                "--server-version" => match args.next() {
                    Some(version) => opts.server_version = version,
                    None => warn!("--server-version requires a value"),
                },
                "--replay" => match args.next() {
                    Some(path) => opts.replay = Some(PathBuf::from(path)),
                    None => warn!("--replay requires a path"),
                },
                "--bridged" => match args.next().map(|id| (id.parse::<ConnectionId>(), id)) {
                    Some((Ok(connection), _)) => opts.bridged.push(connection),
                    Some((Err(err), id)) => warn!("Ignoring --bridged {id}: {err}"),
                    None => warn!("--bridged requires a connection id"),
                },
                other => warn!("Ignoring unknown argument {other}"),
            }
        }
        opts
    }
}
