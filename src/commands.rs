//! Console command parsing and dispatch.

use std::fmt;

use tooltipfix_net::ConnectionId;

use crate::plugin::DamageTooltipPlugin;

/// Console command that reloads the damage line template.
pub const RELOAD_COMMAND: &str = "reloaddamagetooltipfix";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

/// Who issued a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSender {
    Console,
    Player(ConnectionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginCommand {
    Help,
    Reload,
    Stop,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub lines: Vec<String>,
}

pub fn execute_command(
    plugin: &mut DamageTooltipPlugin,
    sender: CommandSender,
    cmd: PluginCommand,
) -> CommandOutput {
    let mut out = CommandOutput::default();
    match cmd {
        PluginCommand::Help => {
            out.lines.push(format!("/{RELOAD_COMMAND} - reload the damage line template"));
            out.lines.push("/stop - shut down".to_string());
        }
        PluginCommand::Reload | PluginCommand::Stop if sender != CommandSender::Console => {
            out.lines.push("Only console can run this!".to_string());
        }
        PluginCommand::Reload => {
            plugin.reload();
            out.lines.push("Reloaded config!".to_string());
        }
        PluginCommand::Stop => {
            out.lines.push("Stopping".to_string());
        }
    }
    out
}

pub fn parse_command(input: &str) -> Result<PluginCommand, CommandError> {
    let input = input.trim();
    let input = input.strip_prefix('/').unwrap_or(input).trim();
    if input.is_empty() {
        return Ok(PluginCommand::Help);
    }

    let cmd = input
        .split_whitespace()
        .next()
        .ok_or_else(|| CommandError::new("Missing command"))?
        .to_ascii_lowercase();

    match cmd.as_str() {
        "help" | "?" => Ok(PluginCommand::Help),
        RELOAD_COMMAND => Ok(PluginCommand::Reload),
        "stop" => Ok(PluginCommand::Stop),
        _ => Err(CommandError::new(format!("Unknown command: {cmd}. Try /help"))),
    }
}
