//! Ordered command registry.
//!
//! Maps a command name to its handler tag, arity contract and one-line help
//! text. Registration order is the help-listing order the operator sees; that
//! ordering is part of the console's documented surface, so `list` iterates
//! in insertion order. Re-registering a name replaces the earlier entry in
//! place (last registration wins, position preserved).

use std::collections::HashMap;

use thiserror::Error;

use crate::commands::CommandKind;

/// A registered console command.
#[derive(Debug, Clone)]
pub struct Command {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    pub kind: CommandKind,
    pub help: &'static str,
}

/// Argument-count violation, naming the command and its declared range.
#[derive(Error, Debug, PartialEq)]
#[error("wrong number of arguments for '{command}': expected {min} to {max}, got {got}")]
pub struct ArityError {
    pub command: String,
    pub min: usize,
    pub max: usize,
    pub got: usize,
}

impl Command {
    pub fn validate_arity(&self, arg_count: usize) -> Result<(), ArityError> {
        if arg_count < self.min_args || arg_count > self.max_args {
            return Err(ArityError {
                command: self.name.to_string(),
                min: self.min_args,
                max: self.max_args,
                got: arg_count,
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        match self.index.get(command.name) {
            Some(&position) => self.commands[position] = command,
            None => {
                self.index.insert(command.name, self.commands.len());
                self.commands.push(command);
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Command> {
        self.index.get(name).map(|&position| &self.commands[position])
    }

    /// Commands in registration order.
    pub fn list(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// The full console command table, in the order `help` lists it.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    let commands = [
        Command {
            name: "help",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::Help,
            help: "Show this help",
        },
        Command {
            name: "status",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::Status,
            help: "Show daemon status summary",
        },
        Command {
            name: "print_height",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::PrintHeight,
            help: "Print local blockchain height",
        },
        Command {
            name: "print_pl",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::PrintPeerList,
            help: "Print peer list",
        },
        Command {
            name: "print_cn",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::PrintConnections,
            help: "Print active connections",
        },
        Command {
            name: "print_bc",
            min_args: 1,
            max_args: 2,
            kind: CommandKind::PrintBlockchain,
            help: "Print blockchain info in a given blocks range, print_bc <start> [end]",
        },
        Command {
            name: "print_block",
            min_args: 1,
            max_args: 1,
            kind: CommandKind::PrintBlock,
            help: "Print block, print_block <hash | height>",
        },
        Command {
            name: "print_tx",
            min_args: 1,
            max_args: 1,
            kind: CommandKind::PrintTransaction,
            help: "Print transaction, print_tx <transaction hash>",
        },
        Command {
            name: "print_pool",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::PrintPool,
            help: "Print transaction pool (long format)",
        },
        Command {
            name: "print_pool_sh",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::PrintPoolShort,
            help: "Print transaction pool (short format)",
        },
        Command {
            name: "show_hr",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::ShowHashRate,
            help: "Start showing hash rate",
        },
        Command {
            name: "hide_hr",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::HideHashRate,
            help: "Stop showing hash rate",
        },
        Command {
            name: "show_diff",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::ShowDifficulty,
            help: "Show current difficulty",
        },
        Command {
            name: "save_bc",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::SaveBlockchain,
            help: "Save blockchain to disk",
        },
        Command {
            name: "set_log",
            min_args: 1,
            max_args: 1,
            kind: CommandKind::SetLogLevel,
            help: "Change daemon log level, set_log <level 0-4>",
        },
        Command {
            name: "start_mining",
            min_args: 2,
            max_args: 2,
            kind: CommandKind::StartMining,
            help: "Start mining, start_mining <address> <threads>",
        },
        Command {
            name: "stop_mining",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::StopMining,
            help: "Stop mining",
        },
        Command {
            name: "stop_daemon",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::StopDaemon,
            help: "Ask the daemon to shut down",
        },
        Command {
            name: "exit",
            min_args: 0,
            max_args: 0,
            kind: CommandKind::Exit,
            help: "Leave the console",
        },
    ];
    for command in commands {
        registry.register(command);
    }
    registry
}
