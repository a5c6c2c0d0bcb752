//! The interactive console loop.
//!
//! A [`CommandServer`] reads one line at a time, tokenizes it, resolves the
//! command in the registry, validates arity, and runs the handler to
//! completion before reading the next line. There is deliberately no
//! concurrent execution: the session's transport is the one shared resource,
//! and one command at a time keeps RPC calls from interleaving on it.
//!
//! Dispatch failures (unknown command, bad arity, handler errors) are
//! rendered to the operator and the server returns to [`ServerState::Idle`];
//! only `exit` ends the loop.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};

use nodectl_client::RpcExecutor;

use crate::commands::{self, CommandKind};
use crate::registry::CommandRegistry;

/// Process-wide console state: the executor (and through it the transport
/// handle) for one fixed daemon address, created once at startup.
pub struct ConsoleSession {
    executor: RpcExecutor,
}

impl ConsoleSession {
    pub fn new(executor: RpcExecutor) -> Self {
        ConsoleSession { executor }
    }

    pub fn executor(&self) -> &RpcExecutor {
        &self.executor
    }
}

/// Whether a handler is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Idle,
    Executing,
}

/// Result of dispatching one input line.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The rendered output (or error report) for this line; keep reading.
    Continue(String),
    /// The operator asked to leave the console.
    Exit,
}

pub struct CommandServer {
    session: ConsoleSession,
    registry: CommandRegistry,
    state: ServerState,
}

impl CommandServer {
    pub fn new(session: ConsoleSession, registry: CommandRegistry) -> Self {
        CommandServer {
            session,
            registry,
            state: ServerState::Idle,
        }
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// `name<TAB>help` for every registered command, in registration order.
    pub fn render_help(&self) -> String {
        let lines: Vec<String> = self
            .registry
            .list()
            .map(|command| format!("{}\t{}", command.name, command.help))
            .collect();
        lines.join("\n")
    }

    /// Tokenizes and executes one input line to completion.
    ///
    /// Every path through this function leaves the server in
    /// [`ServerState::Idle`], ready for the next line.
    pub async fn dispatch(&mut self, line: &str) -> Outcome {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let Some((name, args)) = tokens.split_first() else {
            return Outcome::Continue("no command entered; type 'help' for the command list".into());
        };

        let (kind, arity) = match self.registry.lookup(name) {
            Some(command) => (command.kind, command.validate_arity(args.len())),
            None => return Outcome::Continue(format!("unknown command: {name}")),
        };
        if let Err(e) = arity {
            return Outcome::Continue(e.to_string());
        }

        match kind {
            CommandKind::Help => Outcome::Continue(self.render_help()),
            CommandKind::Exit => Outcome::Exit,
            kind => {
                self.state = ServerState::Executing;
                let result = commands::run(kind, &self.session, args).await;
                self.state = ServerState::Idle;
                match result {
                    Ok(output) => Outcome::Continue(output),
                    Err(e) => Outcome::Continue(e.to_string()),
                }
            }
        }
    }

    /// Reads stdin line by line until EOF or an `exit` command.
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        prompt();
        while let Some(line) = lines.next_line().await? {
            match self.dispatch(&line).await {
                Outcome::Continue(output) => {
                    if !output.is_empty() {
                        println!("{output}");
                    }
                }
                Outcome::Exit => break,
            }
            prompt();
        }
        Ok(())
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
