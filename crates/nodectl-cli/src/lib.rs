//! # nodectl Console
//!
//! Interactive administration console for a long-running blockchain node
//! daemon. Operator commands typed at the prompt are tokenized, dispatched
//! through an ordered command registry, executed as RPC calls against the
//! daemon's HTTP control interface, and rendered as human-readable output.
//!
//! ## Architecture
//!
//! - [`registry`]: ordered command table with arity contracts and help text
//! - [`console`]: the read-dispatch-render loop and session state
//! - [`commands`]: one handler per administrative operation, built on
//!   `nodectl_client::RpcExecutor`
//!
//! A session holds one executor for one fixed daemon address; commands run
//! strictly one at a time, and a failed command never terminates the loop.

pub mod commands;
pub mod console;
pub mod registry;

pub use console::{CommandServer, ConsoleSession, Outcome, ServerState};
pub use registry::{default_registry, Command, CommandRegistry};
