//! Relay CLI

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};
pub use {chat::ChatCmd, config::Config, render::Terminal};

mod chat;
mod config;
mod render;

/// Relay CLI
#[derive(Debug, Parser)]
#[command(name = "relay", version, about)]
pub struct App {
    /// Verbosity level (use -v, -vv, -vvv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chat with an LLM that can call the builtin functions
    Chat(chat::ChatCmd),

    /// Generate the configuration file
    Generate,

    /// List the functions the model can call
    Functions,
}

impl App {
    /// The log filter used when `RUST_LOG` is unset
    pub fn directive(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "relay=debug",
            2 => "relay=trace",
            3 => "debug",
            _ => "trace",
        }
    }

    /// Initialize tracing subscriber based on verbosity
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.directive()));

        fmt()
            .without_time()
            .with_env_filter(filter)
            .with_target(self.verbose != 0)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Print the name and description of every builtin function.
pub fn list_functions() {
    for builtin in functions::Builtin::ALL {
        let function = builtin.function();
        println!("{:<28} {}", function.name.as_str(), function.description);
    }
}
