//! Command-line interface for the tournament server.

use clap::{Parser, Subcommand};

/// Ultimate Cup - tournament management server
/// Teams, players, fixtures, and per-year team ratings.
#[derive(Parser)]
#[command(name = "ultimatecup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server
    #[command(alias = "run", alias = "-s")]
    Serve,

    /// Create the schema and load the sample tournament data
    Seed,

    /// Create a default config file
    #[command(alias = "--init")]
    Init,
}
