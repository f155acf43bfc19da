//! Command-line interface for the Ludo self-play harness.

use clap::{Parser, Subcommand};

/// Ludo rules engine — seeded self-play harness.
#[derive(Parser, Debug)]
#[command(name = "ludo")]
#[command(about = "Seeded self-play harness for the Ludo rules engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play games to completion with seeded dice and random move choice
    Play {
        /// Seed for dice and move selection; entropy when omitted
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of games to play (seeds increment per game)
        #[arg(short, long, default_value = "1")]
        games: u32,

        /// Safety cap on dispatched actions per game
        #[arg(long, default_value = "100000")]
        max_actions: u64,

        /// Print each game's final turn summary as JSON
        #[arg(long)]
        json: bool,
    },
}
