//! Ludo self-play harness.
//!
//! Drives the rules engine to completion with a seeded dice source and a
//! seeded move chooser, so a given seed always reproduces the same game.
//! Useful as a smoke test and as a demonstration of the action-dispatch
//! contract; it renders nothing.

#![warn(missing_docs)]

mod cli;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use ludo_rules::{Action, RngDice, TurnPhase, TurnState, TurnSummary};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Play {
            seed,
            games,
            max_actions,
            json,
        } => play(seed, games, max_actions, json),
    }
}

fn play(seed: Option<u64>, games: u32, max_actions: u64, json: bool) -> Result<()> {
    for offset in 0..games {
        let game_seed = seed
            .map(|s| s.wrapping_add(offset as u64))
            .unwrap_or_else(rand::random);
        run_game(game_seed, max_actions, json)?;
    }
    Ok(())
}

fn run_game(seed: u64, max_actions: u64, json: bool) -> Result<()> {
    info!(seed, "starting game");
    let mut dice = RngDice::seeded(seed);
    // Independent stream for move selection, so dice replay is unaffected
    // by how moves are chosen.
    let mut chooser = StdRng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);

    let mut state = TurnState::new_game();
    let mut dispatched: u64 = 0;

    while !state.game().is_game_over() {
        if dispatched >= max_actions {
            bail!("game did not finish within {max_actions} actions (seed {seed})");
        }
        let action = match state.phase() {
            TurnPhase::WaitingForRoll => Action::roll_sampled(),
            TurnPhase::WaitingForMove => match state.possible_moves().choose(&mut chooser) {
                Some(token_id) => Action::make_move(*token_id),
                None => bail!("waiting for a move with no possible moves (seed {seed})"),
            },
            TurnPhase::TurnEnd => Action::EndTurn,
        };
        state = state.dispatch(&action, &mut dice);
        dispatched += 1;
        debug!(dispatched, status = %state.status_string(), "dispatched action");
    }

    info!(
        seed,
        dispatched,
        turns = state.game().turn_count(),
        status = %state.status_string(),
        "game finished"
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&TurnSummary::from(&state))?
        );
    } else {
        println!("{}", state.status_string());
    }
    Ok(())
}
