//! The authoritative game snapshot and its pure transitions.
//!
//! `GameState` is an immutable value: every transition constructs a new
//! snapshot by structural copy and never mutates its input. The turn state
//! machine owns the current snapshot between turns; everything here just
//! computes the next one.

use crate::capture::Capture;
use crate::types::{Color, Player, TOKENS_PER_PLAYER, Token};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Number of players in a game.
pub const PLAYER_COUNT: usize = 4;

/// The complete game snapshot between transitions.
///
/// Invariants: `current_player_index < 4`; the game is over exactly when
/// `winners` is set; `winners` lists only players all four of whose tokens
/// are completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameState {
    /// The four players in turn order.
    players: [Player; PLAYER_COUNT],
    /// Index of the active player.
    current_player_index: usize,
    /// Completed turns (increments on hand-off, not on extra turns).
    turn_count: u32,
    /// Winning players, set once some player completes all four tokens.
    winners: Option<Vec<Color>>,
    /// The most recent dice roll, if any.
    last_dice_roll: Option<u8>,
    /// Captures made by the most recent move (empty when none).
    last_captures: Vec<Capture>,
}

impl GameState {
    /// A fresh game: all tokens in base, Red to act, turn zero.
    #[instrument]
    pub fn new_game() -> Self {
        info!("creating new game");
        Self {
            players: Color::TURN_ORDER.map(Player::starting),
            current_player_index: 0,
            turn_count: 0,
            winners: None,
            last_dice_roll: None,
            last_captures: Vec::new(),
        }
    }

    /// The active player.
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    /// The player of the given color.
    pub fn player(&self, color: Color) -> &Player {
        // TURN_ORDER matches the players array by construction.
        &self.players[Color::TURN_ORDER
            .iter()
            .position(|c| *c == color)
            .unwrap_or(0)]
    }

    /// Whether the game has been decided.
    pub fn is_game_over(&self) -> bool {
        self.winners.is_some()
    }

    /// Copy with the active player advanced (mod 4) and the turn counter
    /// incremented. Per-move scratch (`last_dice_roll`, `last_captures`)
    /// is cleared for the incoming player.
    pub fn advance_player(&self) -> Self {
        Self {
            players: self.players.clone(),
            current_player_index: (self.current_player_index + 1) % PLAYER_COUNT,
            turn_count: self.turn_count + 1,
            winners: self.winners.clone(),
            last_dice_roll: None,
            last_captures: Vec::new(),
        }
    }

    /// Copy with the per-move scratch cleared but the active player kept.
    /// Used when an extra turn keeps the same player rolling.
    pub fn cleared_for_extra_turn(&self) -> Self {
        Self {
            last_dice_roll: None,
            last_captures: Vec::new(),
            ..self.clone()
        }
    }

    /// Copy with the given roll recorded.
    pub fn with_roll(&self, value: u8) -> Self {
        Self {
            last_dice_roll: Some(value),
            ..self.clone()
        }
    }

    /// Copy with all four players replaced.
    pub fn with_players(&self, players: [Player; PLAYER_COUNT]) -> Self {
        Self {
            players,
            ..self.clone()
        }
    }

    /// Copy with one player's tokens replaced.
    pub fn with_player_tokens(&self, color: Color, tokens: [Token; TOKENS_PER_PLAYER]) -> Self {
        let players = self.players.clone().map(|player| {
            if player.color() == color {
                player.with_tokens(tokens)
            } else {
                player
            }
        });
        self.with_players(players)
    }

    /// Copy with the most recent move's captures recorded.
    pub fn with_captures(&self, captures: Vec<Capture>) -> Self {
        Self {
            last_captures: captures,
            ..self.clone()
        }
    }

    /// Copy with the win state recomputed from token completion.
    ///
    /// `winners` becomes the list of players whose four tokens are all
    /// completed; it stays `None` while there is no such player.
    #[instrument(level = "debug", skip(self))]
    pub fn evaluate_win_state(&self) -> Self {
        let winners: Vec<Color> = self
            .players
            .iter()
            .filter(|player| player.has_won())
            .map(Player::color)
            .collect();
        let winners = if winners.is_empty() {
            None
        } else {
            info!(?winners, "game decided");
            Some(winners)
        };
        Self {
            winners,
            ..self.clone()
        }
    }
}
