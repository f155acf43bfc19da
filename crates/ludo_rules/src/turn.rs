//! The turn state machine.
//!
//! One turn flows `WaitingForRoll → WaitingForMove → TurnEnd` and loops,
//! or jumps straight from roll to turn end when a roll yields no legal
//! move. The machine has no terminal state of its own; callers check
//! [`GameState::is_game_over`] after every transition.
//!
//! Dispatch is a pure transition: it takes the current state and an
//! action and returns a new state, never mutating its input. Illegal and
//! malformed actions are absorbed — the returned state is structurally
//! equal to the input — and the caller decides whether "nothing changed"
//! needs user feedback.

use crate::action::{Action, AppliedAction};
use crate::capture;
use crate::dice::{DiceSource, RollClass, is_valid_roll};
use crate::movement;
use crate::state::GameState;
use crate::types::TokenId;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Phase of the active turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnPhase {
    /// The active player has not rolled yet.
    WaitingForRoll,
    /// A roll produced at least one legal move; waiting for the choice.
    WaitingForMove,
    /// The turn is over; any action hands off (or keeps the extra turn).
    TurnEnd,
}

/// State of the machine for the turn in progress.
///
/// `possible_moves` is recomputed on every roll, never cached across
/// phases. The action history records accepted actions only, with rolls
/// stored resolved so a recorded game replays without a dice source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct TurnState {
    /// The authoritative game snapshot.
    game: GameState,
    /// Current phase.
    phase: TurnPhase,
    /// The roll being played out, while one is live.
    dice_value: Option<u8>,
    /// Tokens of the active player that may move on the live roll.
    possible_moves: Vec<TokenId>,
    /// Accepted actions since the game started.
    action_history: Vec<AppliedAction>,
    /// Whether the move just played earned the active player another roll.
    extra_turn_granted: bool,
}

impl TurnState {
    /// A machine over a fresh game, waiting for Red's first roll.
    pub fn new_game() -> Self {
        Self::from_game(GameState::new_game())
    }

    /// A machine over an existing snapshot, waiting for a roll.
    pub fn from_game(game: GameState) -> Self {
        Self {
            game,
            phase: TurnPhase::WaitingForRoll,
            dice_value: None,
            possible_moves: Vec::new(),
            action_history: Vec::new(),
            extra_turn_granted: false,
        }
    }

    /// Applies one action, returning the next state.
    ///
    /// The transition table:
    ///
    /// | phase          | action                       | next phase |
    /// |----------------|------------------------------|------------|
    /// | WaitingForRoll | RollDice                     | WaitingForMove, or TurnEnd when no move is legal |
    /// | WaitingForMove | MakeMove (id in possible set)| WaitingForRoll on an extra turn, else TurnEnd |
    /// | TurnEnd        | any                          | WaitingForRoll (player advanced, or kept on an extra turn) |
    ///
    /// Every other (phase, action) pair is ignored: the returned state is
    /// structurally equal to `self`.
    #[instrument(
        level = "debug",
        skip(self, dice),
        fields(phase = %self.phase, player = %self.game.current_player().color())
    )]
    pub fn dispatch<D: DiceSource>(&self, action: &Action, dice: &mut D) -> Self {
        let next = match (self.phase, action) {
            (TurnPhase::WaitingForRoll, Action::RollDice { value }) => {
                self.roll_dice(*value, dice)
            }
            (TurnPhase::WaitingForMove, Action::MakeMove { token_id }) => {
                self.play_move(*token_id)
            }
            (TurnPhase::TurnEnd, _) => self.finish_turn(action),
            _ => {
                debug!(?action, "action not legal in current phase, ignoring");
                self.clone()
            }
        };

        #[cfg(debug_assertions)]
        if let Err(violations) = crate::invariants::check_game_state(&next.game) {
            panic!("dispatch broke game invariants: {violations:?}");
        }

        next
    }

    /// Parses and applies an action from its JSON wire form.
    ///
    /// A malformed payload is absorbed like any other invalid input: the
    /// returned state is structurally equal to `self`.
    pub fn dispatch_json<D: DiceSource>(&self, json: &str, dice: &mut D) -> Self {
        match Action::parse(json) {
            Ok(action) => self.dispatch(&action, dice),
            Err(error) => {
                debug!(%error, "ignoring malformed action");
                self.clone()
            }
        }
    }

    /// Rebuilds a state by dispatching `actions` over a fresh game.
    ///
    /// Histories recorded by this machine carry resolved roll values, so
    /// replaying one never consults `dice`.
    pub fn replay<D: DiceSource>(actions: &[Action], dice: &mut D) -> Self {
        actions
            .iter()
            .fold(Self::new_game(), |state, action| state.dispatch(action, dice))
    }

    /// One-line human-readable status, for logs and CLIs.
    pub fn status_string(&self) -> String {
        if let Some(winners) = self.game.winners() {
            let names: Vec<String> = winners.iter().map(ToString::to_string).collect();
            return format!("Game over. Winner: {}", names.join(", "));
        }
        let player = self.game.current_player().color();
        match self.phase {
            TurnPhase::WaitingForRoll if self.extra_turn_granted => {
                format!("{player} rolls again (extra turn)")
            }
            TurnPhase::WaitingForRoll => format!("{player} to roll"),
            TurnPhase::WaitingForMove => format!(
                "{player} rolled {}; {} movable token(s)",
                self.dice_value.unwrap_or_default(),
                self.possible_moves.len()
            ),
            TurnPhase::TurnEnd => format!("{player}'s turn is ending"),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Accepted transitions
    // ─────────────────────────────────────────────────────────────

    fn roll_dice<D: DiceSource>(&self, injected: Option<u8>, dice: &mut D) -> Self {
        let value = injected.unwrap_or_else(|| dice.sample());
        if !is_valid_roll(value) {
            warn!(value, "injected roll out of range, ignoring");
            return self.clone();
        }

        let movers = movement::movable_tokens(self.game.current_player(), value);
        let phase = if movers.is_empty() {
            TurnPhase::TurnEnd
        } else {
            TurnPhase::WaitingForMove
        };
        debug!(value, movable = movers.len(), next_phase = %phase, "dice rolled");

        self.accepted(
            self.game.with_roll(value),
            phase,
            Some(value),
            movers,
            false,
            Action::roll(value),
        )
    }

    fn play_move(&self, token_id: TokenId) -> Self {
        if !self.possible_moves.contains(&token_id) {
            debug!(%token_id, "token not in possible moves, ignoring");
            return self.clone();
        }
        let Some(value) = self.dice_value else {
            debug!("no live roll, ignoring move");
            return self.clone();
        };
        let player = self.game.current_player();
        let Some(token) = player.token(token_id) else {
            debug!(%token_id, "token does not belong to active player, ignoring");
            return self.clone();
        };

        let moved = movement::apply_move(token, value);
        if moved == *token {
            // Possible-move sets exclude no-op moves; absorb defensively.
            debug!(%token_id, "move resolved to no movement, ignoring");
            return self.clone();
        }

        let color = player.color();
        let completed = moved.is_completed();
        let game = self
            .game
            .with_player_tokens(color, *player.with_token(moved).tokens());

        let (players, captures) = match (completed, moved.position()) {
            (false, Some(landing)) => capture::resolve_captures(game.players(), color, landing),
            _ => (game.players().clone(), Vec::new()),
        };
        let game = game
            .with_players(players)
            .with_captures(captures.clone())
            .evaluate_win_state();

        let extra_turn = RollClass::classify(value).grants_extra_turn_candidate
            || !captures.is_empty()
            || completed;
        info!(
            %token_id,
            landing = ?moved.position(),
            captures = captures.len(),
            completed,
            extra_turn,
            "move applied"
        );

        if extra_turn {
            // Straight back to the roll phase: roll scratch cleared, the
            // player and the capture record kept.
            self.accepted(
                game,
                TurnPhase::WaitingForRoll,
                None,
                Vec::new(),
                true,
                Action::make_move(token_id),
            )
        } else {
            self.accepted(
                game,
                TurnPhase::TurnEnd,
                Some(value),
                Vec::new(),
                false,
                Action::make_move(token_id),
            )
        }
    }

    fn finish_turn(&self, trigger: &Action) -> Self {
        let game = if self.extra_turn_granted {
            self.game.cleared_for_extra_turn()
        } else {
            self.game.advance_player()
        };
        info!(next_player = %game.current_player().color(), "turn handed off");
        self.accepted(
            game,
            TurnPhase::WaitingForRoll,
            None,
            Vec::new(),
            false,
            *trigger,
        )
    }

    /// Builds the successor state for an accepted action, appending the
    /// history record. The recorded player and turn are taken from the
    /// state the action was accepted in.
    fn accepted(
        &self,
        game: GameState,
        phase: TurnPhase,
        dice_value: Option<u8>,
        possible_moves: Vec<TokenId>,
        extra_turn_granted: bool,
        action: Action,
    ) -> Self {
        let mut action_history = self.action_history.clone();
        action_history.push(AppliedAction::new(
            *self.game.turn_count(),
            self.game.current_player().color(),
            action,
            phase,
        ));
        Self {
            game,
            phase,
            dice_value,
            possible_moves,
            action_history,
            extra_turn_granted,
        }
    }
}
