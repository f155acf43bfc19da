//! Query view exposed to the presentation layer.
//!
//! The engine's UI collaborator renders from this summary and never
//! touches internal state directly. Field names follow the wire protocol
//! (camelCase), matching the action payloads in [`crate::action`].

use crate::turn::{TurnPhase, TurnState};
use crate::types::{Color, TokenId};
use crate::geometry::Position;
use serde::Serialize;

/// One entry of the possible-move list shown to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PossibleMove {
    /// The movable token.
    pub token_id: TokenId,
    /// Where it currently stands (`None` while in base).
    pub current_position: Option<Position>,
}

/// Turn summary consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnSummary {
    /// Current phase of the turn machine.
    pub phase: TurnPhase,
    /// The active player.
    pub current_player: Color,
    /// The live roll, if one is being played out.
    pub dice_value: Option<u8>,
    /// Tokens the active player may move right now.
    pub possible_moves: Vec<PossibleMove>,
    /// Whether ROLL_DICE would be accepted.
    pub can_roll_dice: bool,
    /// Whether MAKE_MOVE would be accepted for some token.
    pub can_make_move: bool,
    /// Whether the last move earned the active player another roll.
    pub extra_turn_granted: bool,
    /// Whether the game has been decided.
    pub game_over: bool,
    /// The winning players, once decided.
    pub winners: Option<Vec<Color>>,
}

impl From<&TurnState> for TurnSummary {
    fn from(state: &TurnState) -> Self {
        let game = state.game();
        let game_over = game.is_game_over();
        let possible_moves = state
            .possible_moves()
            .iter()
            .map(|token_id| PossibleMove {
                token_id: *token_id,
                current_position: game
                    .current_player()
                    .token(*token_id)
                    .and_then(|token| token.position()),
            })
            .collect::<Vec<_>>();

        Self {
            phase: *state.phase(),
            current_player: game.current_player().color(),
            dice_value: *state.dice_value(),
            can_roll_dice: !game_over && *state.phase() == TurnPhase::WaitingForRoll,
            can_make_move: !game_over
                && *state.phase() == TurnPhase::WaitingForMove
                && !possible_moves.is_empty(),
            possible_moves,
            extra_turn_granted: *state.extra_turn_granted(),
            game_over,
            winners: game.winners().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::SequenceDice;
    use crate::action::Action;

    #[test]
    fn fresh_game_summary_offers_a_roll() {
        let state = TurnState::new_game();
        let summary = TurnSummary::from(&state);
        assert_eq!(summary.phase, TurnPhase::WaitingForRoll);
        assert_eq!(summary.current_player, Color::Red);
        assert!(summary.can_roll_dice);
        assert!(!summary.can_make_move);
        assert!(summary.possible_moves.is_empty());
        assert!(!summary.game_over);
        assert_eq!(summary.winners, None);
    }

    #[test]
    fn summary_serializes_with_wire_field_names() {
        let mut dice = SequenceDice::new([6]);
        let state = TurnState::new_game().dispatch(&Action::roll_sampled(), &mut dice);
        let json = serde_json::to_value(TurnSummary::from(&state)).unwrap();

        assert_eq!(json["phase"], "WAITING_FOR_MOVE");
        assert_eq!(json["currentPlayer"], "red");
        assert_eq!(json["diceValue"], 6);
        assert_eq!(json["canMakeMove"], true);
        assert_eq!(json["possibleMoves"][0]["tokenId"], "red-0");
        assert!(json["possibleMoves"][0]["currentPosition"].is_null());
        assert_eq!(json["gameOver"], false);
    }
}
