//! Capture resolution at a landing cell.

use crate::geometry::{Position, is_safe_cell};
use crate::types::{Color, Player, TokenId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Record of one opponent token sent back to base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct Capture {
    /// The captured token.
    pub token: TokenId,
    /// The cell it was captured on.
    pub at: Position,
}

/// Sends every capturable opponent token on `landing` back to base.
///
/// A token is capturable when it is out, not completed, not flagged safe,
/// and the landing cell itself is not a safe cell. All stacked victims are
/// resolved in the same pass. Tokens on a private home lane are never hit
/// here because no two colors' lane cells coincide in the board geometry —
/// a topological guarantee, not a runtime check.
///
/// Returns the updated players and the capture records, in player order.
#[instrument(level = "debug", skip(players))]
pub fn resolve_captures(
    players: &[Player; 4],
    moving_color: Color,
    landing: Position,
) -> ([Player; 4], Vec<Capture>) {
    if is_safe_cell(landing) {
        return (players.clone(), Vec::new());
    }

    let mut captures = Vec::new();
    let updated = players.clone().map(|player| {
        if player.color() == moving_color {
            return player;
        }
        let tokens = player.tokens().map(|token| {
            let victim = token.position() == Some(landing)
                && token.is_out()
                && !token.is_completed()
                && !token.is_safe();
            if victim {
                debug!(token = %token.id(), %landing, "capturing token");
                captures.push(Capture::new(token.id(), landing));
                token.returned_to_base()
            } else {
                token
            }
        });
        player.with_tokens(tokens)
    });

    (updated, captures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RING;
    use crate::types::Token;

    fn fresh_players() -> [Player; 4] {
        Color::TURN_ORDER.map(Player::starting)
    }

    fn place(players: &mut [Player; 4], color: Color, slot: u8, at: Position) {
        let idx = Color::TURN_ORDER
            .iter()
            .position(|c| *c == color)
            .unwrap();
        let token = Token::in_base(TokenId::new(color, slot)).placed(at, is_safe_cell(at), false);
        players[idx] = players[idx].with_token(token);
    }

    #[test]
    fn opponent_on_open_cell_is_captured() {
        let mut players = fresh_players();
        let cell = RING[5];
        assert!(!is_safe_cell(cell));
        place(&mut players, Color::Green, 0, cell);

        let (after, captures) = resolve_captures(&players, Color::Red, cell);
        assert_eq!(captures, vec![Capture::new(TokenId::new(Color::Green, 0), cell)]);
        let green = &after[1];
        assert_eq!(green.tokens()[0].position(), None);
        assert!(!green.tokens()[0].is_out());
        // Input untouched.
        assert_eq!(players[1].tokens()[0].position(), Some(cell));
    }

    #[test]
    fn stacked_opponents_are_all_captured_in_one_pass() {
        let mut players = fresh_players();
        let cell = RING[20];
        place(&mut players, Color::Green, 0, cell);
        place(&mut players, Color::Green, 1, cell);
        place(&mut players, Color::Yellow, 3, cell);

        let (after, captures) = resolve_captures(&players, Color::Red, cell);
        assert_eq!(captures.len(), 3);
        assert!(after[1].tokens()[0].position().is_none());
        assert!(after[1].tokens()[1].position().is_none());
        assert!(after[3].tokens()[3].position().is_none());
    }

    #[test]
    fn mover_own_tokens_are_never_captured() {
        let mut players = fresh_players();
        let cell = RING[7];
        place(&mut players, Color::Red, 0, cell);

        let (after, captures) = resolve_captures(&players, Color::Red, cell);
        assert!(captures.is_empty());
        assert_eq!(after, players);
    }

    #[test]
    fn safe_cells_shield_everyone() {
        let mut players = fresh_players();
        let start = Color::Green.start_tile();
        place(&mut players, Color::Green, 0, start);

        let (after, captures) = resolve_captures(&players, Color::Red, start);
        assert!(captures.is_empty());
        assert_eq!(after, players);
    }

    #[test]
    fn tokens_elsewhere_are_untouched() {
        let mut players = fresh_players();
        place(&mut players, Color::Green, 0, RING[10]);

        let (after, captures) = resolve_captures(&players, Color::Red, RING[11]);
        assert!(captures.is_empty());
        assert_eq!(after, players);
    }
}
