//! The movement engine: legality and effect of advancing a token.
//!
//! Every function here is pure. Board geometry is read, never written;
//! tokens go in by reference and come out as new values. Positions that
//! cannot be resolved (off-ring, off-lane) are treated as "no movement"
//! rather than an error, per the engine's absorb-invalid-input policy.

use crate::dice::RollClass;
use crate::geometry::{
    self, CENTER, HOME_LANE_LEN, Position, RING, RING_LEN, is_safe_cell,
};
use crate::types::{Color, Player, Token, TokenId};
use tracing::instrument;

/// Steps from the home-entry cell to the center: the six lane cells plus
/// the center itself. A move must land on the center exactly.
const STEPS_PAST_ENTRY_TO_CENTER: usize = HOME_LANE_LEN + 1;

/// One semantically distinct move available to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMove {
    /// Leave base onto the owner's start cell (requires a six).
    ExitBase {
        /// The start cell the token is placed on.
        to: Position,
    },
    /// Advance along the ring and/or home lane.
    Advance {
        /// Cell the token stands on now.
        from: Position,
        /// Cell the token would land on.
        to: Position,
    },
}

impl TokenMove {
    /// The destination cell of this move.
    pub fn destination(&self) -> Position {
        match self {
            TokenMove::ExitBase { to } | TokenMove::Advance { to, .. } => *to,
        }
    }
}

/// Whether `token` may leave its base on this roll.
pub fn can_exit_base(token: &Token, dice_value: u8) -> bool {
    !token.is_out() && RollClass::classify(dice_value).allows_base_exit
}

/// Computes where a token at `current` lands after `steps` forward steps.
///
/// Returns the input unchanged when there is no movement: `steps == 0`, a
/// base token (`None`), an overshoot past the center, or a position found
/// on neither the ring nor `color`'s home lane.
///
/// The home-entry cell is always ahead of the current ring cell in
/// traversal order, even when its index is numerically smaller; the
/// modular distance below makes the handoff independent of where on the
/// ring the entry point falls.
#[instrument(level = "trace", ret)]
pub fn next_position(current: Option<Position>, steps: usize, color: Color) -> Option<Position> {
    let Some(from) = current else {
        return current;
    };
    if steps == 0 {
        return current;
    }

    if let Some(ring_idx) = geometry::ring_index_of(from) {
        let steps_to_entry = (color.entry_index() + RING_LEN - ring_idx) % RING_LEN;
        if steps <= steps_to_entry {
            // Stays on the ring; landing exactly on the entry cell when equal.
            return Some(RING[(ring_idx + steps) % RING_LEN]);
        }
        let remaining = steps - steps_to_entry;
        return match remaining {
            r if r < STEPS_PAST_ENTRY_TO_CENTER => Some(color.home_lane()[r - 1]),
            STEPS_PAST_ENTRY_TO_CENTER => Some(CENTER),
            // Overshoots the center: not a legal destination.
            _ => current,
        };
    }

    if let Some(lane_idx) = geometry::home_lane_index_of(color, from) {
        let target = lane_idx + steps;
        return match target {
            t if t < HOME_LANE_LEN => Some(color.home_lane()[t]),
            HOME_LANE_LEN => Some(CENTER),
            _ => current,
        };
    }

    // Lookup miss: neither ring nor own lane. No movement.
    current
}

/// Applies a roll to a token, returning the moved token.
///
/// A base token exits onto its start cell when the roll allows it; any
/// other token advances via [`next_position`]. The result is marked
/// completed exactly when it lands on the center, and safe when completed
/// or standing on a safe cell. A token with no legal destination (or a
/// completed token) comes back unchanged.
#[instrument(level = "debug", skip(token), fields(token = %token.id()), ret)]
pub fn apply_move(token: &Token, dice_value: u8) -> Token {
    if token.is_completed() {
        return *token;
    }

    if !token.is_out() {
        if !can_exit_base(token, dice_value) {
            return *token;
        }
        let start = token.color().start_tile();
        return token.placed(start, is_safe_cell(start), false);
    }

    let destination = next_position(token.position(), dice_value as usize, token.color());
    match destination {
        Some(to) if destination != token.position() => {
            let completed = to == CENTER;
            token.placed(to, completed || is_safe_cell(to), completed)
        }
        _ => *token,
    }
}

/// The set of semantically distinct moves available to one token.
///
/// Empty when the token is completed, when a base token lacks a six, or
/// when the computed destination equals the current position (the
/// overshoot / lookup-miss case). An overshoot is excluded here, never
/// clamped to the entry cell or the lane boundary.
pub fn valid_moves(token: &Token, dice_value: u8) -> Vec<TokenMove> {
    if token.is_completed() {
        return Vec::new();
    }

    if !token.is_out() {
        if can_exit_base(token, dice_value) {
            return vec![TokenMove::ExitBase {
                to: token.color().start_tile(),
            }];
        }
        return Vec::new();
    }

    let current = token.position();
    match (current, next_position(current, dice_value as usize, token.color())) {
        (Some(from), Some(to)) if from != to => vec![TokenMove::Advance { from, to }],
        _ => Vec::new(),
    }
}

/// Whether any of the player's four tokens can move on this roll.
pub fn has_valid_moves(player: &Player, dice_value: u8) -> bool {
    player
        .tokens()
        .iter()
        .any(|token| !valid_moves(token, dice_value).is_empty())
}

/// Ids of the player's tokens that can move on this roll, in slot order.
pub fn movable_tokens(player: &Player, dice_value: u8) -> Vec<TokenId> {
    player
        .tokens()
        .iter()
        .filter(|token| !valid_moves(token, dice_value).is_empty())
        .map(Token::id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    fn out_token(color: Color, slot: u8, at: Position) -> Token {
        Token::in_base(TokenId::new(color, slot)).placed(at, is_safe_cell(at), false)
    }

    #[test]
    fn zero_steps_and_base_tokens_do_not_move() {
        assert_eq!(next_position(None, 5, Color::Red), None);
        let start = Color::Red.start_tile();
        assert_eq!(next_position(Some(start), 0, Color::Red), Some(start));
    }

    #[test]
    fn plain_ring_advance() {
        // Red start is ring index 1; two steps land on index 3.
        let from = RING[1];
        assert_eq!(next_position(Some(from), 2, Color::Red), Some(RING[3]));
    }

    #[test]
    fn ring_advance_wraps_past_index_zero() {
        // Green entry is index 12, so a green token at index 50 stays on
        // the ring for short hops and must wrap through index 0.
        let from = RING[50];
        assert_eq!(next_position(Some(from), 3, Color::Green), Some(RING[1]));
    }

    #[test]
    fn exact_entry_landing_stays_on_ring() {
        // Red token one short of its entry cell (index 51).
        let from = RING[49];
        assert_eq!(
            next_position(Some(from), 2, Color::Red),
            Some(Color::Red.home_entry_tile())
        );
    }

    #[test]
    fn passing_entry_hands_off_into_the_lane() {
        let lane = Color::Red.home_lane();
        // From index 49, entry is 2 away; 3 steps = lane cell 0, 8 = lane 5.
        let from = RING[49];
        assert_eq!(next_position(Some(from), 3, Color::Red), Some(lane[0]));
        assert_eq!(next_position(Some(from), 8, Color::Red), Some(lane[5]));
        // 9 steps = exactly the center.
        assert_eq!(next_position(Some(from), 9, Color::Red), Some(CENTER));
    }

    #[test]
    fn overshooting_the_center_from_the_ring_is_rejected() {
        let from = RING[49];
        // Entry at 2 steps, center at 9; 10 overshoots.
        assert_eq!(next_position(Some(from), 10, Color::Red), Some(from));
    }

    #[test]
    fn lane_arithmetic_and_overshoot() {
        let lane = Color::Yellow.home_lane();
        assert_eq!(next_position(Some(lane[1]), 3, Color::Yellow), Some(lane[4]));
        assert_eq!(next_position(Some(lane[1]), 5, Color::Yellow), Some(CENTER));
        assert_eq!(next_position(Some(lane[1]), 6, Color::Yellow), Some(lane[1]));
        assert_eq!(next_position(Some(lane[5]), 1, Color::Yellow), Some(CENTER));
        assert_eq!(next_position(Some(lane[5]), 2, Color::Yellow), Some(lane[5]));
    }

    #[test]
    fn foreign_lane_position_is_a_lookup_miss() {
        let green_lane_cell = Color::Green.home_lane()[2];
        assert_eq!(
            next_position(Some(green_lane_cell), 1, Color::Red),
            Some(green_lane_cell)
        );
    }

    #[test]
    fn base_exit_requires_a_six() {
        let token = Token::in_base(TokenId::new(Color::Blue, 0));
        for value in 1..=5u8 {
            assert!(!can_exit_base(&token, value));
            assert!(valid_moves(&token, value).is_empty());
        }
        assert!(can_exit_base(&token, 6));
        assert_eq!(
            valid_moves(&token, 6),
            vec![TokenMove::ExitBase {
                to: Color::Blue.start_tile()
            }]
        );
    }

    #[test]
    fn exit_places_on_start_marked_out_and_safe() {
        let token = Token::in_base(TokenId::new(Color::Green, 2));
        let moved = apply_move(&token, 6);
        assert_eq!(moved.position(), Some(Color::Green.start_tile()));
        assert!(moved.is_out());
        assert!(moved.is_safe(), "start cells are safe cells");
        assert!(!moved.is_completed());
    }

    #[test]
    fn landing_on_the_center_completes_the_token() {
        let lane = Color::Red.home_lane();
        let token = out_token(Color::Red, 0, lane[3]);
        let moved = apply_move(&token, 3);
        assert_eq!(moved.position(), Some(CENTER));
        assert!(moved.is_completed());
        assert!(moved.is_safe());
        assert!(moved.is_out());
    }

    #[test]
    fn completed_tokens_never_move_again() {
        let token = out_token(Color::Red, 0, Color::Red.home_lane()[5]);
        let done = apply_move(&token, 1);
        assert!(done.is_completed());
        for value in 1..=6u8 {
            assert_eq!(apply_move(&done, value), done);
            assert!(valid_moves(&done, value).is_empty());
        }
    }

    #[test]
    fn overshoot_is_excluded_not_clamped() {
        let lane = Color::Blue.home_lane();
        let token = out_token(Color::Blue, 1, lane[4]);
        // Needs exactly 2 to finish; 3..6 overshoot.
        for value in 3..=6u8 {
            assert!(valid_moves(&token, value).is_empty(), "roll {value}");
            assert_eq!(apply_move(&token, value), token);
        }
        assert_eq!(valid_moves(&token, 2).len(), 1);
    }

    #[test]
    fn safe_flag_tracks_landing_cell() {
        // Ring index 9 is a star cell.
        let token = out_token(Color::Red, 0, RING[8]);
        let on_star = apply_move(&token, 1);
        assert_eq!(on_star.position(), Some(RING[9]));
        assert!(on_star.is_safe());

        // One more step leaves the star.
        let off_star = apply_move(&on_star, 1);
        assert_eq!(off_star.position(), Some(RING[10]));
        assert!(!off_star.is_safe());
    }

    /// The handoff formula must produce the same shape of result for every
    /// combination of ring index and step count, wherever the entry index
    /// falls — wraparound or not.
    #[test]
    fn wraparound_is_index_independent() {
        for color in Color::TURN_ORDER {
            let entry = color.entry_index();
            for ring_idx in 0..RING_LEN {
                let from = RING[ring_idx];
                let steps_to_entry = (entry + RING_LEN - ring_idx) % RING_LEN;
                for steps in 1..=6usize {
                    let dest = next_position(Some(from), steps, color)
                        .expect("out token keeps a position");
                    if steps <= steps_to_entry {
                        assert_eq!(dest, RING[(ring_idx + steps) % RING_LEN]);
                    } else {
                        let remaining = steps - steps_to_entry;
                        // With steps <= 6, remaining is at most 6: always a
                        // lane cell, never the center or an overshoot.
                        assert_eq!(dest, color.home_lane()[remaining - 1]);
                    }
                }
            }
        }
    }
}
