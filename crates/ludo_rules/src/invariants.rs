//! First-class invariants for the game snapshot.
//!
//! Invariants are logical properties that must hold between transitions.
//! They are testable independently, serve as documentation of system
//! guarantees, and are asserted after every dispatch in debug builds.

use crate::state::{GameState, PLAYER_COUNT};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }
        if !I4::holds(state) {
            violations.push(InvariantViolation::new(I4::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// A token has a position exactly when it is out of base.
pub struct TokenPositionSync;

impl Invariant<GameState> for TokenPositionSync {
    fn holds(state: &GameState) -> bool {
        state
            .players()
            .iter()
            .flat_map(|player| player.tokens())
            .all(|token| token.position().is_some() == token.is_out())
    }

    fn description() -> &'static str {
        "a token has a position exactly when it is out of base"
    }
}

/// A completed token is out and safe.
pub struct CompletedTokensAreOutAndSafe;

impl Invariant<GameState> for CompletedTokensAreOutAndSafe {
    fn holds(state: &GameState) -> bool {
        state
            .players()
            .iter()
            .flat_map(|player| player.tokens())
            .filter(|token| token.is_completed())
            .all(|token| token.is_out() && token.is_safe())
    }

    fn description() -> &'static str {
        "a completed token is out and safe"
    }
}

/// The active-player index stays inside the players array.
pub struct CurrentPlayerInRange;

impl Invariant<GameState> for CurrentPlayerInRange {
    fn holds(state: &GameState) -> bool {
        *state.current_player_index() < PLAYER_COUNT
    }

    fn description() -> &'static str {
        "the active-player index stays inside the players array"
    }
}

/// The winners list contains exactly the players with four completed tokens.
pub struct WinnersMatchCompletion;

impl Invariant<GameState> for WinnersMatchCompletion {
    fn holds(state: &GameState) -> bool {
        match state.winners() {
            None => true,
            Some(winners) => {
                !winners.is_empty()
                    && winners
                        .iter()
                        .all(|color| state.player(*color).has_won())
                    && state
                        .players()
                        .iter()
                        .filter(|player| player.has_won())
                        .all(|player| winners.contains(&player.color()))
            }
        }
    }

    fn description() -> &'static str {
        "the winners list contains exactly the players with four completed tokens"
    }
}

/// The full invariant set for a game snapshot.
pub type GameStateInvariants = (
    TokenPositionSync,
    CompletedTokensAreOutAndSafe,
    CurrentPlayerInRange,
    WinnersMatchCompletion,
);

/// Checks the full invariant set against a snapshot.
pub fn check_game_state(state: &GameState) -> Result<(), Vec<InvariantViolation>> {
    GameStateInvariants::check_all(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_game_satisfies_all_invariants() {
        assert_eq!(check_game_state(&GameState::new_game()), Ok(()));
    }

    #[test]
    fn win_evaluation_keeps_invariants() {
        let game = GameState::new_game().evaluate_win_state();
        assert_eq!(check_game_state(&game), Ok(()));
    }
}
