//! First-class actions for the turn state machine.
//!
//! Actions are domain events, not side effects: they carry the caller's
//! intent, can be validated independently of execution, serialized for
//! replay, and logged for debugging. The serde layout matches the wire
//! protocol consumed from the presentation layer:
//! `{"type":"ROLL_DICE","value":6}`, `{"type":"MAKE_MOVE","tokenId":"red-0"}`,
//! `{"type":"END_TURN"}`.

use crate::turn::TurnPhase;
use crate::types::{Color, TokenId};
use serde::{Deserialize, Serialize};

/// An action dispatched at the turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Roll the dice. `value` may be injected for determinism; when
    /// omitted the engine samples its dice source. Only accepted while
    /// waiting for a roll.
    #[serde(rename = "ROLL_DICE")]
    RollDice {
        /// Injected roll value, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<u8>,
    },
    /// Move the token with the given id. Only accepted while waiting for
    /// a move, and only for a token in the current possible-move set.
    #[serde(rename = "MAKE_MOVE")]
    MakeMove {
        /// The token to move.
        #[serde(rename = "tokenId")]
        token_id: TokenId,
    },
    /// Acknowledge the end of a turn. The machine auto-advances on any
    /// action while a turn is ending, so this is the no-op trigger.
    #[serde(rename = "END_TURN")]
    EndTurn,
}

impl Action {
    /// Convenience constructor for a roll with an injected value.
    pub fn roll(value: u8) -> Self {
        Action::RollDice { value: Some(value) }
    }

    /// Convenience constructor for a sampled roll.
    pub fn roll_sampled() -> Self {
        Action::RollDice { value: None }
    }

    /// Convenience constructor for a move.
    pub fn make_move(token_id: TokenId) -> Self {
        Action::MakeMove { token_id }
    }
}

/// Error parsing an action from its wire form.
///
/// A parse failure is the "malformed action" class of input: callers that
/// use [`crate::turn::TurnState::dispatch_json`] never see it — the
/// dispatch absorbs it and returns the state unchanged.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
#[display("malformed action: {}", _0)]
pub struct ActionParseError(serde_json::Error);

impl Action {
    /// Parses an action from its JSON wire form.
    pub fn parse(json: &str) -> Result<Self, ActionParseError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// History record of one accepted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct AppliedAction {
    /// Turn counter at the time the action was accepted.
    pub turn: u32,
    /// The player that was active when the action was accepted.
    pub player: Color,
    /// The action itself.
    pub action: Action,
    /// Phase the machine entered as a result.
    pub phase_after: TurnPhase,
}
