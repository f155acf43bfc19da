//! Core domain types: colors, token identifiers, tokens, and players.

use crate::geometry::{HOME_LANE_LEN, Position};
use serde::{Deserialize, Serialize};

/// The four player colors, in turn order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    /// Red moves first.
    Red,
    /// Green moves second.
    Green,
    /// Blue moves third.
    Blue,
    /// Yellow moves fourth.
    Yellow,
}

impl Color {
    /// Turn order around the table. Matches the players array of a fresh
    /// game; independent of ring traversal order.
    pub const TURN_ORDER: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];
}

/// Number of tokens each player owns.
pub const TOKENS_PER_PLAYER: usize = 4;

/// Identifier of a single token, unique across the game.
///
/// Rendered on the wire as `"<color>-<slot>"`, e.g. `"red-2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
#[serde(try_from = "String", into = "String")]
pub struct TokenId {
    /// Owning color.
    pub color: Color,
    /// Slot within the owner's four tokens, 0..=3.
    pub slot: u8,
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.color, self.slot)
    }
}

/// Error parsing a token id string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseTokenIdError {
    /// The string is not of the form `<color>-<slot>`.
    #[display("token id {:?} is not of the form <color>-<slot>", _0)]
    Malformed(#[error(not(source))] String),
    /// The color segment is not one of the four player colors.
    #[display("unknown color in token id {:?}", _0)]
    UnknownColor(#[error(not(source))] String),
    /// The slot segment is not an integer in 0..=3.
    #[display("token slot out of range in token id {:?}", _0)]
    SlotOutOfRange(#[error(not(source))] String),
}

impl std::str::FromStr for TokenId {
    type Err = ParseTokenIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (color, slot) = s
            .split_once('-')
            .ok_or_else(|| ParseTokenIdError::Malformed(s.to_string()))?;
        let color: Color = color
            .parse()
            .map_err(|_| ParseTokenIdError::UnknownColor(s.to_string()))?;
        let slot: u8 = slot
            .parse()
            .ok()
            .filter(|slot| (*slot as usize) < TOKENS_PER_PLAYER)
            .ok_or_else(|| ParseTokenIdError::SlotOutOfRange(s.to_string()))?;
        Ok(TokenId { color, slot })
    }
}

impl TryFrom<String> for TokenId {
    type Error = ParseTokenIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TokenId> for String {
    fn from(value: TokenId) -> Self {
        value.to_string()
    }
}

/// One of a player's four tokens.
///
/// Lifecycle: created in base at game start, moved by the movement engine,
/// reset to base by the capture resolver, frozen once completed.
///
/// Invariants: `position.is_none()` exactly when `!is_out`, and a
/// completed token is always out and safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    id: TokenId,
    position: Option<Position>,
    is_out: bool,
    is_safe: bool,
    is_completed: bool,
}

impl Token {
    /// Creates a token resting in its owner's base.
    pub fn in_base(id: TokenId) -> Self {
        Self {
            id,
            position: None,
            is_out: false,
            is_safe: false,
            is_completed: false,
        }
    }

    /// Copy of this token placed on `position` with the given flags.
    /// The building block for every movement-engine transition.
    pub fn placed(&self, position: Position, is_safe: bool, is_completed: bool) -> Self {
        Self {
            id: self.id,
            position: Some(position),
            is_out: true,
            is_safe,
            is_completed,
        }
    }

    /// Copy of this token sent back to base by a capture.
    pub fn returned_to_base(&self) -> Self {
        Self::in_base(self.id)
    }

    /// This token's identifier.
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Owning color, from the identifier.
    pub fn color(&self) -> Color {
        self.id.color
    }

    /// Current cell, `None` while the token rests in base.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Whether the token has left its base.
    pub fn is_out(&self) -> bool {
        self.is_out
    }

    /// Whether the token currently stands on a safe cell (or is completed).
    pub fn is_safe(&self) -> bool {
        self.is_safe
    }

    /// Whether the token has reached the center and is frozen.
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }
}

/// A player: a color plus its four tokens.
///
/// Start tile, home-entry tile, and home lane are shared read-only
/// geometry, exposed here as accessors for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    color: Color,
    tokens: [Token; TOKENS_PER_PLAYER],
}

impl Player {
    /// Creates a player with all four tokens in base.
    pub fn starting(color: Color) -> Self {
        let tokens = std::array::from_fn(|slot| Token::in_base(TokenId::new(color, slot as u8)));
        Self { color, tokens }
    }

    /// This player's color, which doubles as its identifier.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The player's four tokens.
    pub fn tokens(&self) -> &[Token; TOKENS_PER_PLAYER] {
        &self.tokens
    }

    /// The token with the given id, if it belongs to this player.
    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|token| token.id() == id)
    }

    /// Copy of this player with one token replaced (matched by id).
    pub fn with_token(&self, replacement: Token) -> Self {
        let tokens = self.tokens.map(|token| {
            if token.id() == replacement.id() {
                replacement
            } else {
                token
            }
        });
        Self {
            color: self.color,
            tokens,
        }
    }

    /// Copy of this player with all four tokens replaced.
    pub fn with_tokens(&self, tokens: [Token; TOKENS_PER_PLAYER]) -> Self {
        Self {
            color: self.color,
            tokens,
        }
    }

    /// Whether every token has reached the center.
    pub fn has_won(&self) -> bool {
        self.tokens.iter().all(Token::is_completed)
    }

    /// The ring cell this player's tokens exit base onto.
    pub fn start_tile(&self) -> Position {
        self.color.start_tile()
    }

    /// The ring cell where this player's tokens turn off the ring.
    pub fn home_entry_tile(&self) -> Position {
        self.color.home_entry_tile()
    }

    /// This player's private home lane.
    pub fn home_path(&self) -> [Position; HOME_LANE_LEN] {
        self.color.home_lane()
    }
}
