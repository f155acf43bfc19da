//! Static board geometry for the standard 15×15 Ludo cross.
//!
//! Everything in this module is read-only data plus lookup: the 52-cell
//! shared ring in traversal order, each color's start/entry cells and
//! private home lane, the base slots inside the corner yards, the center
//! sentinel, and the safe-cell set. No rule logic lives here.

use crate::types::Color;
use serde::{Deserialize, Serialize};

/// Side length of the square grid the board lives on.
pub const GRID_SIZE: u8 = 15;

/// Number of cells on the shared ring.
pub const RING_LEN: usize = 52;

/// Cells a token travels on the ring before turning into its home lane:
/// start cell through entry cell, inclusive.
pub const RING_SPAN: usize = 51;

/// Length of each color's private home lane.
pub const HOME_LANE_LEN: usize = 6;

/// A cell on the board grid. Value type, compared structurally.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_new::new,
)]
pub struct Position {
    /// Grid row, 0 at the top.
    pub row: u8,
    /// Grid column, 0 at the left.
    pub col: u8,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const fn p(row: u8, col: u8) -> Position {
    Position { row, col }
}

/// The center sentinel cell. A token landing here is completed.
pub const CENTER: Position = p(7, 7);

/// The shared ring in clockwise traversal order.
///
/// Index 0 is the west arm cell (6,0); consecutive indices are king-move
/// neighbours on the grid, and index 51 wraps back to index 0.
pub const RING: [Position; RING_LEN] = [
    // West arm, heading east.
    p(6, 0),
    p(6, 1),
    p(6, 2),
    p(6, 3),
    p(6, 4),
    p(6, 5),
    // Up the west side of the north arm.
    p(5, 6),
    p(4, 6),
    p(3, 6),
    p(2, 6),
    p(1, 6),
    p(0, 6),
    // Across the top.
    p(0, 7),
    // Down the east side of the north arm.
    p(0, 8),
    p(1, 8),
    p(2, 8),
    p(3, 8),
    p(4, 8),
    p(5, 8),
    // East arm, heading east.
    p(6, 9),
    p(6, 10),
    p(6, 11),
    p(6, 12),
    p(6, 13),
    p(6, 14),
    // Down the east edge.
    p(7, 14),
    // East arm, heading west along the south side.
    p(8, 14),
    p(8, 13),
    p(8, 12),
    p(8, 11),
    p(8, 10),
    p(8, 9),
    // Down the east side of the south arm.
    p(9, 8),
    p(10, 8),
    p(11, 8),
    p(12, 8),
    p(13, 8),
    p(14, 8),
    // Across the bottom.
    p(14, 7),
    // Up the west side of the south arm.
    p(14, 6),
    p(13, 6),
    p(12, 6),
    p(11, 6),
    p(10, 6),
    p(9, 6),
    // West arm, heading west along the south side.
    p(8, 5),
    p(8, 4),
    p(8, 3),
    p(8, 2),
    p(8, 1),
    p(8, 0),
    // Up the west edge, closing the loop at index 0.
    p(7, 0),
];

/// Cells on which a token can never be captured.
///
/// De-duplicated union of every color's start cell, every color's
/// home-entry cell, and the four star cells at ring indices 9, 22, 35, 48.
pub const SAFE_CELLS: [Position; 12] = [
    // Start cells.
    p(6, 1),
    p(1, 8),
    p(13, 6),
    p(8, 13),
    // Home-entry cells.
    p(7, 0),
    p(0, 7),
    p(14, 7),
    p(7, 14),
    // Star cells.
    p(2, 6),
    p(6, 12),
    p(12, 8),
    p(8, 2),
];

impl Color {
    /// Ring index of this color's start cell.
    pub const fn start_index(self) -> usize {
        match self {
            Color::Red => 1,
            Color::Green => 14,
            Color::Blue => 40,
            Color::Yellow => 27,
        }
    }

    /// Ring index of this color's home-entry cell.
    ///
    /// Always 50 ring steps ahead of the start index, so a token traverses
    /// [`RING_SPAN`] ring cells before turning into its lane.
    pub const fn entry_index(self) -> usize {
        match self {
            Color::Red => 51,
            Color::Green => 12,
            Color::Blue => 38,
            Color::Yellow => 25,
        }
    }

    /// The ring cell a token exits its base onto.
    pub const fn start_tile(self) -> Position {
        RING[self.start_index()]
    }

    /// The ring cell at which this color's tokens leave the shared ring.
    pub const fn home_entry_tile(self) -> Position {
        RING[self.entry_index()]
    }

    /// This color's private 6-cell home lane, from beside the entry cell
    /// toward the center. `home_lane()[5]` is the cell adjacent to
    /// [`CENTER`].
    pub const fn home_lane(self) -> [Position; HOME_LANE_LEN] {
        match self {
            Color::Red => [p(7, 1), p(7, 2), p(7, 3), p(7, 4), p(7, 5), p(7, 6)],
            Color::Green => [p(1, 7), p(2, 7), p(3, 7), p(4, 7), p(5, 7), p(6, 7)],
            Color::Blue => [p(13, 7), p(12, 7), p(11, 7), p(10, 7), p(9, 7), p(8, 7)],
            Color::Yellow => [p(7, 13), p(7, 12), p(7, 11), p(7, 10), p(7, 9), p(7, 8)],
        }
    }

    /// The four resting slots inside this color's corner yard.
    ///
    /// Presentation data only: tokens in base carry no position, and the
    /// engine never routes movement through these cells.
    pub const fn base_slots(self) -> [Position; 4] {
        match self {
            Color::Red => [p(2, 2), p(2, 3), p(3, 2), p(3, 3)],
            Color::Green => [p(2, 11), p(2, 12), p(3, 11), p(3, 12)],
            Color::Blue => [p(11, 2), p(11, 3), p(12, 2), p(12, 3)],
            Color::Yellow => [p(11, 11), p(11, 12), p(12, 11), p(12, 12)],
        }
    }
}

/// Index of `position` on the shared ring, if it lies on the ring.
pub fn ring_index_of(position: Position) -> Option<usize> {
    RING.iter().position(|cell| *cell == position)
}

/// Index of `position` within `color`'s home lane, if it lies on that lane.
pub fn home_lane_index_of(color: Color, position: Position) -> Option<usize> {
    color.home_lane().iter().position(|cell| *cell == position)
}

/// Whether a token on `position` is protected from capture.
pub fn is_safe_cell(position: Position) -> bool {
    SAFE_CELLS.contains(&position)
}

/// Whether `position` is the center sentinel.
pub fn is_center(position: Position) -> bool {
    position == CENTER
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    fn king_adjacent(a: Position, b: Position) -> bool {
        let dr = (a.row as i8 - b.row as i8).abs();
        let dc = (a.col as i8 - b.col as i8).abs();
        dr <= 1 && dc <= 1 && (dr, dc) != (0, 0)
    }

    #[test]
    fn ring_cells_are_distinct_and_in_bounds() {
        let unique: HashSet<Position> = RING.iter().copied().collect();
        assert_eq!(unique.len(), RING_LEN);
        for cell in RING {
            assert!(cell.row < GRID_SIZE && cell.col < GRID_SIZE, "{cell}");
        }
    }

    #[test]
    fn ring_is_a_closed_loop() {
        for i in 0..RING_LEN {
            let next = RING[(i + 1) % RING_LEN];
            assert!(
                king_adjacent(RING[i], next),
                "ring break between index {i} ({}) and {}",
                RING[i],
                next
            );
        }
    }

    #[test]
    fn entry_is_fifty_steps_ahead_of_start_for_every_color() {
        for color in Color::iter() {
            let start = color.start_index();
            let entry = color.entry_index();
            assert_eq!((entry + RING_LEN - start) % RING_LEN, 50, "{color}");
        }
    }

    #[test]
    fn home_lanes_run_from_entry_to_center() {
        for color in Color::iter() {
            let lane = color.home_lane();
            assert!(king_adjacent(color.home_entry_tile(), lane[0]), "{color}");
            for pair in lane.windows(2) {
                assert!(king_adjacent(pair[0], pair[1]), "{color}");
            }
            assert!(king_adjacent(lane[HOME_LANE_LEN - 1], CENTER), "{color}");
        }
    }

    #[test]
    fn home_lanes_never_touch_the_ring_or_each_other() {
        let ring: HashSet<Position> = RING.iter().copied().collect();
        let mut seen: HashSet<Position> = HashSet::new();
        for color in Color::iter() {
            for cell in color.home_lane() {
                assert!(!ring.contains(&cell), "{color} lane cell {cell} on ring");
                assert_ne!(cell, CENTER);
                assert!(seen.insert(cell), "lane cell {cell} shared between colors");
            }
        }
    }

    #[test]
    fn safe_cells_are_deduplicated_and_on_the_ring() {
        let unique: HashSet<Position> = SAFE_CELLS.iter().copied().collect();
        assert_eq!(unique.len(), SAFE_CELLS.len());
        for cell in SAFE_CELLS {
            assert!(ring_index_of(cell).is_some(), "safe cell {cell} off ring");
        }
        for color in Color::iter() {
            assert!(is_safe_cell(color.start_tile()));
            assert!(is_safe_cell(color.home_entry_tile()));
        }
    }

    #[test]
    fn base_slots_sit_inside_their_own_yard() {
        let mut seen: HashSet<Position> = HashSet::new();
        for color in Color::iter() {
            let (rows, cols) = match color {
                Color::Red => (0..6, 0..6),
                Color::Green => (0..6, 9..15),
                Color::Blue => (9..15, 0..6),
                Color::Yellow => (9..15, 9..15),
            };
            for slot in color.base_slots() {
                assert!(rows.contains(&slot.row) && cols.contains(&slot.col), "{color} {slot}");
                assert_eq!(ring_index_of(slot), None);
                assert!(seen.insert(slot), "base slot {slot} shared between colors");
            }
        }
    }

    #[test]
    fn ring_lookup_round_trips() {
        for (i, cell) in RING.iter().enumerate() {
            assert_eq!(ring_index_of(*cell), Some(i));
        }
        assert_eq!(ring_index_of(CENTER), None);
        assert_eq!(ring_index_of(p(0, 0)), None);
    }

    #[test]
    fn lane_lookup_is_color_private() {
        for color in Color::iter() {
            for (i, cell) in color.home_lane().iter().enumerate() {
                assert_eq!(home_lane_index_of(color, *cell), Some(i));
            }
            for other in Color::iter().filter(|c| *c != color) {
                for cell in other.home_lane() {
                    assert_eq!(home_lane_index_of(color, cell), None);
                }
            }
        }
    }
}
