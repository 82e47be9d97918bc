use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A direction to slide/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The (row, col) step a tile takes when sliding this way.
    pub(crate) fn vector(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// A cell coordinate, row-major from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// One step along `vector`, or `None` if it would leave the top or left
    /// edge. The grid checks the far edges.
    pub(crate) fn step(self, (dr, dc): (i32, i32)) -> Option<Position> {
        let row = self.row as i64 + dr as i64;
        let col = self.col as i64 + dc as i64;
        if row < 0 || col < 0 {
            return None;
        }
        Some(Position {
            row: row as usize,
            col: col as usize,
        })
    }
}

/// A single numbered occupant of one grid cell.
///
/// `id` is assigned once at creation and never reused; a tile produced by a
/// merge carries a fresh id and records its two source tiles in
/// `merged_from`. `is_new`, `merged_from` and `previous_position` are
/// animation hints for the hosting layer and are rewritten at the start of
/// every move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u64,
    pub value: u32,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_from: Option<Box<[Tile; 2]>>,
    pub is_new: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_position: Option<Position>,
}

impl Tile {
    pub(crate) fn spawned(id: u64, value: u32, position: Position) -> Self {
        Tile {
            id,
            value,
            position,
            merged_from: None,
            is_new: true,
            previous_position: None,
        }
    }

    pub(crate) fn merged(id: u64, value: u32, position: Position, sources: [Tile; 2]) -> Self {
        Tile {
            id,
            value,
            position,
            merged_from: Some(Box::new(sources)),
            is_new: false,
            previous_position: None,
        }
    }
}

/// Plain-data copy of the engine state handed to hosting layers after every
/// mutating operation. Never a live handle into the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub size: usize,
    pub score: u64,
    pub best_score: u64,
    pub highest_tile: u32,
    pub game_over: bool,
    pub won: bool,
    pub keep_playing: bool,
    pub move_count: u64,
    pub elapsed: Duration,
}

/// Result of `new_game`: the fresh state and its starting tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameUpdate {
    pub state: GameSnapshot,
    pub tiles: Vec<Tile>,
}

/// Result of `make_move`: whether the grid changed, the new state, and the
/// full post-move tile list (with merge/new/previous-position hints).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub moved: bool,
    pub state: GameSnapshot,
    pub tiles: Vec<Tile>,
}

/// Render a board as fixed-width rows, empty cells blank.
pub fn format_board(size: usize, tiles: &[Tile]) -> String {
    let mut values = vec![0u32; size * size];
    for tile in tiles {
        values[tile.position.row * size + tile.position.col] = tile.value;
    }
    let rule = "-".repeat(8 * size);
    let mut out = String::new();
    for row in 0..size {
        if row > 0 {
            out.push_str(&rule);
            out.push('\n');
        }
        let cells: Vec<String> = (0..size)
            .map(|col| format_val(values[row * size + col]))
            .collect();
        out.push_str(&cells.join("|"));
        out.push('\n');
    }
    out
}

fn format_val(val: u32) -> String {
    if val == 0 {
        return String::from("       ");
    }
    let mut x = val.to_string();
    while x.len() < 7 {
        match x.len() {
            6 => x = format!(" {}", x),
            _ => x = format!(" {} ", x),
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_point_the_right_way() {
        assert_eq!(Direction::Up.vector(), (-1, 0));
        assert_eq!(Direction::Down.vector(), (1, 0));
        assert_eq!(Direction::Left.vector(), (0, -1));
        assert_eq!(Direction::Right.vector(), (0, 1));
    }

    #[test]
    fn step_stops_at_the_near_edges() {
        let origin = Position { row: 0, col: 0 };
        assert_eq!(origin.step((-1, 0)), None);
        assert_eq!(origin.step((0, -1)), None);
        assert_eq!(origin.step((1, 0)), Some(Position { row: 1, col: 0 }));
        assert_eq!(origin.step((0, 1)), Some(Position { row: 0, col: 1 }));
    }

    #[test]
    fn board_formatting_places_values() {
        let tiles = vec![
            Tile::spawned(0, 2, Position { row: 0, col: 0 }),
            Tile::spawned(1, 1024, Position { row: 1, col: 1 }),
        ];
        let text = format_board(2, &tiles);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains('2'));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].contains("1024"));
    }
}
