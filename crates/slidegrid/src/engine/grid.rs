use rand::Rng;

use super::state::{Position, Tile};

/// N x N matrix of cells, each holding at most one tile.
///
/// Invariant: a stored tile's `position` always names the cell it sits in;
/// `insert` and `remove` are the only ways tiles enter or leave.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Grid {
    size: usize,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    pub(crate) fn new(size: usize) -> Self {
        Grid {
            size,
            cells: vec![None; size * size],
        }
    }

    fn idx(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    pub(crate) fn within_bounds(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub(crate) fn get(&self, pos: Position) -> Option<&Tile> {
        if !self.within_bounds(pos) {
            return None;
        }
        self.cells[self.idx(pos)].as_ref()
    }

    pub(crate) fn insert(&mut self, tile: Tile) {
        let idx = self.idx(tile.position);
        debug_assert!(self.cells[idx].is_none(), "cell already occupied");
        self.cells[idx] = Some(tile);
    }

    pub(crate) fn remove(&mut self, pos: Position) -> Option<Tile> {
        let idx = self.idx(pos);
        self.cells[idx].take()
    }

    pub(crate) fn available_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let pos = Position { row, col };
                if self.cells[self.idx(pos)].is_none() {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    pub(crate) fn has_available(&self) -> bool {
        self.cells.iter().any(|cell| cell.is_none())
    }

    /// Uniform choice among empty cells, `None` when the grid is full.
    pub(crate) fn random_available_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let cells = self.available_cells();
        if cells.is_empty() {
            return None;
        }
        Some(cells[rng.gen_range(0..cells.len())])
    }

    /// Snapshot of all tiles, row-major.
    pub(crate) fn tiles(&self) -> Vec<Tile> {
        self.cells.iter().flatten().cloned().collect()
    }

    pub(crate) fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> + '_ {
        self.cells.iter_mut().flatten()
    }

    pub(crate) fn highest_value(&self) -> u32 {
        self.cells
            .iter()
            .flatten()
            .map(|tile| tile.value)
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pos(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    #[test]
    fn insert_remove_roundtrip() {
        let mut grid = Grid::new(4);
        assert_eq!(grid.available_cells().len(), 16);
        grid.insert(Tile::spawned(0, 2, pos(1, 2)));
        assert_eq!(grid.get(pos(1, 2)).map(|t| t.value), Some(2));
        assert_eq!(grid.available_cells().len(), 15);
        let tile = grid.remove(pos(1, 2)).unwrap();
        assert_eq!(tile.id, 0);
        assert!(grid.get(pos(1, 2)).is_none());
        assert_eq!(grid.available_cells().len(), 16);
    }

    #[test]
    fn out_of_bounds_reads_are_none() {
        let mut grid = Grid::new(2);
        grid.insert(Tile::spawned(0, 2, pos(0, 0)));
        assert!(grid.get(pos(2, 0)).is_none());
        assert!(grid.get(pos(0, 2)).is_none());
        assert!(!grid.within_bounds(pos(2, 1)));
    }

    #[test]
    fn random_cell_is_always_empty() {
        let mut grid = Grid::new(3);
        grid.insert(Tile::spawned(0, 2, pos(0, 0)));
        grid.insert(Tile::spawned(1, 4, pos(1, 1)));
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..64 {
            let cell = grid.random_available_cell(&mut rng).unwrap();
            assert!(grid.get(cell).is_none());
        }
    }

    #[test]
    fn random_cell_on_full_grid_is_none() {
        let mut grid = Grid::new(2);
        for (id, (row, col)) in [(0, 0), (0, 1), (1, 0), (1, 1)].into_iter().enumerate() {
            grid.insert(Tile::spawned(id as u64, 2, pos(row, col)));
        }
        let mut rng = StdRng::seed_from_u64(11);
        assert!(!grid.has_available());
        assert!(grid.random_available_cell(&mut rng).is_none());
    }

    #[test]
    fn highest_value_scans_all_tiles() {
        let mut grid = Grid::new(3);
        assert_eq!(grid.highest_value(), 0);
        grid.insert(Tile::spawned(0, 2, pos(0, 0)));
        grid.insert(Tile::spawned(1, 512, pos(2, 2)));
        grid.insert(Tile::spawned(2, 64, pos(1, 0)));
        assert_eq!(grid.highest_value(), 512);
    }
}
