use std::fmt;

use thiserror::Error;

use super::{BoardLayout, Bonus, MultiplierClass, Position, Table};

/// Identity of a tile, unique within a tile source
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// A letter unit
///
/// Tiles are deliberately neither `Clone` nor `Copy`: a tile lives in exactly
/// one of the tile source, a rack slot or a grid cell, and moves between them.
#[derive(Debug, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    letter: char,
    value: u32,
    locked: bool,
    special: bool,
}

impl Tile {
    pub fn new(id: TileId, letter: char, value: u32) -> Self {
        Self {
            id,
            letter: letter.to_ascii_uppercase(),
            value,
            locked: false,
            special: false,
        }
    }

    pub fn with_special(mut self, special: bool) -> Self {
        self.special = special;
        self
    }

    pub fn id(&self) -> TileId {
        self.id
    }
    pub fn letter(&self) -> char {
        self.letter
    }
    /// Base point value, before any multiplier
    pub fn value(&self) -> u32 {
        self.value
    }
    pub fn is_locked(&self) -> bool {
        self.locked
    }
    pub fn is_special(&self) -> bool {
        self.special
    }
}

#[derive(Debug, Error)]
pub enum PlaceError {
    #[error("cell {pos} already holds a tile")]
    Occupied { pos: Position, tile: Tile },
    #[error("{pos} is outside the board")]
    OutOfBounds { pos: Position, tile: Tile },
}

impl PlaceError {
    /// Gives back the tile that could not be placed
    pub fn into_tile(self) -> Tile {
        match self {
            PlaceError::Occupied { tile, .. } | PlaceError::OutOfBounds { tile, .. } => tile,
        }
    }
}

#[derive(Debug)]
pub struct Cell {
    position: Position,
    class: MultiplierClass,
    /// Set by timed zones, replaces the effect of `class` while present
    temporary: Option<Bonus>,
    occupant: Option<Tile>,
    locked: bool,
}

impl Cell {
    fn new(position: Position, class: MultiplierClass) -> Self {
        Self {
            position,
            class,
            temporary: None,
            occupant: None,
            locked: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
    pub fn row(&self) -> usize {
        self.position.row
    }
    pub fn col(&self) -> usize {
        self.position.col
    }
    pub fn class(&self) -> MultiplierClass {
        self.class
    }
    pub fn temporary(&self) -> Option<Bonus> {
        self.temporary
    }
    pub fn tile(&self) -> Option<&Tile> {
        self.occupant.as_ref()
    }
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Holds a tile from a previously committed move
    pub fn has_locked_tile(&self) -> bool {
        self.occupant.as_ref().map_or(false, |t| t.locked)
    }

    /// Holds a tile placed since the last commit
    pub fn has_pending_tile(&self) -> bool {
        self.occupant.as_ref().map_or(false, |t| !t.locked)
    }

    /// The multipliers scoring actually uses
    pub fn effective_bonus(&self) -> Bonus {
        self.temporary.unwrap_or_else(|| self.class.bonus())
    }
}

/// The board: a fixed size table of cells
#[derive(Debug)]
pub struct Grid {
    cells: Table<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, layout: &impl BoardLayout) -> Self {
        Self {
            cells: Table::from_fn(rows, cols, |pos| Cell::new(pos, layout.class_at(pos))),
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.rows()
    }
    pub fn cols(&self) -> usize {
        self.cells.cols()
    }

    /// The cell the first move has to cover
    pub fn center(&self) -> Position {
        Position::new(self.rows() / 2, self.cols() / 2)
    }

    pub fn get_cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(pos)
    }

    pub fn cells(&self) -> impl Iterator<Item=&Cell> {
        self.cells.iter()
    }

    pub fn letter_at(&self, pos: Position) -> Option<char> {
        self.get_cell(pos)?.tile().map(Tile::letter)
    }

    pub fn place_tile(&mut self, pos: Position, tile: Tile) -> Result<(), PlaceError> {
        match self.cells.get_mut(pos) {
            None => Err(PlaceError::OutOfBounds { pos, tile }),
            Some(cell) if cell.occupant.is_some() => Err(PlaceError::Occupied { pos, tile }),
            Some(cell) => {
                cell.occupant = Some(tile);
                Ok(())
            },
        }
    }

    /// Takes the tile off a cell, locked or not; the lock state of the cell is left alone
    pub fn remove_tile(&mut self, pos: Position) -> Option<Tile> {
        self.cells.get_mut(pos)?.occupant.take()
    }

    pub fn apply_temporary_multipliers(&mut self, cells: impl IntoIterator<Item=Position>, letter_mul: u32, word_mul: u32) {
        for pos in cells {
            if let Some(cell) = self.cells.get_mut(pos) {
                cell.temporary = Some(Bonus { letter: letter_mul, word: word_mul });
            }
        }
    }

    pub fn clear_temporary_multipliers(&mut self, cells: impl IntoIterator<Item=Position>) {
        for pos in cells {
            if let Some(cell) = self.cells.get_mut(pos) {
                cell.temporary = None;
            }
        }
    }

    /// Changes the permanent class of a cell, for board effects
    pub fn set_class(&mut self, pos: Position, class: MultiplierClass) {
        if let Some(cell) = self.cells.get_mut(pos) {
            cell.class = class;
        }
    }

    /// Marks the cell and its tile as part of a committed move
    pub(crate) fn lock(&mut self, pos: Position) {
        if let Some(cell) = self.cells.get_mut(pos) {
            cell.locked = true;
            if let Some(tile) = cell.occupant.as_mut() {
                tile.locked = true;
            }
        }
    }

    /// Positions of the tiles placed since the last commit, in row-major order
    pub fn pending(&self) -> Vec<Position> {
        self.cells.iter()
            .filter(|c| c.has_pending_tile())
            .map(Cell::position)
            .collect()
    }

    pub fn has_locked_tile(&self) -> bool {
        self.cells.iter().any(Cell::has_locked_tile)
    }

    pub fn is_locked_tile_at(&self, pos: Position) -> bool {
        self.get_cell(pos).map_or(false, Cell::has_locked_tile)
    }
}

impl fmt::Display for Grid {
    /// Locked letters in uppercase, pending ones in lowercase, empty cells show their class
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let cell = &self.cells[Position { row, col }];
                let c = match cell.tile() {
                    Some(tile) if tile.is_locked() => tile.letter(),
                    Some(tile) => tile.letter().to_ascii_lowercase(),
                    None if cell.temporary.is_some() => '+',
                    None => cell.class.glyph(),
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}


#[test]
fn test_get_cell_out_of_bounds() {
    let grid = Grid::new(5, 5, &super::score_rules::PlainLayout);
    assert!(grid.get_cell(Position::new(4, 4)).is_some());
    assert!(grid.get_cell(Position::new(5, 0)).is_none());
    assert!(grid.get_cell(Position::new(0, usize::MAX)).is_none());
    assert_eq!(grid.center(), Position::new(2, 2));
}

#[test]
fn test_place_on_occupied_gives_tile_back() {
    let mut grid = Grid::new(3, 3, &super::score_rules::PlainLayout);
    let pos = Position::new(1, 1);
    grid.place_tile(pos, Tile::new(TileId(1), 'a', 1)).unwrap();

    let err = grid.place_tile(pos, Tile::new(TileId(2), 'b', 3)).unwrap_err();
    assert!(matches!(err, PlaceError::Occupied { .. }));
    assert_eq!(err.into_tile().id(), TileId(2));
    assert_eq!(grid.letter_at(pos), Some('A'));

    let err = grid.place_tile(Position::new(3, 0), Tile::new(TileId(3), 'c', 3)).unwrap_err();
    assert!(matches!(err, PlaceError::OutOfBounds { .. }));
}

#[test]
fn test_remove_keeps_lock_state() {
    let mut grid = Grid::new(3, 3, &super::score_rules::PlainLayout);
    let pos = Position::new(0, 2);
    assert!(grid.remove_tile(pos).is_none());

    grid.place_tile(pos, Tile::new(TileId(1), 'z', 10)).unwrap();
    assert_eq!(grid.pending(), vec![pos]);
    grid.lock(pos);
    assert!(grid.has_locked_tile());
    assert!(grid.pending().is_empty());

    let tile = grid.remove_tile(pos).unwrap();
    assert!(tile.is_locked());
    assert!(grid.get_cell(pos).unwrap().is_locked());
    assert!(!grid.has_locked_tile());
}

#[test]
fn test_temporary_multipliers_replace_class() {
    let mut grid = Grid::new(3, 3, &super::score_rules::PlainLayout);
    let pos = Position::new(1, 0);
    grid.set_class(pos, MultiplierClass::TripleWord);
    assert_eq!(grid.get_cell(pos).unwrap().effective_bonus(), Bonus { letter: 1, word: 3 });

    grid.apply_temporary_multipliers(vec![pos, Position::new(9, 9)], 2, 1);
    let cell = grid.get_cell(pos).unwrap();
    assert_eq!(cell.effective_bonus(), Bonus { letter: 2, word: 1 });
    assert_eq!(cell.class(), MultiplierClass::TripleWord);

    grid.clear_temporary_multipliers(vec![pos]);
    assert_eq!(grid.get_cell(pos).unwrap().effective_bonus(), Bonus { letter: 1, word: 3 });
}

#[test]
fn test_display() {
    let mut grid = Grid::new(2, 3, &super::score_rules::parse_layout(&["..D", "t"]).unwrap());
    grid.place_tile(Position::new(0, 0), Tile::new(TileId(1), 'h', 4)).unwrap();
    grid.place_tile(Position::new(0, 1), Tile::new(TileId(2), 'i', 1)).unwrap();
    grid.lock(Position::new(0, 0));
    assert_eq!(grid.to_string(), "HiD\nt..\n");
}
