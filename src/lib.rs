pub mod score_rules;
pub mod grid;
pub mod bag;
pub mod rack;
pub mod lexicon;
pub mod settings;
pub mod turn;

use std::ops::{Index, IndexMut};

pub use score_rules::{LetterScoring, BoardLayout, Bonus, MultiplierClass};
pub use grid::{Cell, Grid, Tile, TileId, PlaceError};
pub use bag::TileSource;
pub use rack::{Rack, RackError};
pub use lexicon::{Lexicon, FstLexicon};
pub use settings::GameConfig;
pub use turn::{TurnEngine, TurnResult, TurnState, TurnObserver, RejectReason, PlacementError, Word};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Vertical,
    Horizontal,
}

impl Direction {
    pub fn perp(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The up to four orthogonal neighbours, some of which may be off the board
    pub fn neighbours(self) -> impl Iterator<Item=Position> {
        let h = Placement(self, Direction::Horizontal);
        let v = Placement(self, Direction::Vertical);
        vec![h.back().0, h.next().0, v.back().0, v.next().0].into_iter()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl Index<Direction> for Position {
    type Output = usize;
    /// The coordinate that changes in that direction
    fn index(&self, dir: Direction) -> &Self::Output {
        match dir {
            Direction::Vertical => &self.row,
            Direction::Horizontal => &self.col,
        }
    }
}

impl IndexMut<Direction> for Position {
    /// The coordinate that changes in that direction
    fn index_mut(&mut self, dir: Direction) -> &mut Self::Output {
        match dir {
            Direction::Vertical => &mut self.row,
            Direction::Horizontal => &mut self.col,
        }
    }
}

/// A position together with the axis we are walking along
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Placement(pub Position, pub Direction);

impl Placement {
    pub fn next(mut self) -> Self {
        self.0[self.1] = self.0[self.1].saturating_add(1);
        self
    }

    /// Stepping back from coordinate 0 wraps around, which lands off the board
    pub fn back(mut self) -> Self {
        self.0[self.1] = self.0[self.1].wrapping_sub(1);
        self
    }

    /// Tries to find the first position on the line formed by the given `positions`
    ///
    /// None if `positions` is empty or if contains at least 2 positions that are not on the same row/column
    ///
    /// Some(Err(p)) if `positions` contains only `p`
    pub fn find_alignment(positions: impl IntoIterator<Item=Position>) -> Option<Result<Placement, Position>> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let second = loop {
            let tmp = iter.next();
            if tmp != Some(first) {
                break tmp
            }
        };
        let second = if let Some(s) = second { s } else { return Some(Err(first)) };
        let dir = if second.row == first.row {
            Direction::Horizontal
        } else if second.col == first.col {
            Direction::Vertical
        } else {
            return None
        };
        let mut start = first;
        start[dir] = start[dir].min(second[dir]);

        for new in iter {
            if new[dir.perp()] != start[dir.perp()] {
                return None
            } else {
                start[dir] = start[dir].min(new[dir])
            }
        }
        Some(Ok(Placement(start, dir)))
    }
}

/// A rectangular array addressed by `Position`
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    squares: Vec<Vec<T>>,
}

impl<T> Table<T> {
    pub fn fill_with(rows: usize, cols: usize, el: T) -> Self where T: Clone {
        Self {
            squares: vec![vec![el; cols]; rows],
        }
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(Position) -> T) -> Self {
        Self {
            squares: (0..rows).map(|row|
                (0..cols).map(|col| f(Position { row, col })).collect()
            ).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.squares.len()
    }
    pub fn cols(&self) -> usize {
        self.squares.first().map_or(0, |r| r.len())
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        self.squares.get(pos.row)?.get(pos.col)
    }
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.squares.get_mut(pos.row)?.get_mut(pos.col)
    }

    /// Every element in row-major order
    pub fn iter(&self) -> impl Iterator<Item=&T> {
        self.squares.iter().flat_map(|r| r.iter())
    }
}

impl<T> Index<Position> for Table<T> {
    type Output = T;
    fn index(&self, pos: Position) -> &T {
        &self.squares[pos.row][pos.col]
    }
}


#[test]
fn test_alignement() {
    let p1 = Position { row: 3, col: 4 };
    let p2 = Position { row: 4, col: 4 };
    let p3 = Position { row: 8, col: 4 };
    let p4 = Position { row: 3, col: 6 };

    assert_eq!(
        Placement::find_alignment(vec![]),
        None,
    );

    assert_eq!(
        Placement::find_alignment(vec![p1]),
        Some(Err(p1)),
    );

    assert_eq!(
        Placement::find_alignment(vec![p1, p1]),
        Some(Err(p1)),
    );

    assert_eq!(
        Placement::find_alignment(vec![p2, p1, p3]),
        Some(Ok(Placement(p1, Direction::Vertical))),
    );

    assert_eq!(
        Placement::find_alignment(vec![p3, p2]),
        Some(Ok(Placement(p2, Direction::Vertical))),
    );

    assert_eq!(
        Placement::find_alignment(vec![p4, p1]),
        Some(Ok(Placement(p1, Direction::Horizontal))),
    );

    assert_eq!(
        Placement::find_alignment(vec![p1, p2, p4]),
        None,
    );
}

#[test]
fn test_back_from_edge_leaves_table() {
    let table = Table::fill_with(3, 4, 0u8);
    let edge = Placement(Position::new(0, 2), Direction::Vertical);
    assert_eq!(table.get(edge.back().0), None);
    assert_eq!(table.get(edge.next().0), Some(&0));
    assert_eq!(table.get(Position::new(2, 4)), None);
    assert_eq!((table.rows(), table.cols()), (3, 4));
}

#[test]
fn test_neighbours_of_corner() {
    let table = Table::fill_with(2, 2, ());
    let on_board = Position::new(0, 0).neighbours()
        .filter(|&p| table.get(p).is_some())
        .collect::<Vec<_>>();
    assert_eq!(on_board, vec![Position::new(0, 1), Position::new(1, 0)]);
}
