use std::hash::{Hash, Hasher};

use crate::{Cell, Direction, Grid, Placement, Position};

/// Decides whether an occupied cell counts as a letter when forming words
///
/// Board effects that garble a tile use this to take it out of every word.
pub trait LetterOverlay {
    fn is_real_letter(&self, pos: Position) -> bool;
}

/// Every tile is a real letter
pub struct NoOverlay;

impl LetterOverlay for NoOverlay {
    fn is_real_letter(&self, _pos: Position) -> bool {
        true
    }
}

impl<F: Fn(Position) -> bool> LetterOverlay for F {
    fn is_real_letter(&self, pos: Position) -> bool {
        self(pos)
    }
}

/// A run of letters read off the board
///
/// Two words are the same when they have the same letters at the same place,
/// whichever axis they were found from.
#[derive(Debug, Clone, Eq)]
pub struct Word {
    /// Uppercase letters
    pub text: String,
    pub head: Position,
    pub tail: Position,
    pub direction: Direction,
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.head == other.head && self.tail == other.tail
    }
}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.head.hash(state);
        self.tail.hash(state);
    }
}

impl Word {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Every position from head to tail
    pub fn positions(&self) -> impl Iterator<Item=Position> {
        let dir = self.direction;
        let head = self.head;
        (self.head[dir]..=self.tail[dir]).map(move |i| {
            let mut pos = head;
            pos[dir] = i;
            pos
        })
    }
}

pub struct WordExtractor<'a> {
    grid: &'a Grid,
    overlay: &'a dyn LetterOverlay,
}

impl<'a> WordExtractor<'a> {
    pub fn new(grid: &'a Grid, overlay: &'a dyn LetterOverlay) -> Self {
        Self { grid, overlay }
    }

    /// The letter at `pos` if it is occupied and not excluded by the overlay
    pub fn real_letter(&self, pos: Position) -> Option<char> {
        let tile = self.grid.get_cell(pos).and_then(Cell::tile)?;
        if self.overlay.is_real_letter(pos) {
            Some(tile.letter())
        } else {
            None
        }
    }

    pub fn is_real_letter(&self, pos: Position) -> bool {
        self.real_letter(pos).is_some()
    }

    /// Nothing word-forming touches either end
    pub fn is_closed(&self, head: Placement, tail: Placement) -> bool {
        !self.is_real_letter(head.back().0) && !self.is_real_letter(tail.next().0)
    }

    /// The complete word running through `start` along `axis`
    ///
    /// None when `start` is not a real letter. A lone letter comes back as a
    /// one letter word, it is up to the caller to ignore it.
    pub fn extract_word(&self, start: Position, axis: Direction) -> Option<Word> {
        if !self.is_real_letter(start) {
            return None
        }

        let mut head = Placement(start, axis);
        while self.is_real_letter(head.back().0) {
            head = head.back();
        }

        let mut text = String::new();
        let mut tail = head;
        let mut current = head;
        while let Some(letter) = self.real_letter(current.0) {
            text.push(letter);
            tail = current;
            current = current.next();
        }

        if !self.is_closed(head, tail) {
            return None
        }

        Some(Word {
            text,
            head: head.0,
            tail: tail.0,
            direction: axis,
        })
    }
}


#[cfg(test)]
use crate::{Tile, TileId, score_rules::PlainLayout};

#[cfg(test)]
fn grid_with(rows: &[&str]) -> Grid {
    let mut grid = Grid::new(rows.len(), rows[0].len(), &PlainLayout);
    let mut id = 0;
    for (row, line) in rows.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            if c.is_ascii_alphabetic() {
                id += 1;
                grid.place_tile(Position::new(row, col), Tile::new(TileId(id), c, 1)).unwrap();
            }
        }
    }
    grid
}

#[test]
fn test_walks_to_both_ends() {
    let grid = grid_with(&[
        ".....",
        "CATS.",
        ".....",
    ]);
    let extractor = WordExtractor::new(&grid, &NoOverlay);
    for col in 0..4 {
        let word = extractor.extract_word(Position::new(1, col), Direction::Horizontal).unwrap();
        assert_eq!(word.text, "CATS");
        assert_eq!(word.head, Position::new(1, 0));
        assert_eq!(word.tail, Position::new(1, 3));
    }
    assert!(extractor.extract_word(Position::new(1, 4), Direction::Horizontal).is_none());
}

#[test]
fn test_lone_letter_is_a_closed_one_letter_word() {
    let grid = grid_with(&[
        "...",
        ".Q.",
        "...",
    ]);
    let extractor = WordExtractor::new(&grid, &NoOverlay);
    let word = extractor.extract_word(Position::new(1, 1), Direction::Vertical).unwrap();
    assert_eq!(word.text, "Q");
    assert_eq!(word.len(), 1);
    assert_eq!(word.head, word.tail);
}

#[test]
fn test_vertical_word_touching_edges() {
    let grid = grid_with(&[
        "O..",
        "X..",
        "E..",
        "N..",
    ]);
    let extractor = WordExtractor::new(&grid, &NoOverlay);
    let word = extractor.extract_word(Position::new(2, 0), Direction::Vertical).unwrap();
    assert_eq!(word.text, "OXEN");
    assert_eq!(word.positions().collect::<Vec<_>>(), (0..4).map(|r| Position::new(r, 0)).collect::<Vec<_>>());
    assert!(extractor.is_closed(Placement(word.head, Direction::Vertical), Placement(word.tail, Direction::Vertical)));
}

#[test]
fn test_excluded_letter_splits_words() {
    let grid = grid_with(&[
        "DOGXCAT",
    ]);
    let garbled = |pos: Position| pos.col != 3;
    let extractor = WordExtractor::new(&grid, &garbled);

    let dog = extractor.extract_word(Position::new(0, 1), Direction::Horizontal).unwrap();
    assert_eq!(dog.text, "DOG");
    let cat = extractor.extract_word(Position::new(0, 6), Direction::Horizontal).unwrap();
    assert_eq!(cat.text, "CAT");
    assert_eq!(cat.head, Position::new(0, 4));
    assert!(extractor.extract_word(Position::new(0, 3), Direction::Horizontal).is_none());

    let plain = WordExtractor::new(&grid, &NoOverlay);
    assert_eq!(plain.extract_word(Position::new(0, 0), Direction::Horizontal).unwrap().text, "DOGXCAT");
}

#[test]
fn test_same_word_from_either_axis_is_equal() {
    let a = Word { text: "AT".into(), head: Position::new(0, 0), tail: Position::new(0, 1), direction: Direction::Horizontal };
    let b = Word { direction: Direction::Vertical, ..a.clone() };
    assert_eq!(a, b);
    assert_ne!(a, Word { tail: Position::new(1, 0), ..b });
}
