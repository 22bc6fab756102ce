use std::collections::HashMap;

use super::{Position, Table};

/// The face value of each letter
pub trait LetterScoring {
    fn score_for(&self, letter: char) -> u32;
}

/// How much a square multiplies the letter lying on it, and the word it is part of
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bonus {
    pub letter: u32,
    pub word: u32,
}

impl Bonus {
    pub const NONE: Bonus = Bonus { letter: 1, word: 1 };
}

/// The permanent multiplier printed on a cell
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MultiplierClass {
    Normal,
    DoubleLetter,
    TripleLetter,
    DoubleWord,
    TripleWord,
}

impl Default for MultiplierClass {
    fn default() -> Self {
        Self::Normal
    }
}

impl MultiplierClass {
    pub fn bonus(self) -> Bonus {
        match self {
            Self::Normal => Bonus::NONE,
            Self::DoubleLetter => Bonus { letter: 2, word: 1 },
            Self::TripleLetter => Bonus { letter: 3, word: 1 },
            Self::DoubleWord => Bonus { letter: 1, word: 2 },
            Self::TripleWord => Bonus { letter: 1, word: 3 },
        }
    }

    /// Character used in layout descriptions and when rendering an empty cell
    pub fn glyph(self) -> char {
        match self {
            Self::Normal => '.',
            Self::DoubleLetter => 'd',
            Self::TripleLetter => 't',
            Self::DoubleWord => 'D',
            Self::TripleWord => 'T',
        }
    }

    pub fn from_glyph(c: char) -> Option<Self> {
        Some(match c {
            '.' | ' ' | '_' => Self::Normal,
            'd' => Self::DoubleLetter,
            't' => Self::TripleLetter,
            'D' => Self::DoubleWord,
            'T' => Self::TripleWord,
            _ => return None,
        })
    }
}

/// Decides the multiplier class of every cell when a grid is generated
pub trait BoardLayout {
    fn class_at(&self, position: Position) -> MultiplierClass;
}

pub struct EnglishScrabbleScoring;
impl LetterScoring for EnglishScrabbleScoring {
    fn score_for(&self, letter: char) -> u32 {
        match letter.to_ascii_uppercase() {
            'A' | 'E' | 'I' | 'L' | 'N' | 'O' | 'R' | 'S' | 'T' | 'U' => 1,
            'D' | 'G' => 2,
            'B' | 'C' | 'M' | 'P' => 3,
            'F' | 'H' | 'V' | 'W' | 'Y' => 4,
            'K' => 5,
            'J' | 'X' => 8,
            'Q' | 'Z' => 10,
            l => {
                log::warn!("unrecognized letter for score {}", l);
                0
            },
        }
    }
}

/// Letter values given explicitly, anything missing falls back to the english values
pub struct MapScoring {
    pub map: HashMap<char, u32>,
}

impl LetterScoring for MapScoring {
    fn score_for(&self, letter: char) -> u32 {
        match self.map.get(&letter.to_ascii_uppercase()) {
            Some(&value) => value,
            None => EnglishScrabbleScoring.score_for(letter),
        }
    }
}

/// The classic 15x15 premium square layout
pub struct ScrabbleLayout;

impl ScrabbleLayout {
    pub const SIZE: usize = 15;
}

impl BoardLayout for ScrabbleLayout {
    fn class_at(&self, position: Position) -> MultiplierClass {
        let Position { row, col } = position;

        if row >= Self::SIZE || col >= Self::SIZE {
            log::error!("index for bonus is out of board");
            return MultiplierClass::Normal;
        }

        fn fold_half(a: usize) -> usize {
            if a >= 7 {
                a - 7
            } else {
                7 - a
            }
        }

        // use the fact the bonus are symetrical from center
        let row = fold_half(row);
        let col = fold_half(col);

        match (row, col) {
            | (7, 0) | (0, 7)
            | (7, 7) => MultiplierClass::TripleWord,

            | (1, 1)
            | (4, 0) | (0, 4)
            | (5, 1) | (1, 5)
            | (7, 4) | (4, 7) => MultiplierClass::DoubleLetter,

            | (2, 2)
            | (6, 2) | (2, 6) => MultiplierClass::TripleLetter,

            (row, col) if row == col => MultiplierClass::DoubleWord,

            _ => MultiplierClass::Normal,
        }
    }
}

/// Every cell is normal
pub struct PlainLayout;

impl BoardLayout for PlainLayout {
    fn class_at(&self, _position: Position) -> MultiplierClass {
        MultiplierClass::Normal
    }
}

/// An explicit class per cell, anything outside the table is normal
impl BoardLayout for Table<MultiplierClass> {
    fn class_at(&self, position: Position) -> MultiplierClass {
        self.get(position).copied().unwrap_or_default()
    }
}

/// Parses a layout written one row per string, with the characters of `MultiplierClass::glyph`
pub fn parse_layout<S: AsRef<str>>(rows: &[S]) -> Result<Table<MultiplierClass>, char> {
    let squares = rows.iter()
        .map(|row| row.as_ref().chars()
            .map(|c| MultiplierClass::from_glyph(c).ok_or(c))
            .collect::<Result<Vec<_>, _>>()
        )
        .collect::<Result<Vec<_>, _>>()?;
    // ragged rows are padded with normal cells
    let cols = squares.iter().map(|r| r.len()).max().unwrap_or(0);
    Ok(Table::from_fn(squares.len(), cols, |pos| {
        squares[pos.row].get(pos.col).copied().unwrap_or_default()
    }))
}


#[test]
fn test_scrabble_layout_landmarks() {
    let layout = ScrabbleLayout;
    assert_eq!(layout.class_at(Position::new(0, 0)), MultiplierClass::TripleWord);
    assert_eq!(layout.class_at(Position::new(7, 14)), MultiplierClass::TripleWord);
    assert_eq!(layout.class_at(Position::new(7, 7)), MultiplierClass::DoubleWord);
    assert_eq!(layout.class_at(Position::new(1, 1)), MultiplierClass::DoubleWord);
    assert_eq!(layout.class_at(Position::new(0, 3)), MultiplierClass::DoubleLetter);
    assert_eq!(layout.class_at(Position::new(5, 5)), MultiplierClass::TripleLetter);
    assert_eq!(layout.class_at(Position::new(0, 1)), MultiplierClass::Normal);
    assert_eq!(layout.class_at(Position::new(15, 0)), MultiplierClass::Normal);
}

#[test]
fn test_scrabble_layout_is_symmetric() {
    let layout = ScrabbleLayout;
    for row in 0..15 {
        for col in 0..15 {
            let c = layout.class_at(Position::new(row, col));
            assert_eq!(c, layout.class_at(Position::new(col, row)));
            assert_eq!(c, layout.class_at(Position::new(14 - row, col)));
        }
    }
}

#[test]
fn test_parse_layout() {
    let table = parse_layout(&["T.d", "tD"]).unwrap();
    assert_eq!(table.class_at(Position::new(0, 0)), MultiplierClass::TripleWord);
    assert_eq!(table.class_at(Position::new(0, 2)), MultiplierClass::DoubleLetter);
    assert_eq!(table.class_at(Position::new(1, 0)), MultiplierClass::TripleLetter);
    assert_eq!(table.class_at(Position::new(1, 1)), MultiplierClass::DoubleWord);
    assert_eq!(table.class_at(Position::new(1, 2)), MultiplierClass::Normal);
    assert_eq!(parse_layout(&["..x"]), Err('x'));
}

#[test]
fn test_map_scoring_falls_back() {
    let mut map = HashMap::new();
    map.insert('Q', 4);
    let scoring = MapScoring { map };
    assert_eq!(scoring.score_for('q'), 4);
    assert_eq!(scoring.score_for('Z'), 10);
    assert_eq!(EnglishScrabbleScoring.score_for('c'), 3);
}
