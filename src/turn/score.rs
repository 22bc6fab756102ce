use crate::{Bonus, Direction, Grid, Placement, Position};

use super::word_extractor::Word;

/// Computes the points of the words of a move
#[derive(Debug, Clone)]
pub struct Scorer {
    /// When false, premiums under locked tiles are spent and those letters count at face value
    pub reuse_premiums: bool,
}

impl Default for Scorer {
    fn default() -> Self {
        Self { reuse_premiums: true }
    }
}

impl Scorer {
    /// Score of the word lying from `head` to `tail`, both included
    ///
    /// Letter multipliers apply to their own letter, word multipliers to the
    /// whole word and compound with each other.
    ///
    /// # Panics
    ///
    /// If the two ends are not on a common line, or if a cell in between is
    /// outside the board or empty.
    pub fn score_word(&self, grid: &Grid, head: Position, tail: Position) -> u32 {
        let dir = if head.row == tail.row {
            Direction::Horizontal
        } else {
            assert_eq!(head.col, tail.col, "{} and {} are not on a line", head, tail);
            Direction::Vertical
        };
        assert!(head[dir] <= tail[dir], "{} comes after {}", head, tail);

        let mut letter_sum = 0;
        let mut word_multiplier = 1;

        let mut place = Placement(head, dir);
        loop {
            let cell = match grid.get_cell(place.0) {
                Some(cell) => cell,
                None => panic!("scoring outside of the board at {}", place.0),
            };
            let tile = match cell.tile() {
                Some(tile) => tile,
                None => panic!("scoring an empty cell at {}", place.0),
            };
            let bonus = if self.reuse_premiums || !tile.is_locked() {
                cell.effective_bonus()
            } else {
                Bonus::NONE
            };
            letter_sum += tile.value() * bonus.letter;
            word_multiplier *= bonus.word;

            if place.0 == tail {
                break
            }
            place = place.next();
        }

        letter_sum * word_multiplier
    }

    /// Every word with its points, in the same order
    pub fn score_words(&self, grid: &Grid, words: &[Word]) -> Vec<(String, u32)> {
        words.iter()
            .map(|w| (w.text.clone(), self.score_word(grid, w.head, w.tail)))
            .collect()
    }
}
