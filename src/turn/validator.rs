use crate::{Direction, Grid, Placement, Position, TileId};

use super::RejectReason;
use super::word_extractor::{LetterOverlay, Word, WordExtractor};

/// A tile put on the board since the last commit
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlacedTile {
    pub id: TileId,
    pub pos: Position,
}

/// Checks the shape of a move and lists the words it forms
#[derive(Debug, Default)]
pub struct MoveValidator;

impl MoveValidator {
    /// All the distinct words of two letters or more formed by `placed`
    ///
    /// The checks run in order and the first one failing decides the reason:
    /// overwrite, single line, gaps, center on the first move, connection,
    /// then every placed letter the overlay keeps must belong to a word.
    pub fn validate(&self, grid: &Grid, overlay: &dyn LetterOverlay, placed: &[PlacedTile]) -> Result<Vec<Word>, RejectReason> {
        if placed.is_empty() {
            return Ok(vec![])
        }

        for p in placed {
            let owner = grid.get_cell(p.pos).and_then(|c| c.tile());
            match owner {
                Some(tile) if tile.id() == p.id && !tile.is_locked() => {},
                _ => return Err(RejectReason::Overwrite { pos: p.pos }),
            }
        }

        let mut positions = placed.iter().map(|p| p.pos).collect::<Vec<_>>();
        positions.sort_unstable();
        positions.dedup();

        let dir = match Placement::find_alignment(positions.iter().copied()) {
            None => return Err(RejectReason::NotInLine),
            Some(Err(_)) => Direction::Horizontal,
            Some(Ok(Placement(_, dir))) => dir,
        };

        check_gaps(grid, &positions, dir)?;

        if grid.has_locked_tile() {
            let connected = positions.iter()
                .any(|p| p.neighbours().any(|n| grid.is_locked_tile_at(n)));
            if !connected {
                return Err(RejectReason::NotConnected);
            }
        } else {
            let center = grid.center();
            if !positions.contains(&center) {
                return Err(RejectReason::CenterNotCovered { center });
            }
        }

        // a garbled tile splits the main line, so every placed cell gets read on both axes
        let extractor = WordExtractor::new(grid, overlay);
        let candidates = positions.iter().map(|&p| extractor.extract_word(p, dir))
            .chain(positions.iter().map(|&p| extractor.extract_word(p, dir.perp())))
            .flatten();

        let mut words: Vec<Word> = vec![];
        for word in candidates {
            if word.len() >= 2 && !words.contains(&word) {
                words.push(word);
            }
        }
        log::debug!("move forms {:?}", words.iter().map(|w| &w.text).collect::<Vec<_>>());

        // every real letter placed must end up in a word, garbled ones are exempt
        let stray = positions.iter().any(|&p| {
            extractor.is_real_letter(p) && !words.iter().any(|w| w.positions().any(|q| q == p))
        });
        if words.is_empty() || stray {
            return Err(RejectReason::NoWordFormed);
        }
        Ok(words)
    }
}

/// Between two consecutive placed tiles every cell must hold a locked tile
fn check_gaps(grid: &Grid, positions: &[Position], dir: Direction) -> Result<(), RejectReason> {
    // positions are sorted, and along a single line that is the order along `dir`
    for pair in positions.windows(2) {
        let mut between = Placement(pair[0], dir).next();
        while between.0 != pair[1] {
            if !grid.is_locked_tile_at(between.0) {
                return Err(RejectReason::Gap { pos: between.0 });
            }
            between = between.next();
        }
    }
    Ok(())
}
