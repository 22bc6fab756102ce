use std::fmt;

use thiserror::Error;

use super::{Tile, TileSource};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RackError {
    #[error("rack slot {0} does not exist")]
    NoSuchSlot(usize),
    #[error("rack slot {0} is empty")]
    EmptySlot(usize),
}

/// The player's tiles that are not on the board yet
#[derive(Debug)]
pub struct Rack {
    slots: Vec<Option<Tile>>,
}

impl Rack {
    pub const DEFAULT_SIZE: usize = 7;

    pub fn new(size: usize) -> Self {
        Self {
            slots: (0..size).map(|_| None).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, slot: usize) -> Option<&Tile> {
        self.slots.get(slot)?.as_ref()
    }

    pub fn take(&mut self, slot: usize) -> Result<Tile, RackError> {
        self.slots.get_mut(slot)
            .ok_or(RackError::NoSuchSlot(slot))?
            .take()
            .ok_or(RackError::EmptySlot(slot))
    }

    /// Puts a tile in the given slot, handing it back if the slot is missing or taken
    pub fn put(&mut self, slot: usize, tile: Tile) -> Result<(), Tile> {
        match self.slots.get_mut(slot) {
            Some(s) if s.is_none() => {
                *s = Some(tile);
                Ok(())
            },
            _ => Err(tile),
        }
    }

    /// Puts a tile in the first free slot
    pub fn stow(&mut self, tile: Tile) -> Result<usize, Tile> {
        match self.slots.iter().position(Option::is_none) {
            Some(slot) => {
                self.slots[slot] = Some(tile);
                Ok(slot)
            },
            None => Err(tile),
        }
    }

    /// First slot holding `letter`
    pub fn find(&self, letter: char) -> Option<usize> {
        let letter = letter.to_ascii_uppercase();
        self.slots.iter().position(|s| s.as_ref().map_or(false, |t| t.letter() == letter))
    }

    pub fn tiles(&self) -> impl Iterator<Item=&Tile> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.tiles().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fills the empty slots from `source`, slots stay empty once it runs dry
    ///
    /// Returns the number of tiles drawn.
    pub fn refill(&mut self, source: &mut TileSource) -> usize {
        let mut drawn = 0;
        for slot in self.slots.iter_mut().filter(|s| s.is_none()) {
            match source.draw() {
                Some(tile) => {
                    *slot = Some(tile);
                    drawn += 1;
                },
                None => break,
            }
        }
        drawn
    }
}

impl fmt::Display for Rack {
    /// One character per slot, `_` for an empty one
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for slot in &self.slots {
            write!(f, "{}", slot.as_ref().map_or('_', Tile::letter))?;
        }
        Ok(())
    }
}


#[cfg(test)]
use super::{TileId, score_rules::EnglishScrabbleScoring};

#[test]
fn test_take_and_put() {
    let mut rack = Rack::new(3);
    rack.put(1, Tile::new(TileId(1), 'q', 10)).unwrap();
    assert_eq!(rack.to_string(), "_Q_");
    assert_eq!(rack.find('q'), Some(1));
    assert_eq!(rack.find('z'), None);

    assert_eq!(rack.take(0), Err(RackError::EmptySlot(0)));
    assert_eq!(rack.take(3), Err(RackError::NoSuchSlot(3)));

    let err = rack.put(1, Tile::new(TileId(2), 'x', 8)).unwrap_err();
    assert_eq!(err.letter(), 'X');

    let q = rack.take(1).unwrap();
    assert_eq!(q.id(), TileId(1));
    assert!(rack.is_empty());
}

#[test]
fn test_stow_fills_first_gap() {
    let mut rack = Rack::new(2);
    assert_eq!(rack.stow(Tile::new(TileId(1), 'a', 1)), Ok(0));
    assert_eq!(rack.stow(Tile::new(TileId(2), 'b', 3)), Ok(1));
    assert!(rack.stow(Tile::new(TileId(3), 'c', 3)).is_err());
    assert_eq!(rack.len(), 2);
}

#[test]
fn test_refill_stops_when_dry() {
    let mut source = TileSource::new(vec![('e', 3)], &EnglishScrabbleScoring).with_seed(3);
    let mut rack = Rack::new(5);
    assert_eq!(rack.refill(&mut source), 3);
    assert_eq!(rack.to_string(), "EEE__");
    assert_eq!(source.remaining(), 0);

    rack.take(1).unwrap();
    assert_eq!(rack.refill(&mut source), 0);
    assert_eq!(rack.to_string(), "E_E__");
}
