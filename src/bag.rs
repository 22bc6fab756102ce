//! The bag tiles are drawn from

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{LetterScoring, Tile, TileId};

/// Letter counts of the english game, without the blanks
pub const ENGLISH_DISTRIBUTION: &[(char, u32)] = &[
    ('A', 9), ('B', 2), ('C', 2), ('D', 4), ('E', 12), ('F', 2), ('G', 3),
    ('H', 2), ('I', 9), ('J', 1), ('K', 1), ('L', 4), ('M', 2), ('N', 6),
    ('O', 8), ('P', 2), ('Q', 1), ('R', 6), ('S', 4), ('T', 6), ('U', 4),
    ('V', 2), ('W', 2), ('X', 1), ('Y', 2), ('Z', 1),
];

/// What a tile is made of, before it is drawn
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Blueprint {
    letter: char,
    value: u32,
}

/// A finite multiset of letters, drawn without replacement
#[derive(Debug)]
pub struct TileSource {
    initial: Vec<Blueprint>,
    pool: Vec<Blueprint>,
    /// Every `special_interval`th draw is special, 0 never
    special_interval: u32,
    draws: u64,
    next_id: u64,
    infinite_until: Option<Instant>,
    rng: StdRng,
}

impl TileSource {
    pub const DEFAULT_SPECIAL_INTERVAL: u32 = 6;

    /// A bag holding `count` tiles of each letter, valued with `scoring`
    pub fn new(composition: impl IntoIterator<Item=(char, u32)>, scoring: &impl LetterScoring) -> Self {
        let initial = composition.into_iter()
            .flat_map(|(letter, count)| {
                let letter = letter.to_ascii_uppercase();
                let value = scoring.score_for(letter);
                std::iter::repeat(Blueprint { letter, value }).take(count as usize)
            })
            .collect::<Vec<_>>();
        Self {
            pool: initial.clone(),
            initial,
            special_interval: Self::DEFAULT_SPECIAL_INTERVAL,
            draws: 0,
            next_id: 0,
            infinite_until: None,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Makes the draw order reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_special_interval(mut self, interval: u32) -> Self {
        self.special_interval = interval;
        self
    }

    /// Takes a random tile out of the bag, None when it is empty
    ///
    /// While the infinite mode is active the bag is not depleted.
    pub fn draw(&mut self) -> Option<Tile> {
        let blueprint = if self.is_infinite() {
            let source = if self.pool.is_empty() { &self.initial } else { &self.pool };
            if source.is_empty() {
                return None
            }
            source[self.rng.random_range(0..source.len())]
        } else {
            if self.pool.is_empty() {
                return None
            }
            let i = self.rng.random_range(0..self.pool.len());
            self.pool.swap_remove(i)
        };

        self.draws += 1;
        let special = self.special_interval != 0 && self.draws % self.special_interval as u64 == 0;
        self.next_id += 1;
        let tile = Tile::new(TileId(self.next_id), blueprint.letter, blueprint.value).with_special(special);
        log::debug!("drew {:?} ({} remaining)", tile, self.pool.len());
        Some(tile)
    }

    /// Puts a tile back in the bag
    pub fn return_tile(&mut self, tile: Tile) {
        self.pool.push(Blueprint { letter: tile.letter(), value: tile.value() });
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    pub fn total_initial(&self) -> usize {
        self.initial.len()
    }

    /// For `duration`, drawing keeps producing tiles without emptying the bag
    pub fn activate_infinite_mode(&mut self, duration: Duration) {
        self.infinite_until = Some(Instant::now() + duration);
    }

    pub fn is_infinite(&self) -> bool {
        self.infinite_until.map_or(false, |until| Instant::now() < until)
    }

    /// Back to the initial composition, with the special counter and infinite mode reset
    pub fn reset_pool(&mut self) {
        self.pool = self.initial.clone();
        self.draws = 0;
        self.infinite_until = None;
    }
}


#[cfg(test)]
fn small_bag() -> TileSource {
    use super::score_rules::EnglishScrabbleScoring;
    TileSource::new(vec![('c', 1), ('a', 2), ('t', 1)], &EnglishScrabbleScoring).with_seed(7)
}

#[test]
fn test_draw_without_replacement() {
    let mut bag = small_bag();
    assert_eq!(bag.total_initial(), 4);

    let mut letters = vec![];
    while let Some(tile) = bag.draw() {
        assert_eq!(tile.value(), if tile.letter() == 'C' { 3 } else { 1 });
        letters.push(tile.letter());
    }
    letters.sort_unstable();
    assert_eq!(letters, vec!['A', 'A', 'C', 'T']);
    assert_eq!(bag.remaining(), 0);
    assert!(bag.draw().is_none());
    assert_eq!(bag.total_initial(), 4);
}

#[test]
fn test_return_grows_remaining() {
    let mut bag = small_bag();
    let tile = bag.draw().unwrap();
    assert_eq!(bag.remaining(), 3);
    bag.return_tile(tile);
    assert_eq!(bag.remaining(), 4);
}

#[test]
fn test_every_sixth_draw_is_special() {
    let mut bag = TileSource::new(ENGLISH_DISTRIBUTION.iter().copied(), &super::score_rules::EnglishScrabbleScoring)
        .with_seed(1);
    let specials = (1..=18)
        .filter(|_| bag.draw().unwrap().is_special())
        .count();
    assert_eq!(specials, 3);

    let mut bag = small_bag().with_special_interval(0);
    while let Some(tile) = bag.draw() {
        assert!(!tile.is_special());
    }
}

#[test]
fn test_infinite_mode_does_not_deplete() {
    let mut bag = small_bag().with_special_interval(2);
    bag.activate_infinite_mode(Duration::from_secs(60));
    assert!(bag.is_infinite());

    let tiles = (0..10).map(|_| bag.draw().unwrap()).collect::<Vec<_>>();
    assert_eq!(bag.remaining(), 4);
    assert_eq!(tiles.iter().filter(|t| t.is_special()).count(), 5);

    bag.reset_pool();
    assert!(!bag.is_infinite());
    assert!(!bag.draw().unwrap().is_special());
    assert!(bag.draw().unwrap().is_special());
}

#[test]
fn test_expired_infinite_mode() {
    let mut bag = small_bag();
    bag.activate_infinite_mode(Duration::from_secs(0));
    assert!(!bag.is_infinite());
    bag.draw().unwrap();
    assert_eq!(bag.remaining(), 3);
}

#[test]
fn test_same_seed_same_draws() {
    let mut a = small_bag();
    let mut b = small_bag();
    for _ in 0..4 {
        assert_eq!(a.draw().map(|t| t.letter()), b.draw().map(|t| t.letter()));
    }
}

#[test]
fn test_ids_are_unique() {
    let mut bag = small_bag();
    let first = bag.draw().unwrap();
    bag.reset_pool();
    let second = bag.draw().unwrap();
    assert_ne!(first.id(), second.id());
}
