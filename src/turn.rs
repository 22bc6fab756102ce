pub mod word_extractor;
pub mod validator;
pub mod score;

use std::collections::HashMap;
use std::convert::TryFrom;

use thiserror::Error;

use super::{Grid, Lexicon, Position, Rack, RackError, Tile, TileId, TileSource};
use super::grid::PlaceError;
use super::settings::{GameConfig, SettingsError};

pub use word_extractor::{LetterOverlay, NoOverlay, Word, WordExtractor};
pub use validator::{MoveValidator, PlacedTile};
pub use score::Scorer;

/// Why a move was turned down
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("a tile was placed over another one at {pos}")]
    Overwrite { pos: Position },
    #[error("the tiles are not on a single row or column")]
    NotInLine,
    #[error("the tiles leave a gap at {pos}")]
    Gap { pos: Position },
    #[error("the first move must cover the center {center}")]
    CenterNotCovered { center: Position },
    #[error("the tiles do not touch any word on the board")]
    NotConnected,
    /// The move is well placed but leaves a placed letter outside of every
    /// word of two letters or more, such as a lone tile on the first move.
    /// Not a shape or dictionary failure of its own: it guards the rule
    /// that every committed letter scores in some word.
    #[error("the tiles do not form any word")]
    NoWordFormed,
    #[error("{word} is not in the dictionary")]
    WordNotFound { word: String },
}

/// Errors when moving tiles between the rack and the board before a confirm
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error(transparent)]
    Rack(#[from] RackError),
    #[error("cell {0} already holds a tile")]
    Occupied(Position),
    #[error("{0} is outside the board")]
    OutOfBounds(Position),
    #[error("no tile placed this turn at {0}")]
    NothingToRecall(Position),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Validating,
    Scoring,
    Committed,
    Rejected,
}

/// Outcome of a confirm that had tiles to look at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    pub committed: bool,
    /// Each word formed with its points, empty when rejected
    pub words_scored: Vec<(String, u32)>,
    /// Change of the running total: the move score, or minus the penalty
    pub total_delta: i64,
    pub rejection: Option<RejectReason>,
    /// Points actually taken off, which the floor at 0 can make smaller than the computed penalty
    pub penalty: u32,
}

/// Gets told about each confirm, once it has reached its terminal state
///
/// `words_extracted` comes first when the shape of the move was accepted,
/// whatever the dictionary said, then `committed` or `rejected`.
pub trait TurnObserver {
    fn words_extracted(&mut self, _words: &[Word]) {}
    fn committed(&mut self, _result: &TurnResult) {}
    fn rejected(&mut self, _result: &TurnResult) {}
}

/// Penalty for a rejected move: `fraction` of `face_value`, rounded up
///
/// The fraction is taken to the thousandth so that rounding up is exact.
pub fn penalty_for(face_value: u32, fraction: f64) -> u32 {
    let per_mille = (fraction.max(0.0) * 1000.0).round() as u64;
    let penalty = (face_value as u64).saturating_mul(per_mille).saturating_add(999) / 1000;
    u32::try_from(penalty).unwrap_or(u32::MAX)
}

/// Runs the turns of one player
pub struct TurnEngine<L> {
    grid: Grid,
    source: TileSource,
    rack: Rack,
    lexicon: L,
    validator: MoveValidator,
    scorer: Scorer,
    overlay: Box<dyn LetterOverlay>,
    observers: Vec<Box<dyn TurnObserver>>,
    /// Rack slot each tile on the board this turn was taken from
    origins: HashMap<TileId, usize>,
    penalty_fraction: f64,
    bingo_bonus: u32,
    state: TurnState,
    score: u32,
}

impl<L: Lexicon> TurnEngine<L> {
    pub const DEFAULT_PENALTY_FRACTION: f64 = 0.5;

    /// An engine over the given parts; the rack is not filled
    pub fn new(grid: Grid, source: TileSource, rack: Rack, lexicon: L) -> Self {
        Self {
            grid,
            source,
            rack,
            lexicon,
            validator: MoveValidator,
            scorer: Scorer::default(),
            overlay: Box::new(NoOverlay),
            observers: vec![],
            origins: HashMap::new(),
            penalty_fraction: Self::DEFAULT_PENALTY_FRACTION,
            bingo_bonus: 0,
            state: TurnState::Idle,
            score: 0,
        }
    }

    /// An engine set up from `conf`, with a full rack
    pub fn from_config(conf: &GameConfig, lexicon: L) -> Result<Self, SettingsError> {
        conf.validate()?;
        let mut engine = Self::new(conf.grid()?, conf.tile_source()?, Rack::new(conf.rack_size), lexicon)
            .with_scorer(Scorer { reuse_premiums: conf.reuse_premiums })
            .with_penalty_fraction(conf.penalty_fraction)
            .with_bingo_bonus(conf.bingo_bonus);
        engine.refill_rack();
        Ok(engine)
    }

    pub fn with_scorer(mut self, scorer: Scorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Fraction of the face value lost on a rejection, clamped to `0.0..=1.0`
    pub fn with_penalty_fraction(mut self, fraction: f64) -> Self {
        self.penalty_fraction = if fraction.is_nan() {
            Self::DEFAULT_PENALTY_FRACTION
        } else {
            fraction.max(0.0).min(1.0)
        };
        self
    }

    pub fn with_bingo_bonus(mut self, bonus: u32) -> Self {
        self.bingo_bonus = bonus;
        self
    }

    pub fn set_overlay(&mut self, overlay: Box<dyn LetterOverlay>) {
        self.overlay = overlay;
    }

    pub fn add_observer(&mut self, observer: Box<dyn TurnObserver>) {
        self.observers.push(observer);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// For board effects between turns
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn rack(&self) -> &Rack {
        &self.rack
    }

    pub fn source(&self) -> &TileSource {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut TileSource {
        &mut self.source
    }

    pub fn lexicon(&self) -> &L {
        &self.lexicon
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_confirm_in_progress(&self) -> bool {
        self.state != TurnState::Idle
    }

    /// Draws into the empty rack slots, returns how many tiles were drawn
    pub fn refill_rack(&mut self) -> usize {
        self.rack.refill(&mut self.source)
    }

    /// Moves the tile of a rack slot onto the board
    pub fn place(&mut self, slot: usize, pos: Position) -> Result<(), PlacementError> {
        let tile = self.rack.take(slot)?;
        let id = tile.id();
        match self.grid.place_tile(pos, tile) {
            Ok(()) => {
                self.origins.insert(id, slot);
                Ok(())
            },
            Err(e) => {
                let err = match &e {
                    PlaceError::Occupied { .. } => PlacementError::Occupied(pos),
                    PlaceError::OutOfBounds { .. } => PlacementError::OutOfBounds(pos),
                };
                self.origins.insert(id, slot);
                self.return_to_rack(e.into_tile());
                Err(err)
            },
        }
    }

    /// Takes back a tile placed this turn
    pub fn recall(&mut self, pos: Position) -> Result<(), PlacementError> {
        let pending = self.grid.get_cell(pos).map_or(false, |c| c.has_pending_tile());
        if !pending {
            return Err(PlacementError::NothingToRecall(pos));
        }
        if let Some(tile) = self.grid.remove_tile(pos) {
            self.return_to_rack(tile);
        }
        Ok(())
    }

    /// Takes back every tile placed this turn, returns how many there were
    pub fn recall_all(&mut self) -> usize {
        let pending = self.grid.pending();
        for &pos in &pending {
            if let Some(tile) = self.grid.remove_tile(pos) {
                self.return_to_rack(tile);
            }
        }
        pending.len()
    }

    /// Back to the slot it came from if free, else any free slot, else the tile source
    fn return_to_rack(&mut self, tile: Tile) {
        let tile = match self.origins.remove(&tile.id()) {
            Some(slot) => match self.rack.put(slot, tile) {
                Ok(()) => return,
                Err(tile) => tile,
            },
            None => tile,
        };
        if let Err(tile) = self.rack.stow(tile) {
            self.source.return_tile(tile);
        }
    }

    /// Plays the tiles placed since the last commit
    ///
    /// None when nothing is placed, or when a confirm is already running.
    pub fn confirm(&mut self) -> Option<TurnResult> {
        if self.is_confirm_in_progress() {
            log::warn!("confirm ignored, another one is in progress ({:?})", self.state);
            return None
        }

        let placed = self.grid.pending().into_iter()
            .filter_map(|pos| {
                let tile = self.grid.get_cell(pos)?.tile()?;
                Some(PlacedTile { id: tile.id(), pos })
            })
            .collect::<Vec<_>>();
        // tiles taken off the board by something else no longer have a slot to go back to
        self.origins.retain(|id, _| placed.iter().any(|p| p.id == *id));
        if placed.is_empty() {
            return None
        }

        self.state = TurnState::Validating;
        let (words, verdict) = match self.validator.validate(&self.grid, self.overlay.as_ref(), &placed) {
            Ok(words) => {
                let missing = words.iter()
                    .find(|w| !self.lexicon.contains(&w.text))
                    .map(|w| RejectReason::WordNotFound { word: w.text.clone() });
                (words, missing)
            },
            Err(reason) => (vec![], Some(reason)),
        };

        let result = match verdict {
            None => self.commit(&placed, &words),
            Some(reason) => self.reject(&placed, reason),
        };

        // observers only ever see a finished confirm
        for observer in self.observers.iter_mut() {
            if !words.is_empty() {
                observer.words_extracted(&words);
            }
            if result.committed {
                observer.committed(&result);
            } else {
                observer.rejected(&result);
            }
        }
        self.state = TurnState::Idle;

        Some(result)
    }

    fn commit(&mut self, placed: &[PlacedTile], words: &[Word]) -> TurnResult {
        self.state = TurnState::Scoring;
        let words_scored = self.scorer.score_words(&self.grid, words);
        let mut move_score = words_scored.iter().map(|(_, s)| s).sum::<u32>();
        if self.bingo_bonus > 0 && placed.len() == self.rack.size() {
            move_score += self.bingo_bonus;
        }

        for p in placed {
            self.grid.lock(p.pos);
            self.origins.remove(&p.id);
        }
        self.score = self.score.saturating_add(move_score);
        let drawn = self.refill_rack();

        self.state = TurnState::Committed;
        log::info!(
            "committed {:?} for {} points, total {} ({} tiles drawn)",
            words_scored, move_score, self.score, drawn,
        );
        TurnResult {
            committed: true,
            words_scored,
            total_delta: move_score as i64,
            rejection: None,
            penalty: 0,
        }
    }

    fn reject(&mut self, placed: &[PlacedTile], reason: RejectReason) -> TurnResult {
        let face_value = placed.iter()
            .filter_map(|p| self.grid.get_cell(p.pos)?.tile().map(Tile::value))
            .sum::<u32>();
        let penalty = penalty_for(face_value, self.penalty_fraction).min(self.score);
        self.score -= penalty;

        for p in placed {
            if let Some(tile) = self.grid.remove_tile(p.pos) {
                self.return_to_rack(tile);
            }
        }
        self.refill_rack();

        self.state = TurnState::Rejected;
        log::warn!("move rejected: {} (-{} points, total {})", reason, penalty, self.score);
        TurnResult {
            committed: false,
            words_scored: vec![],
            total_delta: -(penalty as i64),
            rejection: Some(reason),
            penalty,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use crate::{FstLexicon, MultiplierClass};
    use crate::score_rules::{EnglishScrabbleScoring, PlainLayout};

    /// 5x5 plain board, a bag holding exactly `letters`, and a full rack of `rack_size`
    fn engine(letters: &str, rack_size: usize, words: &[&str]) -> TurnEngine<FstLexicon> {
        let composition = letters.chars().map(|c| (c, 1)).collect::<Vec<_>>();
        let source = TileSource::new(composition, &EnglishScrabbleScoring).with_seed(5);
        let lexicon = FstLexicon::from_words(words.iter()).unwrap();
        let mut engine = TurnEngine::new(Grid::new(5, 5, &PlainLayout), source, Rack::new(rack_size), lexicon);
        engine.refill_rack();
        engine
    }

    fn place_letter(engine: &mut TurnEngine<FstLexicon>, letter: char, row: usize, col: usize) {
        let slot = engine.rack().find(letter).unwrap();
        engine.place(slot, Position::new(row, col)).unwrap();
    }

    #[derive(Default)]
    struct Log(Rc<RefCell<Vec<String>>>);

    impl TurnObserver for Log {
        fn words_extracted(&mut self, words: &[Word]) {
            self.0.borrow_mut().push(format!("words {}", words.len()));
        }
        fn committed(&mut self, result: &TurnResult) {
            self.0.borrow_mut().push(format!("committed {}", result.total_delta));
        }
        fn rejected(&mut self, result: &TurnResult) {
            self.0.borrow_mut().push(format!("rejected {}", result.total_delta));
        }
    }

    #[test]
    fn penalty_rounds_up() {
        assert_eq!(penalty_for(5, 0.5), 3);
        assert_eq!(penalty_for(4, 0.5), 2);
        assert_eq!(penalty_for(30, 0.1), 3);
        assert_eq!(penalty_for(7, 0.0), 0);
        assert_eq!(penalty_for(7, 1.0), 7);
    }

    #[test]
    fn empty_confirm_is_a_noop() {
        let mut engine = engine("CAT", 3, &["cat"]);
        assert_eq!(engine.confirm(), None);
        assert_eq!(engine.state(), TurnState::Idle);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn place_and_recall() {
        let mut engine = engine("CAT", 3, &["cat"]);
        let slot = engine.rack().find('A').unwrap();
        engine.place(slot, Position::new(2, 2)).unwrap();
        assert!(engine.rack().get(slot).is_none());

        let other = engine.rack().find('C').unwrap();
        assert_eq!(engine.place(other, Position::new(2, 2)), Err(PlacementError::Occupied(Position::new(2, 2))));
        assert_eq!(engine.place(other, Position::new(7, 0)), Err(PlacementError::OutOfBounds(Position::new(7, 0))));
        assert_eq!(engine.rack().get(other).map(Tile::letter), Some('C'));
        assert_eq!(engine.place(slot, Position::new(0, 0)), Err(PlacementError::Rack(RackError::EmptySlot(slot))));

        engine.recall(Position::new(2, 2)).unwrap();
        assert_eq!(engine.rack().get(slot).map(Tile::letter), Some('A'));
        assert_eq!(engine.recall(Position::new(2, 2)), Err(PlacementError::NothingToRecall(Position::new(2, 2))));
    }

    #[test]
    fn recall_all_restores_the_rack() {
        let mut engine = engine("CAT", 3, &["cat"]);
        let before = engine.rack().to_string();
        place_letter(&mut engine, 'C', 2, 2);
        place_letter(&mut engine, 'T', 2, 3);
        assert_eq!(engine.recall_all(), 2);
        assert_eq!(engine.rack().to_string(), before);
        assert!(engine.grid().pending().is_empty());
    }

    #[test]
    fn observers_see_terminal_states() {
        let mut engine = engine("CATS", 4, &["cat"]);
        let log = Log::default();
        let events = log.0.clone();
        engine.add_observer(Box::new(log));

        place_letter(&mut engine, 'C', 2, 2);
        place_letter(&mut engine, 'A', 2, 3);
        place_letter(&mut engine, 'T', 2, 4);
        engine.confirm().unwrap();

        place_letter(&mut engine, 'S', 3, 0);
        engine.confirm().unwrap();

        assert_eq!(*events.borrow(), vec![
            "words 1".to_string(),
            "committed 5".to_string(),
            "rejected -1".to_string(),
        ]);
        assert!(!engine.is_confirm_in_progress());
    }

    #[test]
    fn bingo_bonus_for_a_full_rack() {
        let mut engine = engine("CAT", 3, &["cat"]).with_bingo_bonus(50);
        place_letter(&mut engine, 'C', 2, 2);
        place_letter(&mut engine, 'A', 2, 3);
        place_letter(&mut engine, 'T', 2, 4);
        let result = engine.confirm().unwrap();
        assert_eq!(result.words_scored, vec![("CAT".to_string(), 5)]);
        assert_eq!(result.total_delta, 55);
        assert_eq!(engine.score(), 55);
    }

    #[test]
    fn board_effects_between_turns() {
        let mut engine = engine("CAT", 3, &["cat"]);
        engine.grid_mut().apply_temporary_multipliers(vec![Position::new(2, 4)], 3, 2);
        engine.source_mut().activate_infinite_mode(std::time::Duration::from_secs(60));

        place_letter(&mut engine, 'C', 2, 2);
        place_letter(&mut engine, 'A', 2, 3);
        place_letter(&mut engine, 'T', 2, 4);
        let result = engine.confirm().unwrap();
        assert_eq!(result.words_scored, vec![("CAT".to_string(), (3 + 1 + 3) * 2)]);
        // the empty bag keeps giving tiles while infinite
        assert_eq!(engine.rack().len(), 3);
        assert_eq!(engine.source().remaining(), 0);
        assert!(engine.lexicon().contains("CAT"));
    }

    #[test]
    fn garbled_letter_breaks_the_word() {
        let mut engine = engine("CAT", 3, &["cat", "ca"]);
        engine.set_overlay(Box::new(|pos: Position| pos != Position::new(2, 4)));
        place_letter(&mut engine, 'C', 2, 2);
        place_letter(&mut engine, 'A', 2, 3);
        place_letter(&mut engine, 'T', 2, 4);
        let result = engine.confirm().unwrap();
        assert_eq!(result.words_scored, vec![("CA".to_string(), 4)]);
    }

    #[test]
    fn from_config_fills_the_rack() {
        let mut conf = GameConfig::default();
        conf.rows = 5;
        conf.cols = 5;
        conf.layout = crate::settings::LayoutSetting::Rows(vec![
            ".....".into(), ".....".into(), "..D..".into(), ".....".into(), ".....".into(),
        ]);
        conf.reuse_premiums = false;
        conf.seed = Some(2);
        let lexicon = FstLexicon::from_words(vec!["zzz"]).unwrap();
        let engine = TurnEngine::from_config(&conf, lexicon).unwrap();
        assert_eq!(engine.rack().len(), 7);
        assert_eq!(engine.source().remaining(), 98 - 7);
        assert_eq!(engine.grid().get_cell(Position::new(2, 2)).unwrap().class(), MultiplierClass::DoubleWord);
    }

    #[test]
    fn garbled_first_letter_still_commits_the_rest() {
        let mut engine = engine("CAT", 3, &["ca", "at"]);
        engine.set_overlay(Box::new(|pos: Position| pos != Position::new(2, 2)));
        place_letter(&mut engine, 'C', 2, 2);
        place_letter(&mut engine, 'A', 2, 3);
        place_letter(&mut engine, 'T', 2, 4);
        let result = engine.confirm().unwrap();
        assert!(result.committed);
        assert_eq!(result.words_scored, vec![("AT".to_string(), 2)]);
    }

    #[test]
    fn penalty_fraction_is_clamped() {
        assert_eq!(penalty_for(u32::MAX, 1.0), u32::MAX);
        assert_eq!(penalty_for(u32::MAX, 3.0), u32::MAX);

        let mut engine = engine("CAT", 3, &[]).with_penalty_fraction(4.0);
        assert_eq!(engine.penalty_fraction, 1.0);
        engine = engine.with_penalty_fraction(-2.0);
        assert_eq!(engine.penalty_fraction, 0.0);
        engine = engine.with_penalty_fraction(f64::NAN);
        assert_eq!(engine.penalty_fraction, TurnEngine::<FstLexicon>::DEFAULT_PENALTY_FRACTION);
    }

    #[test]
    fn full_penalty_after_clamping() {
        let bag = "CATDOG";
        let mut engine = engine(bag, 6, &["cat"]).with_penalty_fraction(2.0);
        place_letter(&mut engine, 'C', 2, 2);
        place_letter(&mut engine, 'A', 2, 3);
        place_letter(&mut engine, 'T', 2, 4);
        engine.confirm().unwrap();

        place_letter(&mut engine, 'D', 3, 2);
        let result = engine.confirm().unwrap();
        assert_eq!(result.penalty, 2);
        assert_eq!(engine.score(), 3);
    }

    #[test]
    fn origins_of_tiles_removed_elsewhere_are_dropped() {
        let mut engine = engine("CAT", 3, &["cat"]);
        place_letter(&mut engine, 'C', 2, 2);
        place_letter(&mut engine, 'A', 2, 3);
        assert_eq!(engine.origins.len(), 2);

        let taken = engine.grid_mut().remove_tile(Position::new(2, 2)).unwrap();
        assert_eq!(taken.letter(), 'C');
        engine.grid_mut().remove_tile(Position::new(2, 3)).unwrap();
        assert_eq!(engine.confirm(), None);
        assert!(engine.origins.is_empty());
    }

    #[test]
    fn tile_goes_to_the_source_when_the_rack_is_full() {
        let mut engine = engine("CAT", 3, &["cat"]);
        assert_eq!(engine.rack().len(), 3);
        assert_eq!(engine.source().remaining(), 0);

        engine.grid_mut().place_tile(Position::new(0, 0), Tile::new(TileId(999), 'Q', 10)).unwrap();
        let result = engine.confirm().unwrap();
        assert_eq!(result.rejection, Some(RejectReason::CenterNotCovered { center: Position::new(2, 2) }));
        assert_eq!(engine.source().remaining(), 1);
        assert_eq!(engine.rack().len(), 3);
        assert!(engine.grid().get_cell(Position::new(0, 0)).unwrap().tile().is_none());
    }
}
