use wordgrid::{FstLexicon, Grid, Position, Rack, RejectReason, TileSource, TurnEngine, TurnState};
use wordgrid::score_rules::{parse_layout, EnglishScrabbleScoring};
use wordgrid::turn::Scorer;

const PLAIN: &[&str] = &[
    ".....",
    ".....",
    ".....",
    ".....",
    ".....",
];

const DOUBLE_WORD_RIGHT_OF_CENTER: &[&str] = &[
    ".....",
    ".....",
    "...D.",
    ".....",
    ".....",
];

fn setup(layout: &[&str], bag: &[(char, u32)], rack_size: usize, words: &[&str]) -> TurnEngine<FstLexicon> {
    let grid = Grid::new(5, 5, &parse_layout(layout).unwrap());
    let source = TileSource::new(bag.iter().copied(), &EnglishScrabbleScoring).with_seed(42);
    let lexicon = FstLexicon::from_words(words.iter()).unwrap();
    let mut engine = TurnEngine::new(grid, source, Rack::new(rack_size), lexicon);
    engine.refill_rack();
    engine
}

fn place(engine: &mut TurnEngine<FstLexicon>, tiles: &[(char, usize, usize)]) {
    for &(letter, row, col) in tiles {
        let slot = engine.rack().find(letter)
            .unwrap_or_else(|| panic!("no {} in rack {}", letter, engine.rack()));
        engine.place(slot, Position::new(row, col)).unwrap();
    }
}

fn cat_bag() -> Vec<(char, u32)> {
    vec![('C', 1), ('A', 1), ('T', 1)]
}

#[test]
fn cat_on_plain_board() {
    let mut engine = setup(PLAIN, &cat_bag(), 7, &["cat"]);
    place(&mut engine, &[('C', 2, 2), ('A', 2, 3), ('T', 2, 4)]);

    let result = engine.confirm().unwrap();
    assert!(result.committed);
    assert_eq!(result.words_scored, vec![("CAT".to_string(), 5)]);
    assert_eq!(result.total_delta, 5);
    assert_eq!(result.rejection, None);
    assert_eq!(engine.score(), 5);
    assert_eq!(engine.state(), TurnState::Idle);

    for col in 2..5 {
        assert!(engine.grid().is_locked_tile_at(Position::new(2, col)));
    }
    assert!(engine.grid().pending().is_empty());
}

#[test]
fn cat_over_double_word() {
    let mut engine = setup(DOUBLE_WORD_RIGHT_OF_CENTER, &cat_bag(), 7, &["cat"]);
    place(&mut engine, &[('C', 2, 2), ('A', 2, 3), ('T', 2, 4)]);

    let result = engine.confirm().unwrap();
    assert!(result.committed);
    assert_eq!(result.words_scored, vec![("CAT".to_string(), 10)]);
    assert_eq!(engine.score(), 10);
}

#[test]
fn gap_is_rejected_and_tiles_come_back() {
    let mut engine = setup(PLAIN, &[('A', 10)], 3, &["aaa"]);
    assert_eq!(engine.source().remaining(), 7);
    let rack_before = engine.rack().to_string();

    place(&mut engine, &[('A', 2, 2), ('A', 2, 4)]);
    let result = engine.confirm().unwrap();
    assert!(!result.committed);
    assert_eq!(result.rejection, Some(RejectReason::Gap { pos: Position::new(2, 3) }));
    assert!(result.words_scored.is_empty());
    assert_eq!(result.penalty, 0);
    assert_eq!(engine.score(), 0);

    assert_eq!(engine.rack().to_string(), rack_before);
    assert_eq!(engine.source().remaining(), 7);
    assert!(engine.grid().cells().all(|c| !c.is_occupied()));
}

#[test]
fn unconnected_move_is_rejected() {
    let mut engine = setup(PLAIN, &[('A', 10)], 3, &["aa"]);
    place(&mut engine, &[('A', 2, 2), ('A', 2, 3)]);
    assert_eq!(engine.confirm().unwrap().total_delta, 2);

    place(&mut engine, &[('A', 0, 0)]);
    let result = engine.confirm().unwrap();
    assert_eq!(result.rejection, Some(RejectReason::NotConnected));
    assert_eq!(result.penalty, 1);
    assert_eq!(result.total_delta, -1);
    assert_eq!(engine.score(), 1);
    assert!(engine.grid().get_cell(Position::new(0, 0)).unwrap().tile().is_none());
}

#[test]
fn unknown_word_costs_half_its_face_value() {
    let bag = vec![('C', 1), ('A', 1), ('T', 1), ('D', 1), ('O', 1), ('G', 1)];
    let mut engine = setup(PLAIN, &bag, 6, &["cat", "dog"]);
    place(&mut engine, &[('C', 2, 2), ('A', 2, 3), ('T', 2, 4)]);
    assert!(engine.confirm().unwrap().committed);
    let rack_before = engine.rack().to_string();

    // DOG is fine but it lays CD, AO and TG across the row above
    place(&mut engine, &[('D', 3, 2), ('O', 3, 3), ('G', 3, 4)]);
    let result = engine.confirm().unwrap();
    assert_eq!(result.rejection, Some(RejectReason::WordNotFound { word: "CD".to_string() }));
    // ceil(0.5 * (2 + 1 + 2))
    assert_eq!(result.penalty, 3);
    assert_eq!(engine.score(), 2);
    assert_eq!(engine.rack().to_string(), rack_before);
    assert!(engine.grid().pending().is_empty());
}

#[test]
fn penalty_never_goes_below_zero() {
    let mut engine = setup(PLAIN, &cat_bag(), 7, &[]);
    place(&mut engine, &[('C', 2, 2), ('A', 2, 3), ('T', 2, 4)]);
    let result = engine.confirm().unwrap();
    assert_eq!(result.rejection, Some(RejectReason::WordNotFound { word: "CAT".to_string() }));
    assert_eq!(result.penalty, 0);
    assert_eq!(result.total_delta, 0);
    assert_eq!(engine.score(), 0);
}

#[test]
fn first_move_off_center() {
    let mut engine = setup(PLAIN, &cat_bag(), 7, &["cat"]);
    place(&mut engine, &[('C', 0, 0), ('A', 0, 1), ('T', 0, 2)]);
    let result = engine.confirm().unwrap();
    assert_eq!(result.rejection, Some(RejectReason::CenterNotCovered { center: Position::new(2, 2) }));
    assert_eq!(engine.rack().len(), 3);
}

#[test]
fn rejection_keeps_earlier_words() {
    let bag = vec![('C', 1), ('A', 1), ('T', 1), ('X', 1)];
    let mut engine = setup(PLAIN, &bag, 4, &["cat"]);
    place(&mut engine, &[('C', 2, 2), ('A', 2, 3), ('T', 2, 4)]);
    engine.confirm().unwrap();

    place(&mut engine, &[('X', 1, 2)]);
    let result = engine.confirm().unwrap();
    assert_eq!(result.rejection, Some(RejectReason::WordNotFound { word: "XC".to_string() }));
    assert_eq!(engine.score(), 5 - 4);
    assert_eq!(engine.grid().letter_at(Position::new(2, 2)), Some('C'));
    assert!(engine.grid().is_locked_tile_at(Position::new(2, 4)));
    assert_eq!(engine.grid().letter_at(Position::new(1, 2)), None);
    assert!(engine.rack().find('X').is_some());
}

#[test]
fn spent_premiums_count_at_face_value() {
    let bag = vec![('C', 1), ('A', 1), ('T', 2)];
    for &(reuse, expected) in &[(true, 4), (false, 2)] {
        let mut engine = setup(DOUBLE_WORD_RIGHT_OF_CENTER, &bag, 4, &["cat", "at"])
            .with_scorer(Scorer { reuse_premiums: reuse });
        place(&mut engine, &[('C', 2, 2), ('A', 2, 3), ('T', 2, 4)]);
        assert_eq!(engine.confirm().unwrap().total_delta, 10);

        place(&mut engine, &[('T', 3, 3)]);
        let result = engine.confirm().unwrap();
        assert_eq!(result.words_scored, vec![("AT".to_string(), expected)]);
    }
}

#[test]
fn nothing_placed_means_no_result() {
    let mut engine = setup(PLAIN, &cat_bag(), 7, &["cat"]);
    assert_eq!(engine.confirm(), None);
    assert_eq!(engine.score(), 0);
}
