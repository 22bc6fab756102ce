//! Game configuration
//!
//! Read from an optional file (any format the `config` crate knows, chosen by
//! extension) and from `WORDGRID_*` environment variables, environment winning.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use thiserror::Error;

use super::{MultiplierClass, Rack, Table, TileSource};
use super::bag::ENGLISH_DISTRIBUTION;
use super::grid::Grid;
use super::score_rules::{self, BoardLayout, MapScoring, ScrabbleLayout};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("`{0}` is not a single letter")]
    BadLetter(String),
    #[error("unknown layout `{0}`, expected `standard`, `plain` or a list of rows")]
    UnknownLayout(String),
    #[error("unknown layout character `{0}`")]
    BadLayoutChar(char),
    #[error("layout is {found_rows}x{found_cols} but the board is {rows}x{cols}")]
    LayoutSize { rows: usize, cols: usize, found_rows: usize, found_cols: usize },
    #[error("the board must have at least one row and one column")]
    EmptyBoard,
    #[error("penalty fraction {0} is not between 0 and 1")]
    BadPenalty(f64),
    #[error("the rack needs at least one slot")]
    EmptyRack,
}

/// Either the name of a built in layout, or one string per row
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LayoutSetting {
    Named(String),
    Rows(Vec<String>),
}

impl Default for LayoutSetting {
    fn default() -> Self {
        Self::Named("standard".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    #[serde(default = "fifteen")]
    pub rows: usize,
    #[serde(default = "fifteen")]
    pub cols: usize,

    /// `standard` (the 15x15 premium squares), `plain`, or rows written with `.dtDT`
    #[serde(default)]
    pub layout: LayoutSetting,

    /// How many tiles of each letter the bag starts with
    #[serde(default = "english_bag")]
    pub bag: BTreeMap<String, u32>,

    /// Letter values, english scrabble values for anything missing
    pub letter_score: Option<HashMap<String, u32>>,

    /// Every nth drawn tile is special, 0 for never
    #[serde(default = "six")]
    pub special_interval: u32,

    /// Fraction of the face value of the placed tiles lost when a move is rejected
    #[serde(default = "half")]
    pub penalty_fraction: f64,

    #[serde(default = "seven")]
    pub rack_size: usize,

    /// Whether premium squares keep counting once a tile is locked on them
    #[serde(default = "yes")]
    pub reuse_premiums: bool,

    /// Extra points for a move that empties a full rack
    #[serde(default)]
    pub bingo_bonus: u32,

    /// Seed for the bag, drawing is not reproducible without one
    pub seed: Option<u64>,
}

fn fifteen() -> usize { 15 }
fn six() -> u32 { TileSource::DEFAULT_SPECIAL_INTERVAL }
fn half() -> f64 { 0.5 }
fn seven() -> usize { Rack::DEFAULT_SIZE }
fn yes() -> bool { true }

fn english_bag() -> BTreeMap<String, u32> {
    ENGLISH_DISTRIBUTION.iter().map(|&(l, n)| (l.to_string(), n)).collect()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: fifteen(),
            cols: fifteen(),
            layout: LayoutSetting::default(),
            bag: english_bag(),
            letter_score: None,
            special_interval: six(),
            penalty_fraction: half(),
            rack_size: seven(),
            reuse_premiums: yes(),
            bingo_bonus: 0,
            seed: None,
        }
    }
}

fn single_letter(key: &str) -> Result<char, SettingsError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => Ok(c.to_ascii_uppercase()),
        _ => Err(SettingsError::BadLetter(key.to_owned())),
    }
}

impl GameConfig {
    /// Reads the configuration file if any, then the environment
    pub fn load(file: Option<&str>) -> Result<Self, SettingsError> {
        let mut s = config::Config::new();

        if let Some(f) = file {
            s.merge(config::File::with_name(f))?;
        }

        s.merge(config::Environment::with_prefix("WORDGRID"))?;

        Self::from_config(s)
    }

    pub fn from_config(s: config::Config) -> Result<Self, SettingsError> {
        let conf: Self = s.try_into()?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SettingsError::EmptyBoard);
        }
        if !(0.0..=1.0).contains(&self.penalty_fraction) {
            return Err(SettingsError::BadPenalty(self.penalty_fraction));
        }
        if self.rack_size == 0 {
            return Err(SettingsError::EmptyRack);
        }
        self.composition()?;
        self.scoring()?;
        self.layout_table()?;
        Ok(())
    }

    /// Letter counts of the bag, letters in alphabetical order
    pub fn composition(&self) -> Result<Vec<(char, u32)>, SettingsError> {
        let mut composition = self.bag.iter()
            .map(|(key, &count)| Ok((single_letter(key)?, count)))
            .collect::<Result<Vec<_>, SettingsError>>()?;
        composition.sort_unstable();
        Ok(composition)
    }

    pub fn scoring(&self) -> Result<MapScoring, SettingsError> {
        let map = match &self.letter_score {
            None => HashMap::new(),
            Some(scores) => scores.iter()
                .map(|(key, &value)| Ok((single_letter(key)?, value)))
                .collect::<Result<_, SettingsError>>()?,
        };
        Ok(MapScoring { map })
    }

    /// The class of every cell of a `rows` x `cols` board
    pub fn layout_table(&self) -> Result<Table<MultiplierClass>, SettingsError> {
        let table = match &self.layout {
            LayoutSetting::Named(name) => match name.to_lowercase().as_str() {
                "standard" => Table::from_fn(ScrabbleLayout::SIZE, ScrabbleLayout::SIZE, |pos| ScrabbleLayout.class_at(pos)),
                "plain" => Table::fill_with(self.rows, self.cols, MultiplierClass::Normal),
                _ => return Err(SettingsError::UnknownLayout(name.clone())),
            },
            LayoutSetting::Rows(rows) => score_rules::parse_layout(rows).map_err(SettingsError::BadLayoutChar)?,
        };
        if table.rows() != self.rows || table.cols() != self.cols {
            return Err(SettingsError::LayoutSize {
                rows: self.rows,
                cols: self.cols,
                found_rows: table.rows(),
                found_cols: table.cols(),
            });
        }
        Ok(table)
    }

    pub fn grid(&self) -> Result<Grid, SettingsError> {
        Ok(Grid::new(self.rows, self.cols, &self.layout_table()?))
    }

    pub fn tile_source(&self) -> Result<TileSource, SettingsError> {
        let source = TileSource::new(self.composition()?, &self.scoring()?)
            .with_special_interval(self.special_interval);
        Ok(match self.seed {
            Some(seed) => source.with_seed(seed),
            None => source,
        })
    }
}


#[cfg(test)]
fn from_toml(toml: &str) -> Result<GameConfig, SettingsError> {
    let mut s = config::Config::new();
    s.merge(config::File::from_str(toml, config::FileFormat::Toml))?;
    GameConfig::from_config(s)
}

#[test]
fn test_defaults() {
    let conf = from_toml("").unwrap();
    assert_eq!((conf.rows, conf.cols), (15, 15));
    assert_eq!(conf.layout, LayoutSetting::Named("standard".to_string()));
    assert_eq!(conf.special_interval, 6);
    assert_eq!(conf.penalty_fraction, 0.5);
    assert_eq!(conf.rack_size, 7);
    assert!(conf.reuse_premiums);
    assert_eq!(conf.bingo_bonus, 0);
    assert_eq!(conf.tile_source().unwrap().total_initial(), 98);
    assert_eq!(conf.grid().unwrap().center(), super::Position::new(7, 7));
}

#[test]
fn test_small_custom_board() {
    let conf = from_toml(r#"
        rows = 3
        cols = 3
        layout = ["T.d", ".D.", "d.T"]
        penalty_fraction = 0.25
        seed = 11

        [bag]
        a = 5
        b = 2

        [letter_score]
        b = 7
    "#).unwrap();
    assert_eq!(conf.composition().unwrap(), vec![('A', 5), ('B', 2)]);
    let grid = conf.grid().unwrap();
    assert_eq!(grid.get_cell(super::Position::new(1, 1)).unwrap().class(), MultiplierClass::DoubleWord);

    use super::LetterScoring;
    let scoring = conf.scoring().unwrap();
    assert_eq!(scoring.score_for('b'), 7);
    assert_eq!(scoring.score_for('a'), 1);
}

#[test]
fn test_standard_layout_needs_fifteen() {
    match from_toml("rows = 9\ncols = 9") {
        Err(SettingsError::LayoutSize { found_rows: 15, .. }) => {},
        other => panic!("unexpected {:?}", other),
    }
    assert!(from_toml("rows = 9\ncols = 9\nlayout = \"plain\"").is_ok());
}

#[test]
fn test_rejects_bad_values() {
    assert!(matches!(from_toml("penalty_fraction = 1.5"), Err(SettingsError::BadPenalty(_))));
    assert!(matches!(from_toml("rack_size = 0"), Err(SettingsError::EmptyRack)));
    assert!(matches!(from_toml("layout = \"hexagonal\""), Err(SettingsError::UnknownLayout(_))));
    assert!(matches!(from_toml("[bag]\nab = 3"), Err(SettingsError::BadLetter(_))));
    assert!(matches!(
        from_toml("rows = 1\ncols = 3\nlayout = [\"..x\"]"),
        Err(SettingsError::BadLayoutChar('x')),
    ));
}
