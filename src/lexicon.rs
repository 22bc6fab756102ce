//! The words that can be played
//!
//! Words are stored lowercase in an `fst::Set`, either built in memory from a
//! word list (one word per line) or loaded from a `.fst` file made by `make_fst`.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use fst::{Set, SetBuilder};
use rayon::prelude::*;
use thiserror::Error;

/// A case-insensitive set of valid words
pub trait Lexicon {
    fn contains(&self, word: &str) -> bool;
}

impl<L: Lexicon + ?Sized> Lexicon for &L {
    fn contains(&self, word: &str) -> bool {
        (**self).contains(word)
    }
}

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("reading the word list: {0}")]
    Io(#[from] io::Error),
    #[error("building the word set: {0}")]
    Fst(#[from] fst::Error),
    #[error("dictionary file is neither .txt nor .fst: {}", .0.display())]
    UnknownFormat(PathBuf),
}

pub struct FstLexicon<D = Vec<u8>> {
    set: Set<D>,
}

impl<D: AsRef<[u8]>> FstLexicon<D> {
    pub fn new(set: Set<D>) -> Self {
        Self { set }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl FstLexicon<Vec<u8>> {
    pub fn from_words<S: AsRef<str>>(words: impl IntoIterator<Item=S>) -> Result<Self, LexiconError> {
        let words = normalize(words);
        let mut build = SetBuilder::memory();
        build.extend_iter(words)?;
        Ok(Self::new(build.into_set()))
    }

    /// Loads a `.txt` word list or a prebuilt `.fst` set, depending on the extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        match path.extension().and_then(|s| s.to_str()) {
            Some("fst") => {
                let start = Instant::now();
                let data = std::fs::read(path)?;
                let set = Set::new(data)?;
                log::info!("dictionary loaded in {:?}", Instant::now() - start);
                Ok(Self::new(set))
            },
            Some("txt") => {
                let start = Instant::now();
                let words = read_word_list(path)?;
                log::info!("{} words loaded in {:?}", words.len(), Instant::now() - start);

                let start = Instant::now();
                let lexicon = Self::from_words(words)?;
                log::info!("dictionary built in {:?}", Instant::now() - start);
                Ok(lexicon)
            },
            _ => Err(LexiconError::UnknownFormat(path.to_owned())),
        }
    }
}

impl<D: AsRef<[u8]>> Lexicon for FstLexicon<D> {
    fn contains(&self, word: &str) -> bool {
        self.set.contains(word.to_lowercase())
    }
}

pub fn read_word_list(path: &Path) -> Result<Vec<String>, LexiconError> {
    let file = BufReader::new(File::open(path)?);
    file.lines()
        .map(|l| l.map_err(LexiconError::from))
        .collect()
}

/// Trimmed, lowercased, sorted and deduplicated, the order an fst set is built in
pub fn normalize<S: AsRef<str>>(words: impl IntoIterator<Item=S>) -> Vec<String> {
    let mut words = words.into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>();
    words.par_sort_unstable();
    words.dedup();
    words
}

/// Writes `words` as an fst set, for `FstLexicon::load` to read back
pub fn write_fst<W: io::Write>(words: Vec<String>, wtr: W) -> Result<(), LexiconError> {
    let mut build = SetBuilder::new(wtr)?;
    build.extend_iter(normalize(words))?;
    build.finish()?;
    Ok(())
}


#[test]
fn test_case_insensitive() {
    let lexicon = FstLexicon::from_words(vec!["Cat", "dog", "  bird "]).unwrap();
    assert_eq!(lexicon.len(), 3);
    assert!(lexicon.contains("CAT"));
    assert!(lexicon.contains("cat"));
    assert!(lexicon.contains("Bird"));
    assert!(!lexicon.contains("ca"));
    assert!(!lexicon.contains(""));
}

#[test]
fn test_duplicates_and_blank_lines() {
    let lexicon = FstLexicon::from_words(vec!["zoo", "", "ZOO", "ant"]).unwrap();
    assert_eq!(lexicon.len(), 2);
}

#[test]
fn test_fst_bytes_round_trip() {
    let mut bytes = vec![];
    write_fst(vec!["tea".to_string(), "eat".to_string()], &mut bytes).unwrap();
    let lexicon = FstLexicon::new(Set::new(bytes).unwrap());
    assert!(lexicon.contains("EAT"));
    assert!(!lexicon.contains("ate"));
}

#[test]
fn test_unknown_extension() {
    match FstLexicon::load("words.csv") {
        Err(LexiconError::UnknownFormat(p)) => assert_eq!(p, PathBuf::from("words.csv")),
        _ => panic!("expected an unknown format error"),
    }
}
