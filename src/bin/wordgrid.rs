use std::io::{self, BufRead, Write};

use std::path::PathBuf;
use structopt::StructOpt;

use wordgrid::{FstLexicon, GameConfig, Position, TurnEngine, TurnObserver, TurnResult};

#[derive(Debug, StructOpt)]
#[structopt(name = "wordgrid", about = "Play word grid turns from the command line")]
struct Opt {
    /// The config file, if not present the defaults and `WORDGRID_*` variables are used
    #[structopt(short = "c", long = "config")]
    config: Option<String>,

    /// The dictionary of words that are allowed to be played.
    ///
    /// Either a `.txt` file with one word per line, or a `.fst` file generated with `make_fst`
    #[structopt(short = "d", long = "dictionary", parse(from_os_str))]
    dict: PathBuf,
}

const HELP: &str = "\
commands:
  rack                 show the rack, slots are numbered from 0
  board                show the board, pending tiles in lowercase
  place SLOT ROW COL   put the tile of a rack slot on the board
  recall ROW COL       take a tile placed this turn back
  recall-all           take every tile placed this turn back
  confirm              play the placed tiles
  score                show the running total
  quit";

/// Prints what each confirm did
struct Announcer;

impl TurnObserver for Announcer {
    fn committed(&mut self, result: &TurnResult) {
        for (word, points) in &result.words_scored {
            println!("  {:<15} {:>3}", word, points);
        }
        println!("+{}", result.total_delta);
    }

    fn rejected(&mut self, result: &TurnResult) {
        if let Some(reason) = &result.rejection {
            println!("rejected: {}", reason);
        }
        println!("-{}", result.penalty);
    }
}

fn parse_numbers<'a>(args: impl Iterator<Item=&'a str>, expected: usize) -> Option<Vec<usize>> {
    let numbers = args.map(|a| a.parse().ok()).collect::<Option<Vec<usize>>>()?;
    if numbers.len() == expected {
        Some(numbers)
    } else {
        None
    }
}

fn run_command(engine: &mut TurnEngine<FstLexicon>, line: &str) -> bool {
    let mut words = line.split_whitespace();
    let command = match words.next() {
        Some(c) => c,
        None => return true,
    };

    match command {
        "rack" => {
            let rack = engine.rack().to_string();
            for (slot, letter) in rack.chars().enumerate() {
                print!("{}:{} ", slot, letter);
            }
            println!();
        },
        "board" => print!("{}", engine.grid()),
        "place" => match parse_numbers(words, 3).as_deref() {
            Some(&[slot, row, col]) => {
                if let Err(e) = engine.place(slot, Position::new(row, col)) {
                    println!("{}", e);
                }
            },
            _ => println!("usage: place SLOT ROW COL"),
        },
        "recall" => match parse_numbers(words, 2).as_deref() {
            Some(&[row, col]) => {
                if let Err(e) = engine.recall(Position::new(row, col)) {
                    println!("{}", e);
                }
            },
            _ => println!("usage: recall ROW COL"),
        },
        "recall-all" => println!("{} tiles back in the rack", engine.recall_all()),
        "confirm" => {
            if engine.confirm().is_none() {
                println!("nothing placed");
            }
        },
        "score" => println!("{}", engine.score()),
        "quit" | "exit" => return false,
        _ => println!("{}", HELP),
    }
    true
}

fn main() {
    simple_logger::SimpleLogger::from_env().init().unwrap();

    let opt = Opt::from_args();

    let conf = GameConfig::load(opt.config.as_deref()).expect("config");
    let lexicon = FstLexicon::load(&opt.dict).expect("loading the dictionary");
    log::info!("{} words in the dictionary", lexicon.len());

    let mut engine = TurnEngine::from_config(&conf, lexicon).expect("setting up the game");
    engine.add_observer(Box::new(Announcer));

    println!("{}", HELP);
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().expect("flushing stdout");

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {},
            Err(e) => {
                log::error!("reading stdin: {}", e);
                break
            },
        }
        if !run_command(&mut engine, &line) {
            break
        }
    }

    println!("final score: {}", engine.score());
}
