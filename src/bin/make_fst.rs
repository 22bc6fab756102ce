use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use std::path::PathBuf;
use structopt::StructOpt;

use wordgrid::lexicon::{read_word_list, write_fst};

#[derive(Debug, StructOpt)]
#[structopt(name = "make_fst", about = "Turn a word list into a fst file that wordgrid loads faster")]
struct Opt {
    /// The input list. One word per line
    #[structopt(short = "i", long = "input-list", parse(from_os_str))]
    list_file: PathBuf,

    /// Where to write the compressed dictionary
    #[structopt(short = "o", long = "output-fst", parse(from_os_str))]
    fst_file: PathBuf,
}

fn main() {
    simple_logger::SimpleLogger::new().with_level(log::LevelFilter::Info).init().unwrap();

    let Opt { list_file, fst_file } = Opt::from_args();

    let start = Instant::now();
    let words = read_word_list(&list_file).expect("reading the words list file");
    log::info!("{} words loaded in {:?}", words.len(), Instant::now() - start);

    let start = Instant::now();
    let wtr = BufWriter::new(File::create(fst_file).expect("create the words fst file"));
    write_fst(words, wtr).expect("writing the fst file");
    log::info!("dictionary sorted and written in {:?}", Instant::now() - start);
}
