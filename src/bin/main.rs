use aac_core::{
    starter_symbols, CandidateAggregator, Corpus, PictogramIndex, QueryExecutor, Symbol,
};
use crossterm::style::Stylize;
use std::io::{stdin, stdout, Write};

const DEFAULT_CORPUS_PATH: &str = "aac-pictograms.json";
const RESULT_COUNT: usize = 5;

fn main() {
    env_logger::init();

    let corpus_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CORPUS_PATH.to_string());

    // A bad corpus is a configuration error; nothing to recover.
    let corpus = match Corpus::from_json_file(&corpus_path) {
        Ok(corpus) => corpus,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            eprintln!("usage: aac_board [corpus.json]");
            std::process::exit(1);
        }
    };
    let index = PictogramIndex::build(corpus);

    println!("{}", "AAC Symbol Board".bold().cyan());
    println!("Corpus: {} pictograms from '{corpus_path}'", index.corpus().len());
    println!("Type a query (several separated by ','). 'starter' shows the starter board, 'exit' quits.");
    println!("---------------------------------------------------------------");

    loop {
        print!("\n> ");
        stdout().flush().expect("stdout");

        let mut input = String::new();
        if stdin().read_line(&mut input).expect("stdin") == 0 {
            break;
        }
        let line = input.trim();

        match line {
            "exit" => break,
            "" => continue,
            "starter" => print_symbols(&starter_symbols(&index)),
            _ if line.contains(',') => {
                let queries: Vec<&str> = line.split(',').map(str::trim).collect();
                let aggregator = CandidateAggregator::new(&index);
                print_symbols(&aggregator.aggregate(&queries));
            }
            query => print_matches(&index, query),
        }
    }
}

fn print_matches(index: &PictogramIndex, query: &str) {
    let executor = QueryExecutor::new(index);
    let matches = executor.top_matches(query, RESULT_COUNT);
    if matches.is_empty() {
        println!("{}", "No symbols found.".dark_grey());
        return;
    }
    for (i, pictogram) in matches.iter().enumerate() {
        println!(
            "  {}: {} {}",
            i + 1,
            pictogram.primary_keyword().to_string().green(),
            format!("(id {})", pictogram.id).dark_grey()
        );
    }
}

fn print_symbols(symbols: &[Symbol]) {
    if symbols.is_empty() {
        println!("{}", "No symbols found.".dark_grey());
        return;
    }
    for symbol in symbols {
        println!(
            "  {} {}",
            symbol.label.clone().green(),
            format!("(id {})", symbol.pictogram_id).dark_grey()
        );
    }
}
