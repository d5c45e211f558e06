//! Example reading text from a file, training a model, printing `n` generated tokens and the
//! log-probability of a line of text.
//!
//! Usage: generate_from_file <FILE_PATH> <WINDOW_SIZE> <N> [words|chars] [TEXT_TO_SCORE]
//! Using `cargo run`: `cargo run --example generate_from_file -- <FILE_PATH> <WINDOW_SIZE> <N>`
//!
//! Set `RUST_LOG=debug` to see what the model is doing.

use ngramish::{Granularity, LanguageModel, ModelConfig};

use rand::thread_rng;
use std::{path::PathBuf, process::exit};

const USAGE: &str =
    "Usage: generate_from_file <FILE_PATH> <WINDOW_SIZE> <N> [words|chars] [TEXT_TO_SCORE]";

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if !(4..=6).contains(&args.len()) {
        println!("{USAGE}");
        exit(1);
    }

    let text =
        std::fs::read_to_string(PathBuf::from(args[1].clone())).expect("could not read file");
    let window_size = args[2]
        .parse()
        .expect("did not provide a valid window size");
    let n = args[3]
        .parse()
        .expect("did not provide a valid token number");
    let granularity = match args.get(4).map(String::as_str) {
        None | Some("words") => Granularity::Words,
        Some("chars") => Granularity::Chars,
        Some(other) => {
            println!("unknown granularity {other:?}\n{USAGE}");
            exit(1);
        }
    };

    let config = ModelConfig::new(window_size, granularity).expect("invalid configuration");
    // line breaks would otherwise end up inside words
    let corpus = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let model = LanguageModel::train(config, &corpus).expect("failed to train model");

    let gen_text = model.generate(&mut thread_rng(), None, n);
    println!("{gen_text}");

    if let Some(to_score) = args.get(5) {
        match model.evaluate(to_score) {
            Ok(log_prob) => println!("ln P({to_score:?}) = {log_prob:.4}"),
            Err(e) => println!("could not score {to_score:?}: {e}"),
        }
    }
}
