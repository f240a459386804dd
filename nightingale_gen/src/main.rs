// Nightingale Sequence Generator — CLI entry point.
//
// Picks sampling hyperparameters for the requested genre and diversity,
// generates an accepted event sequence, and writes it to MIDI.
//
// Usage:
//   cargo run -p nightingale_gen -- [output.mid] [--genre NAME]
//     [--diversity low|medium|high] [--length N] [--instrument N]
//     [--seed N] [--max-attempts N] [--dump-text]
//
// Without --genre a genre is chosen at random. Override tables are picked
// up from data/hyperparams.json and data/predictor.json when present.

use nightingale_codec::genre::Genre;
use nightingale_gen::controller::{GeneratorConfig, generate};
use nightingale_gen::hyperparams::{Diversity, GenreTable};
use nightingale_gen::midi::{write_midi, write_text_dump};
use nightingale_gen::predictor::TablePredictor;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let output_path = args.get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("output.mid");
    let genre_label: Option<String> = parse_flag(&args, "--genre");
    let diversity_label: String =
        parse_flag(&args, "--diversity").unwrap_or_else(|| "medium".to_string());
    let length: usize = parse_flag(&args, "--length").unwrap_or(1000);
    let instrument: u8 = parse_flag(&args, "--instrument").unwrap_or(113);
    let seed: Option<u64> = parse_flag(&args, "--seed");
    let max_attempts: Option<u32> = parse_flag(&args, "--max-attempts");
    let dump_text = args.iter().any(|a| a == "--dump-text");

    let diversity = parse_diversity(&diversity_label);

    println!("=== Nightingale Sequence Generator ===");
    println!("Output: {output_path}");
    println!("Length: {length} events");
    println!("Instrument: {instrument}");
    if let Some(s) = seed {
        println!("Seed: {s}");
    }
    println!();

    let mut rng = if let Some(s) = seed {
        StdRng::seed_from_u64(s)
    } else {
        StdRng::from_os_rng()
    };

    let genre = match genre_label {
        Some(label) => Genre::from_label(&label),
        None => {
            let genre = Genre::LABELED[rng.random_range(0..Genre::LABELED.len())];
            println!("No genre given — picked {genre} at random.");
            genre
        }
    };
    println!("Genre: {genre}");

    println!("[1/3] Selecting hyperparameters...");
    let table = if Path::new("data/hyperparams.json").exists() {
        match GenreTable::load(Path::new("data/hyperparams.json")) {
            Ok(t) => { println!("  Loaded override table."); t }
            Err(e) => { println!("  Failed to load override table: {e}. Using defaults."); GenreTable::default_table() }
        }
    } else {
        GenreTable::default_table()
    };
    let hp = table.pick(genre, diversity, &mut rng);
    println!("  Temperature: {}, noise std: {}", hp.temperature, hp.noise_std);

    println!("[2/3] Generating sequence...");
    let mut predictor = if Path::new("data/predictor.json").exists() {
        match TablePredictor::load(Path::new("data/predictor.json")) {
            Ok(p) => { println!("  Loaded predictor table."); p }
            Err(e) => { println!("  Failed to load predictor table: {e}. Using defaults."); TablePredictor::default_table() }
        }
    } else {
        println!("  Using the built-in fallback predictor.");
        TablePredictor::default_table()
    };

    let config = GeneratorConfig {
        target_length: length,
        temperature: hp.temperature,
        noise_std: hp.noise_std,
        max_attempts,
        ..GeneratorConfig::default()
    };

    let run = match generate(&mut predictor, genre, &config, &mut rng) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("  Generation failed: {e}");
            std::process::exit(1);
        }
    };
    println!("  Accepted after {} attempt(s) ({} rejected).", run.stats.attempts, run.stats.rejected);
    println!("  Note ratio: {:.1}%", run.stats.note_ratio * 100.0);
    if run.stats.skipped_decodes > 0 {
        println!("  Skipped {} undecodable steps.", run.stats.skipped_decodes);
    }

    println!("[3/3] Writing MIDI to {output_path}...");
    if let Err(e) = write_midi(&run.events, Path::new(output_path), instrument) {
        eprintln!("  Error writing MIDI: {e}");
        std::process::exit(1);
    }

    if dump_text {
        let text_path = Path::new(output_path).with_extension("txt");
        match write_text_dump(&run.events, &text_path) {
            Ok(()) => println!("  Event dump: {}", text_path.display()),
            Err(e) => eprintln!("  Error writing event dump: {e}"),
        }
    }

    println!();
    println!("Play with: timidity {output_path} (or any MIDI player)");
}

fn parse_diversity(label: &str) -> Diversity {
    match Diversity::from_label(label) {
        Some(d) => d,
        None => {
            eprintln!("Unknown diversity '{label}'. Using medium.");
            Diversity::Medium
        }
    }
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
