// Nightingale Dataset Builder — CLI entry point.
//
// Reads a JSON label manifest, encodes each listed MIDI file into the
// 14-wide vector format, windows the combined stream into training tuples,
// and writes the dataset as one JSON document.
//
// Usage:
//   cargo run -p nightingale_codec -- [--manifest labels.json]
//     [--midi-dir DIR] [--window N] [--output dataset.json]

use nightingale_codec::codec::EventCodec;
use nightingale_codec::dataset::{LabelManifest, encode_midi_file};
use nightingale_codec::genre::Genre;
use nightingale_codec::window::{Dataset, window};
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let manifest_path = parse_flag(&args, "--manifest").unwrap_or_else(|| "labels.json".to_string());
    let midi_dir = parse_flag(&args, "--midi-dir").unwrap_or_else(|| ".".to_string());
    let window_size: usize = parse_flag(&args, "--window").unwrap_or(25);
    let output_path = parse_flag(&args, "--output").unwrap_or_else(|| "dataset.json".to_string());

    println!("=== Nightingale Dataset Builder ===");
    println!("Manifest: {manifest_path}");
    println!("MIDI directory: {midi_dir}");
    println!("Window size: {window_size}");
    println!("Output: {output_path}");
    println!();

    println!("[1/3] Reading manifest...");
    let manifest = match LabelManifest::load(Path::new(&manifest_path)) {
        Ok(m) => {
            println!("  {} labeled files.", m.entries.len());
            m
        }
        Err(e) => {
            eprintln!("  Failed to read manifest: {e}");
            std::process::exit(1);
        }
    };

    println!("[2/3] Encoding MIDI files...");
    let codec = EventCodec::dataset();
    let mut stream = Vec::new();
    let mut skipped = 0usize;
    for entry in &manifest.entries {
        let path = Path::new(&midi_dir).join(&entry.filename);
        if !path.exists() {
            println!("  missing file: {}", entry.filename);
            skipped += 1;
            continue;
        }
        match encode_midi_file(&codec, &path, Genre::from_label(&entry.genre)) {
            Ok(vectors) => {
                println!("  {} ({}): {} events", entry.filename, entry.genre, vectors.len());
                stream.extend(vectors);
            }
            Err(e) => {
                println!("  skipping '{}': {e}", entry.filename);
                skipped += 1;
            }
        }
    }
    println!("  {} vectors total, {} files skipped.", stream.len(), skipped);

    println!("[3/3] Windowing and saving...");
    let examples = window(&stream, window_size);
    let dataset = Dataset::from_examples(window_size, examples);
    println!("  {} training tuples.", dataset.len());

    match dataset.save(Path::new(&output_path)) {
        Ok(()) => println!("  Saved dataset to {output_path}"),
        Err(e) => {
            eprintln!("  Error saving dataset: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
