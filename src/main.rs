// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use simstr::{CharType, CodeUnit, IndexConfig, QueryConfig, Reader, Store, Writer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
use cli::{display, Cli, Commands};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("SIMSTR_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Build {
            database,
            ngram,
            char_type,
            no_marks,
        } => {
            let config = IndexConfig {
                ngram_size: ngram,
                char_type,
                boundary_marks: !no_marks,
            };
            match char_type {
                CharType::Narrow => run_build::<u8>(&database, &config),
                CharType::Wide => run_build::<char>(&database, &config),
            }
        }
        Commands::Query {
            database,
            char_type,
            measure,
            threshold,
            scores,
        } => QueryConfig::new(measure, threshold)
            .map_err(|e| e.to_string())
            .and_then(|config| run_query(&database, char_type, config, scores)),
        Commands::Inspect {
            database,
            verify,
            json,
        } => run_inspect(&database, verify, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} {pos} strings {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn run_build<C: CodeUnit>(path: &Path, config: &IndexConfig) -> Result<(), String> {
    println!("Constructing the database");
    println!("Database name: {}", path.display());
    println!("N-gram length: {}", config.ngram_size);
    println!("Char type: {}", config.char_type);

    let start = Instant::now();
    let mut writer = Writer::<C>::create(path, config).map_err(|e| e.to_string())?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(create_progress_style());
    pb.set_prefix("Inserting");
    pb.enable_steady_tick(Duration::from_millis(100));

    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| format!("reading stdin: {}", e))?;
        writer.insert(&line).map_err(|e| e.to_string())?;
        pb.inc(1);
    }
    pb.finish_with_message("read");
    println!("Number of strings: {}", writer.len());

    println!("Flushing the database");
    writer.close().map_err(|e| e.to_string())?;

    println!("Seconds required: {:.3}", start.elapsed().as_secs_f64());
    Ok(())
}

fn run_query(
    path: &Path,
    char_type: Option<CharType>,
    config: QueryConfig,
    scores: bool,
) -> Result<(), String> {
    let store = Store::open(path).map_err(|e| e.to_string())?;
    match char_type.unwrap_or(store.header().char_type) {
        CharType::Narrow => query_loop(Reader::<u8>::from_store(store), config, scores),
        CharType::Wide => query_loop(Reader::<char>::from_store(store), config, scores),
    }
}

fn query_loop<C: CodeUnit>(
    reader: Result<Reader<C>, simstr::QueryError>,
    config: QueryConfig,
    scores: bool,
) -> Result<(), String> {
    let reader = reader.map_err(|e| e.to_string())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| format!("reading stdin: {}", e))?;
        let start = Instant::now();
        let matches = reader
            .retrieve_scored(&line, config.measure, config.threshold)
            .map_err(|e| e.to_string())?;

        for m in &matches {
            let s = reader.string(m.id).map_err(|e| e.to_string())?;
            let written = if scores {
                writeln!(out, "\t{}\t{:.4}", s, m.score)
            } else {
                writeln!(out, "\t{}", s)
            };
            written.map_err(|e| e.to_string())?;
        }
        out.flush().map_err(|e| e.to_string())?;
        eprintln!(
            "{} strings retrieved ({} sec)",
            matches.len(),
            start.elapsed().as_secs_f64()
        );
    }
    Ok(())
}

fn run_inspect(path: &Path, verify: bool, json: bool) -> Result<(), String> {
    let info = simstr::inspect(path, verify).map_err(|e| e.to_string())?;
    if json {
        let text = serde_json::to_string_pretty(&info).map_err(|e| e.to_string())?;
        println!("{}", text);
    } else {
        display::print_info(&info, verify);
    }
    Ok(())
}
