//! Line Scoring Benchmark
//!
//! Measures tokenizer and scorer throughput on a large delimited file using a
//! real configuration, rule files included.
//!
//! ## What It Benchmarks
//!
//! 1. **Tokenize**: every configured text field of every line
//! 2. **Score**: full line scoring (split, tokenize, keyword, proximity, domain)
//!
//! ## Usage
//!
//! ```bash
//! ./target/release/score_bench config.toml /path/to/records.txt
//! ```
//!
//! ## Example Output
//!
//! ```text
//! === Score ===
//! --------------------------------
//! Mode        : Score
//! Elapsed     : 0.812 s
//! Throughput  : 0.431 GiB/s
//! Lines       : 3_401_118
//! Lines/sec   : 4_188_568
//! Retained    : 12_904
//! --------------------------------
//! ```
//!
//! Build in release mode and use an input of at least a few hundred MiB for
//! stable numbers.

use std::env;
use std::fs;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use sieve_core::analyzer::Tokenizer;
use sieve_core::config::ConfigLoader;
use sieve_core::scoring::LineScorer;
use sieve_core::ScoringConfig;

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: score_bench <config> <path>");
        return ExitCode::FAILURE;
    }

    let loaded = match ConfigLoader::from_file(&args[1]).and_then(|l| l.load()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("score_bench: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    println!("Loading file...");
    let bytes = match fs::read(&args[2]) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("score_bench: {}: {e}", args[2]);
            return ExitCode::FAILURE;
        }
    };
    let (input, _) = loaded.encoding.decode_without_bom_handling(&bytes);
    let lines: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    println!("File size: {}", fmt_bytes(input.len() as u64));
    println!("Lines:     {}", fmt_count(lines.len() as u64));
    println!("Suffixes:  {}", loaded.scoring.suffixes.len());
    println!("Domains:   {}\n", loaded.scoring.domains.len());

    bench_tokenize(&lines, &loaded.scoring, input.len());
    bench_score(&lines, &loaded.scoring, input.len());

    ExitCode::SUCCESS
}

fn bench_tokenize(lines: &[&str], config: &ScoringConfig, input_bytes: usize) {
    let mut tokenizer = Tokenizer::new(&config.ignore);
    let mut out = Vec::with_capacity(64);

    println!("=== Tokenize ===");

    let mut run = || {
        let mut tokens = 0u64;
        for line in lines {
            let fields: Vec<&str> = line.split(config.separator.as_str()).collect();
            for &index in &config.text_fields {
                if let Some(field) = fields.get(index) {
                    tokenizer.tokenize_into(field, &mut out);
                    tokens += out.len() as u64;
                }
            }
        }
        std::hint::black_box(tokens)
    };

    warmup(|| {
        run();
    });

    let mut tokens = 0u64;
    let elapsed = measure(|| {
        tokens = run();
    });

    print_perf("Tokenize", input_bytes, elapsed, "Tokens", tokens);
    println!("--------------------------------\n");
}

fn bench_score(lines: &[&str], config: &ScoringConfig, input_bytes: usize) {
    let mut scorer = LineScorer::new(config);

    println!("=== Score ===");

    let mut run = || {
        let mut retained = 0u64;
        for line in lines {
            if let Ok(Some(_)) = scorer.score_line(line) {
                retained += 1;
            }
        }
        std::hint::black_box(retained)
    };

    warmup(|| {
        run();
    });

    let mut retained = 0u64;
    let elapsed = measure(|| {
        retained = run();
    });

    print_perf("Score", input_bytes, elapsed, "Lines", lines.len() as u64);
    println!("Retained    : {}", fmt_count(retained));
    println!("--------------------------------\n");
}

fn warmup<F: FnMut()>(mut f: F) {
    (0..WARMUP_RUNS).for_each(|_| f());
}

/// Mean wall time over `MEASURE_RUNS` runs.
fn measure<F: FnMut()>(mut f: F) -> Duration {
    let total: Duration = (0..MEASURE_RUNS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .sum();

    total / MEASURE_RUNS as u32
}

fn print_perf(label: &str, input_bytes: usize, elapsed: Duration, unit: &str, count: u64) {
    let secs = elapsed.as_secs_f64().max(f64::EPSILON);
    let gib = input_bytes as f64 / GIB;

    println!("--------------------------------");
    println!("Mode        : {label}");
    println!("Elapsed     : {secs:.3} s");
    println!("Throughput  : {:.3} GiB/s", gib / secs);

    if count > 0 {
        println!("{unit:<12}: {}", fmt_count(count));
        let rate = format!("{unit}/sec");
        println!("{rate:<12}: {}", fmt_count((count as f64 / secs) as u64));
    }
}

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

fn fmt_bytes(b: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

    let mut value = b as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{b} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// `1234567` -> `1_234_567`.
fn fmt_count(n: u64) -> String {
    let digits = n.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out
}
