//! Marathon-shape report binary.
//!
//! Run with: `cargo run --bin shape-report -- alice bob`
//!
//! Reads `<user>_marathon.json` and `<user>_vo2.json` from the directory
//! named by `DATA_DIR` (default `docs/data`, the fetch pipeline's output
//! layout) and prints the assembled reports as JSON. Set `RUST_LOG` to
//! control log verbosity.

use runshape::{AthleteReport, DirectorySource, DEFAULT_WINDOWS, READINESS_TARGET};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "docs/data".to_string());
    let users: Vec<String> = std::env::args().skip(1).collect();
    if users.is_empty() {
        eprintln!("usage: shape-report <user> [user...]");
        eprintln!("       DATA_DIR selects the document directory (default: docs/data)");
        std::process::exit(2);
    }

    tracing::info!("building reports for {} user(s) from {}", users.len(), data_dir);

    let source = DirectorySource::new(&data_dir);
    let reports: Vec<AthleteReport> = users
        .iter()
        .map(|user| AthleteReport::build(&source, user, &DEFAULT_WINDOWS, READINESS_TARGET))
        .collect();

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
