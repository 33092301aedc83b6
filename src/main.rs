//! Zero-shot consistency scoring over JSON lines.
//!
//! Reads `{"document": ..., "summary": ...}` objects from stdin, one per line,
//! and writes `{"score": ...}` lines to stdout in the same order.
//!
//! Usage: `consistency [model] [granularity]` (defaults: `mnli`, `sentence`).

use std::io::{self, BufRead, Write};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use consistency::config::Config;
use consistency::scoring::{ZeroShotConfig, ZeroShotScorer};

const DEFAULT_MODEL: &str = "mnli";
const DEFAULT_GRANULARITY: &str = "sentence";

#[derive(Debug, Deserialize)]
struct PairInput {
    document: String,
    summary: String,
}

#[derive(Debug, Serialize)]
struct ScoreOutput {
    score: f32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let model = args.next().unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let granularity = args
        .next()
        .unwrap_or_else(|| DEFAULT_GRANULARITY.to_string());

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        model = %model,
        granularity = %granularity,
        cache_dir = %config.cache_dir.display(),
        batch_size = config.batch_size,
        "Consistency scorer starting"
    );

    let scorer_config = ZeroShotConfig::from_config(&model, &granularity, &config)?
        .with_load_cache(config.use_cache);
    let mut scorer = ZeroShotScorer::load(scorer_config)?;

    let mut documents = Vec::new();
    let mut summaries = Vec::new();
    for (index, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let pair: PairInput = serde_json::from_str(&line)
            .with_context(|| format!("invalid input on line {}", index + 1))?;
        documents.push(pair.document);
        summaries.push(pair.summary);
    }

    let output = scorer.score(&documents, &summaries, config.batch_size)?;

    let mut stdout = io::stdout().lock();
    for score in output.scores {
        serde_json::to_writer(&mut stdout, &ScoreOutput { score })?;
        writeln!(stdout)?;
    }

    if config.use_cache {
        let saved = scorer.save_imager_cache()?;
        tracing::info!(saved, "Image cache saved");
    }

    Ok(())
}
