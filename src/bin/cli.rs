//! Strata CLI - compile a source tree into an LLM context artifact.
//!
//! Usage:
//!   strata .                           # Emit the full artifact
//!   strata . --max-tokens 8000         # Budgeted selection
//!   strata . --compress structural     # Signatures only
//!   strata . --json                    # Machine-readable plan

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use strata::{
    scan_dir, CancelToken, CompressionMode, Engine, EngineConfig, HeuristicTokenCounter,
    MemoryCache, NoGitMetadata, Notice,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Compile a source tree into ranked, budgeted LLM context", long_about = None)]
struct Cli {
    /// Project root directory
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Token ceiling for the artifact (omit to include everything)
    #[arg(short, long)]
    max_tokens: Option<usize>,

    /// How file content is rewritten before budgeting
    #[arg(short, long, value_enum, default_value_t = Compress::None)]
    compress: Compress,

    /// Emit the plan as JSON instead of the concatenated artifact
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Compress {
    None,
    Strip,
    Structural,
}

impl From<Compress> for CompressionMode {
    fn from(mode: Compress) -> Self {
        match mode {
            Compress::None => CompressionMode::None,
            Compress::Strip => CompressionMode::Strip,
            Compress::Structural => CompressionMode::Structural,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let catalog = scan_dir(&root)?;

    let config = EngineConfig {
        max_tokens: cli.max_tokens,
        compression: cli.compress.into(),
        ..EngineConfig::default()
    };
    let cache = MemoryCache::new();
    let engine = Engine::new(&config, &NoGitMetadata, &HeuristicTokenCounter, &cache);
    let plan = engine.run(&catalog, &CancelToken::new())?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    for file in &plan.files {
        let rel = file.path.strip_prefix(&root).unwrap_or(&file.path);
        println!("==== {} ({} tokens) ====", rel.display(), file.tokens);
        println!("{}", file.content);
    }

    eprintln!(
        "{} files, {} tokens{}",
        plan.files.len(),
        plan.total_tokens,
        match plan.rejected.len() {
            0 => String::new(),
            n => format!(", {n} rejected over budget"),
        }
    );
    for notice in &plan.notices {
        match notice {
            Notice::ExtractionDegraded { path } => {
                eprintln!("note: fell back to loose extraction for {}", path.display());
            }
            Notice::CycleBroken { path } => {
                eprintln!("note: dependency cycle broken at {}", path.display());
            }
            Notice::BudgetInfeasible => {
                eprintln!("note: budget too small for any file");
            }
        }
    }

    Ok(())
}
