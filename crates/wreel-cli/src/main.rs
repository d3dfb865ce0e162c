//! Walk reel curation CLI.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wreel_engine::{CuratorConfig, WalkCurator};
use wreel_models::{format_seconds, CuratedWalk, WalkAnnotations};

#[derive(Parser)]
#[command(name = "wreel", about = "Curate dog-walk footage into highlight reels")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Curate a walk's annotations into a highlight reel
    Curate {
        /// Path to the provider's annotation JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the curated walk (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the reel budget in seconds
        #[arg(long)]
        budget_secs: Option<f64>,

        /// Use the short teaser preset instead of the full reel
        #[arg(long, conflicts_with = "budget_secs")]
        teaser: bool,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Summarize a previously curated walk
    Stats {
        /// Path to a curated walk JSON
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the JSON schema for a wire type
    Schema {
        /// Which type to describe
        #[arg(value_enum, default_value_t = SchemaKind::Annotations)]
        kind: SchemaKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    /// Provider input: walk annotations
    Annotations,
    /// Curation output: curated walk
    Curated,
}

fn main() {
    dotenvy::dotenv().ok();

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("wreel=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Curate {
            input,
            output,
            budget_secs,
            teaser,
            pretty,
        } => curate(input, output, budget_secs, teaser, pretty),
        Commands::Stats { input } => stats(input),
        Commands::Schema { kind } => schema(kind),
    }
}

fn curate(
    input: PathBuf,
    output: Option<PathBuf>,
    budget_secs: Option<f64>,
    teaser: bool,
    pretty: bool,
) -> Result<()> {
    let raw = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let annotations: WalkAnnotations = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse annotations from {}", input.display()))?;
    if let Err(reason) = annotations.validate() {
        bail!("Invalid annotations: {}", reason);
    }

    let mut config = if teaser {
        CuratorConfig::teaser()
    } else {
        CuratorConfig::from_env()
    };
    if let Some(budget) = budget_secs {
        let overage = config.ceiling_secs - config.budget_secs;
        config.budget_secs = budget;
        config.ceiling_secs = budget + overage;
    }
    if let Err(reason) = config.validate() {
        bail!("Invalid curator config: {}", reason);
    }

    let curated = WalkCurator::new(config).curate(annotations);

    let json = if pretty {
        serde_json::to_string_pretty(&curated)?
    } else {
        serde_json::to_string(&curated)?
    };
    match output {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                walk_id = %curated.walk_id,
                output = %path.display(),
                "Curated walk written"
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn stats(input: PathBuf) -> Result<()> {
    let raw = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let curated: CuratedWalk = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse curated walk from {}", input.display()))?;

    let stats = &curated.stats;
    println!("Walk:            {}", curated.walk_id);
    println!(
        "Reel:            {} segments, {}",
        stats.segment_count,
        format_seconds(stats.total_secs)
    );
    println!("  ai-scored:         {}", stats.ai_scored);
    println!("  companion:         {}", stats.companion);
    println!("  scenery:           {}", stats.scenery);
    println!("  companion+scenery: {}", stats.companion_scenery);
    println!("  feeding:           {}", stats.feeding);
    println!("  safety:            {}", stats.safety);
    println!("Mood samples:    {}", curated.mood.len());
    println!("Timeline items:  {}", curated.timeline.len());
    Ok(())
}

fn schema(kind: SchemaKind) -> Result<()> {
    let schema = match kind {
        SchemaKind::Annotations => schemars::schema_for!(WalkAnnotations),
        SchemaKind::Curated => schemars::schema_for!(CuratedWalk),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
