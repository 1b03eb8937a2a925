//! `reinstate`: run the searchlight reinstatement analysis for one subject.

mod progress;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use reinstate_analysis::{NearestNeighbourResampler, NiftiStore, SubjectPipeline};
use reinstate_core::config::{CliOverrides, ReinstateConfig};
use reinstate_core::errors::ReinstateErrorCode;
use reinstate_core::events::EventDispatcher;
use reinstate_core::tracing::init_tracing;
use reinstate_core::types::{AnalysisType, ScoringStrategy, SubjectId};

use crate::progress::ProgressLogger;

#[derive(Parser)]
#[command(name = "reinstate")]
#[command(about = "Searchlight reinstatement analysis for one subject", long_about = None)]
struct Cli {
    /// Subject identifier (141, sub-141, or EL141)
    subject: String,

    /// Analysis type: trialwise_<memory column>, e.g. trialwise_recognition
    analysis_type: String,

    /// Working root holding reinstate.toml
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Study base directory (overrides [paths].base_dir)
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Scoring strategy: corrected or uncorrected
    #[arg(long)]
    strategy: Option<ScoringStrategy>,

    /// Worker pool size
    #[arg(long)]
    pool_size: Option<usize>,

    /// Bootstrap seed
    #[arg(long)]
    seed: Option<u64>,

    /// Bootstrap iterations
    #[arg(long)]
    n_perm: Option<usize>,

    /// Print the run summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let subject = SubjectId::parse(&cli.subject)?;
    let analysis = AnalysisType::parse(&cli.analysis_type)?;

    let overrides = CliOverrides {
        base_dir: cli.base_dir.clone(),
        strategy: cli.strategy,
        pool_size: cli.pool_size,
        seed: cli.seed,
        n_perm: cli.n_perm,
    };
    let config = ReinstateConfig::load(&cli.root, Some(&overrides))
        .with_context(|| format!("loading configuration from {}", cli.root.display()))?;

    let mut events = EventDispatcher::new();
    events.register(Arc::new(ProgressLogger::default()));

    let summary = SubjectPipeline::new(&config, &NiftiStore, &NearestNeighbourResampler)
        .with_events(events)
        .run(&subject, &analysis)
        .map_err(|e| {
            let code = e.error_code();
            anyhow::Error::new(e)
                .context(format!("[{code}] searchlight failed for {subject} ({analysis})"))
        })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} {} [{}]: {} centers, {} scored, {} skipped in {} ms",
            summary.subject,
            summary.analysis,
            summary.strategy,
            summary.centers,
            summary.scored,
            summary.skipped,
            summary.duration_ms
        );
        for path in &summary.outputs {
            println!("  {}", path.display());
        }
    }
    Ok(())
}
