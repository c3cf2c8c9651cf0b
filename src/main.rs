use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use company_resolver::logging::configure_logging;
use company_resolver::{
    export_rows, largest_blocks, load, sample_block, sample_clusters, sample_matches, write_csv,
    write_summary_json,
    DatasetFormat, EntityResolver, ResolutionSummary, ResolverConfig,
};

/// Group duplicate company records into entity clusters
#[derive(Parser, Debug)]
#[command(name = "company-resolver", version, about)]
struct Cli {
    /// Input dataset (CSV with header row, or JSON Lines)
    input: PathBuf,

    /// Input format (guessed from the extension when omitted)
    #[arg(long, value_enum)]
    format: Option<DatasetFormat>,

    /// Clustered CSV output
    #[arg(short, long, default_value = "entity_resolution_clustered.csv")]
    output: PathBuf,

    /// JSON config file (match_threshold, block_prefix_length)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override match threshold [0, 100]
    #[arg(long)]
    threshold: Option<u32>,

    /// Override block prefix length
    #[arg(long)]
    prefix_length: Option<usize>,

    /// How many blocks, matches and clusters to show
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Block whose members to show (defaults to the largest block)
    #[arg(long, value_name = "KEY")]
    sample_block: Option<String>,

    /// Also write a JSON run summary
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    configure_logging();
    let cli = Cli::parse();

    // 1. Config (file, then CLI overrides) - validated before loading data
    let mut config = match &cli.config {
        Some(path) => ResolverConfig::from_file(path)?,
        None => ResolverConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config = config.with_threshold(threshold);
    }
    if let Some(prefix_length) = cli.prefix_length {
        config = config.with_prefix_length(prefix_length);
    }
    let resolver = EntityResolver::new(config.clone()).context("Invalid resolver configuration")?;

    // 2. Load dataset
    let format = cli.format.unwrap_or_else(|| DatasetFormat::from_path(&cli.input));
    info!("📂 Loading {:?} ({:?})...", cli.input, format);
    let raw = load(&cli.input, format)?;
    info!("✓ Loaded {} records", raw.len());

    // 3. Resolve
    let resolution = resolver.resolve(&raw)?;

    // 4. Report
    info!("Largest blocks:");
    for block in largest_blocks(&resolution.records, cli.top) {
        info!("  {:>6}  {}", block.size, block.key);
    }

    match sample_block(&resolution.records, cli.sample_block.as_deref()) {
        Some((key, members)) => {
            info!("Sample block {}:", key);
            for record in members {
                info!(
                    "    - [{}] {} ({}, {})",
                    record.id, record.company_name, record.country, record.website_domain
                );
            }
        }
        None => info!("Sample block: no records"),
    }

    info!("Sample matches:");
    for sample in sample_matches(&resolution, cli.top) {
        info!("  {}", sample.describe());
    }

    info!("Sample clusters (more than 1 record):");
    for cluster in sample_clusters(&resolution, cli.top) {
        info!("  Cluster ID: {}", cluster.cluster_id);
        for (id, name) in &cluster.members {
            info!("    - [{}] {}", id, name);
        }
    }

    let summary = ResolutionSummary::new(&resolution, &config);
    info!("{}", summary.summary());

    info!("Output with cluster IDs:");
    for row in export_rows(&resolution).iter().take(cli.top) {
        info!("  [{}] {}  cluster {}", row.record_id, row.company_name, row.cluster_id);
    }

    // 5. Export
    let written = write_csv(&cli.output, &resolution)?;
    info!("💾 Exported {} clustered records to {:?}", written, cli.output);

    if let Some(path) = &cli.summary_json {
        write_summary_json(path, &summary)?;
        info!("✓ Summary written to {:?}", path);
    }

    Ok(())
}
