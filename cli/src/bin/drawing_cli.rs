use clap::{Parser, Subcommand};
use cli::{BatchConfig, ConversionJob, JobOutcome, JobReport, run_job};
use color_eyre::eyre::{Result, eyre};
use drawing::{ConversionParams, EdgeAlgorithm, ExportFormat, ExtrusionSettings};
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single drawing into a 3D model
    Convert {
        /// Drawing to convert (PNG or JPEG)
        #[arg(short, long)]
        input: PathBuf,
        /// Mesh file to write
        #[arg(short, long)]
        output: PathBuf,
        /// obj, stl, stl-binary or ply; guessed from the output extension when omitted
        #[arg(short, long)]
        format: Option<ExportFormat>,
        /// Edge operator: sobel, canny or laplacian
        #[arg(short, long, default_value = "sobel")]
        algorithm: String,
        /// Edge threshold (10-255)
        #[arg(short, long, default_value_t = 100)]
        threshold: u8,
        /// Gaussian blur sigma (0-5)
        #[arg(short, long, default_value_t = 1.0)]
        blur: f32,
        /// Extrusion depth
        #[arg(short, long, default_value_t = 50.0)]
        depth: f32,
        /// Extrude without bevelled rims
        #[arg(long)]
        no_bevel: bool,
        /// Also save the binarized edge mask as PNG
        #[arg(long)]
        edges: Option<PathBuf>,
        /// Also save the traced contours as GeoJSON
        #[arg(long)]
        contours: Option<PathBuf>,
    },
    /// Run every job in a batch configuration file concurrently
    Batch {
        /// Path to the TOML or JSON configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Write a sample batch configuration
    Init {
        /// Destination, .toml or .json
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the JSON schema of batch configuration files
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            algorithm,
            threshold,
            blur,
            depth,
            no_bevel,
            edges,
            contours,
        } => {
            let mut extrusion = ExtrusionSettings::with_depth(depth);
            extrusion.bevel_enabled = !no_bevel;
            let job = ConversionJob {
                format,
                edges_output: edges.map(|p| p.to_string_lossy().to_string()),
                contours_output: contours.map(|p| p.to_string_lossy().to_string()),
                params: ConversionParams {
                    algorithm: EdgeAlgorithm::from_name(&algorithm),
                    threshold,
                    blur,
                    extrusion,
                },
                ..ConversionJob::new("convert", input.to_string_lossy(), output.to_string_lossy())
            };
            let report = tokio::task::spawn_blocking(move || run_job(&job)).await??;
            log_report(&report);
        }
        Commands::Batch { config } => {
            run_batch(&config).await?;
        }
        Commands::Init { output } => {
            BatchConfig::sample().to_file(&output)?;
            info!("Sample configuration written to {:?}", output);
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(BatchConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn log_report(report: &JobReport) {
    match &report.outcome {
        JobOutcome::Exported {
            path,
            format,
            vertices,
            faces,
        } => info!(
            "'{}': {} contours, wrote {} ({}, {} vertices, {} faces)",
            report.name, report.contours, path, format, vertices, faces
        ),
        JobOutcome::NoModel { reason } => {
            warn!("'{}': no 3D model to export: {}", report.name, reason)
        }
    }
}

async fn run_batch(config_path: &Path) -> Result<()> {
    let config = BatchConfig::from_file(config_path)?;
    info!("Running {} jobs from {:?}", config.jobs.len(), config_path);

    let mut tasks = JoinSet::new();
    for job in config.jobs {
        tasks.spawn_blocking(move || {
            let name = job.name.clone();
            (name, run_job(&job))
        });
    }

    let mut reports = Vec::new();
    let mut failed = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined? {
            (_, Ok(report)) => {
                log_report(&report);
                reports.push(report);
            }
            (name, Err(err)) => {
                error!("'{}' failed: {}", name, err);
                failed += 1;
            }
        }
    }

    reports.sort_by(|a, b| a.name.cmp(&b.name));
    println!("{}", serde_json::to_string_pretty(&reports)?);

    if failed > 0 {
        return Err(eyre!("{failed} of {} jobs failed", reports.len() + failed));
    }
    info!("Batch completed");
    Ok(())
}
