//! irisgauge CLI: pupil/iris geometry and PIR for a single eye image.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use irisgauge::{
    AnalysisOutcome, EyeSide, InpaintMethod, Pipeline, PipelineConfig, PipelineError,
    TraceSummary,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

/// Exit status when the image was read but no pupil/iris could be fitted.
const EXIT_GEOMETRY_FAILED: u8 = 2;

#[derive(Parser)]
#[command(name = "irisgauge")]
#[command(about = "Estimate pupil and iris geometry and the pupil-to-iris ratio (PIR)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one near-infrared eye image.
    Analyze(CliAnalyzeArgs),

    /// Print the default pipeline configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the result record (JSON). Defaults to stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Which eye the image shows.
    #[arg(long, value_enum, default_value_t = EyeSideArg::Left)]
    eye_side: EyeSideArg,

    /// Pipeline configuration file (JSON); flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write a versioned trace summary (JSON).
    #[arg(long)]
    trace_json: Option<PathBuf>,

    /// Path to write an annotated overlay (PNG). Written on success only.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Pixels below this intensity are pupil.
    #[arg(long)]
    pupil_threshold: Option<u8>,

    /// Pixels below this intensity are iris (or pupil).
    #[arg(long)]
    iris_threshold: Option<u8>,

    /// Pixels above this intensity inside the pupil are reflections.
    #[arg(long)]
    reflection_threshold: Option<u8>,

    /// Skip specular reflection removal.
    #[arg(long)]
    no_reflection_removal: bool,

    /// Inpainting method for reflection removal.
    #[arg(long, value_enum)]
    inpaint_method: Option<InpaintMethodArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EyeSideArg {
    Left,
    Right,
}

impl EyeSideArg {
    fn to_core(self) -> EyeSide {
        match self {
            Self::Left => EyeSide::Left,
            Self::Right => EyeSide::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InpaintMethodArg {
    Telea,
    Diffusion,
}

impl InpaintMethodArg {
    fn to_core(self) -> InpaintMethod {
        match self {
            Self::Telea => InpaintMethod::Telea,
            Self::Diffusion => InpaintMethod::Diffusion,
        }
    }
}

impl CliAnalyzeArgs {
    fn build_config(&self) -> CliResult<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading config: {}", path.display());
                PipelineConfig::from_json_file(path)?
            }
            None => PipelineConfig::default(),
        };

        if let Some(t) = self.pupil_threshold {
            config.segmentation.pupil_threshold = t;
        }
        if let Some(t) = self.iris_threshold {
            config.segmentation.iris_threshold = t;
        }
        if let Some(t) = self.reflection_threshold {
            config.reflection.reflection_threshold = t;
        }
        if self.no_reflection_removal {
            config.reflection.enable = false;
        }
        if let Some(m) = self.inpaint_method {
            config.reflection.inpaint_method = m.to_core();
        }
        Ok(config)
    }
}

fn main() -> CliResult<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::DefaultConfig => run_default_config(),
    }
}

// ── default-config ─────────────────────────────────────────────────────

fn run_default_config() -> CliResult<ExitCode> {
    println!(
        "{}",
        serde_json::to_string_pretty(&PipelineConfig::default())?
    );
    Ok(ExitCode::SUCCESS)
}

// ── analyze ────────────────────────────────────────────────────────────

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<ExitCode> {
    let config = args.build_config()?;
    let pipeline = Pipeline::with_config(config)?;

    tracing::info!("Loading image: {}", args.image.display());
    let gray = irisgauge::decode::open_gray(&args.image).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", args.image.display(), e).into()
    })?;
    let (w, h) = gray.dimensions();
    tracing::info!("Image size: {}x{}", w, h);

    let eye_side = args.eye_side.to_core();
    let (result, trace) = pipeline.analyze_with_trace(&gray, eye_side);

    if let Some(path) = &args.trace_json {
        let summary = TraceSummary::from_trace(
            &trace,
            pipeline.config(),
            Some(args.image.display().to_string()),
        );
        write_json(path, &summary)?;
        tracing::info!("Trace summary written to {}", path.display());
    }

    if let (Some(path), Some(geometry)) = (&args.overlay, &trace.geometry) {
        let overlay = irisgauge::overlay::render_overlay(&gray, geometry, eye_side);
        overlay.save(path)?;
        tracing::info!("Overlay written to {}", path.display());
    }

    let status = match &result {
        Ok(report) => {
            tracing::info!(
                "PIR {:.4} (pupil r={:.2}, iris r={:.2})",
                report.pir,
                report.pupil_radius,
                report.iris_radius
            );
            ExitCode::SUCCESS
        }
        Err(PipelineError::Geometry(e)) => {
            tracing::warn!("{}", e);
            ExitCode::from(EXIT_GEOMETRY_FAILED)
        }
        Err(e) => return Err(e.to_string().into()),
    };

    let outcome = AnalysisOutcome::from(result);
    match &args.out {
        Some(path) => {
            write_json(path, &outcome)?;
            tracing::info!("Result written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(status)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
