mod error;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use invitegen::catalog::{SeededRandom, ThreadRandom};
use invitegen::generation::{CostModel, LogProgress};
use invitegen::imaging::{OverlayStyle, OverlayText};
use invitegen::{
    estimate_cost, get_template_stats, load_config, BatchConfig, CancelSignal, Config,
    DecorationKind, ImageProcessor, Orchestrator, RunSummary, TemplateGenerator,
};

use error::{io_error, CliError, Result};
use logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "invitegen", version, about = "Generate invitation background templates")]
struct Cli {
    /// Config file (default: <config dir>/invitegen/config.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// More output; repeat for trace level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand the catalog into template records without rendering anything
    Seed(SeedArgs),
    /// Render templates and store them
    Generate(GenerateArgs),
    /// Cost and duration estimate for a synthesis run
    Estimate(EstimateArgs),
    /// Render one gradient placeholder to a file
    Placeholder(PlaceholderArgs),
    /// Composite invitation text over an image
    Preview(PreviewArgs),
    /// Synthesize a standalone decorative element
    Decoration(DecorationArgs),
}

#[derive(Args, Debug)]
struct SeedArgs {
    #[arg(long)]
    category: Option<String>,
    /// Templates to generate for `--category` (default: its target count)
    #[arg(long, requires = "category")]
    count: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Only this category
    #[arg(long)]
    category: Option<String>,
    /// Render local placeholders instead of calling the image API
    #[arg(long)]
    local: bool,
    #[arg(long)]
    styles_per_subcategory: Option<usize>,
    /// Where to write the run manifest
    #[arg(long, default_value = "manifest.json")]
    manifest: PathBuf,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    /// Template count (default: the catalog's total target count)
    #[arg(long)]
    count: Option<usize>,
}

#[derive(Args, Debug)]
struct PlaceholderArgs {
    /// Three hex colors: center, edge, accent
    #[arg(long, value_delimiter = ',', required = true)]
    colors: Vec<String>,
    #[arg(short, long)]
    output: PathBuf,
    /// Edge length in pixels (default: print size)
    #[arg(long)]
    size: Option<u32>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[arg(short, long)]
    input: PathBuf,
    #[arg(long)]
    title: String,
    #[arg(long)]
    subtitle: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct DecorationArgs {
    #[arg(long)]
    kind: DecorationKind,
    #[arg(long)]
    style: String,
    #[arg(long)]
    color: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;
    match cli.command {
        Command::Seed(args) => seed(&config, args),
        Command::Estimate(args) => estimate(&config, args),
        Command::Placeholder(args) => placeholder(&config, args),
        Command::Preview(args) => preview(&config, args),
        Command::Generate(args) => runtime()?.block_on(generate(config, args)),
        Command::Decoration(args) => runtime()?.block_on(decoration(config, args)),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("invitegen").join("config.json"))
}

/// An explicit `--config` must load. Otherwise the default location is used
/// when it exists, and built-in defaults when it does not.
fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        info!("Using config {}", path.display());
        return Ok(load_config(path)?);
    }
    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Using config {}", path.display());
            Ok(load_config(&path)?)
        }
        _ => Ok(Config::default()),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, json).map_err(io_error(path))
}

fn seed(config: &Config, args: SeedArgs) -> Result<()> {
    let catalog = Arc::new(config.load_catalog()?);
    let random: Box<dyn invitegen::catalog::RandomSource> = match args.seed.or(config.batch.seed) {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    };
    let mut generator = TemplateGenerator::new(Arc::clone(&catalog), random);

    let templates = match &args.category {
        Some(key) => {
            let category = catalog
                .category(key)
                .ok_or_else(|| CliError::Usage(format!("Unknown category '{}'", key)))?;
            let count = args.count.unwrap_or(category.target_count);
            generator.generate_templates_for_category(key, count)
        }
        None => generator.generate_all_templates(),
    };

    let stats = get_template_stats(&templates);
    println!("{}", serde_json::to_string_pretty(&stats)?);

    if let Some(output) = &args.output {
        write_json(output, &templates)?;
        info!(count = templates.len(), "Wrote templates to {}", output.display());
    }
    Ok(())
}

fn estimate(config: &Config, args: EstimateArgs) -> Result<()> {
    let count = match args.count {
        Some(count) => count,
        None => config.load_catalog()?.total_target_count(),
    };
    let estimate = estimate_cost(count, &CostModel::from(&config.cost));
    println!("{}", serde_json::to_string_pretty(&estimate)?);
    Ok(())
}

fn processor(config: &Config) -> ImageProcessor {
    ImageProcessor::new(
        Arc::new(invitegen::imaging::RasterBackend::new()),
        config.imaging.print_spec(),
        config.imaging.thumbnail_width,
    )
}

fn placeholder(config: &Config, args: PlaceholderArgs) -> Result<()> {
    let processor = processor(config);
    let size = args.size.unwrap_or_else(|| processor.print_pixels());
    let png = processor.render_gradient_placeholder(&args.colors, size, size)?;
    std::fs::write(&args.output, png).map_err(io_error(&args.output))?;
    info!(size, "Wrote placeholder to {}", args.output.display());
    Ok(())
}

fn preview(config: &Config, args: PreviewArgs) -> Result<()> {
    let bytes = std::fs::read(&args.input).map_err(io_error(&args.input))?;
    let text = OverlayText {
        subtitle: args.subtitle,
        date: args.date,
        location: args.location,
        ..OverlayText::new(args.title)
    };
    let png = processor(config).composite_text_overlay(&bytes, &text, &OverlayStyle::default())?;
    std::fs::write(&args.output, png).map_err(io_error(&args.output))?;
    info!("Wrote preview to {}", args.output.display());
    Ok(())
}

async fn generate(config: Config, args: GenerateArgs) -> Result<()> {
    let mut config = config;
    if args.local {
        config.batch.use_ai_synthesis = false;
    }
    let orchestrator = Orchestrator::from_config(&config)?;

    let mut batch = BatchConfig::from_config(&config);
    if let Some(styles) = args.styles_per_subcategory {
        batch.styles_per_subcategory = styles;
    }

    let cancel = CancelSignal::new();
    let handler_signal = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("Interrupt received, stopping after the current template");
        handler_signal.cancel();
    })?;

    let results = match &args.category {
        Some(key) => {
            orchestrator
                .generate_category_templates(key, &batch, &LogProgress, &cancel)
                .await?
        }
        None => {
            orchestrator
                .generate_all_templates(&batch, &LogProgress, &cancel)
                .await?
        }
    };

    let summary = RunSummary::from_results(&results);
    write_json(&args.manifest, &summary)?;
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        cancelled = cancel.is_cancelled(),
        "Wrote manifest to {}",
        args.manifest.display()
    );
    Ok(())
}

async fn decoration(config: Config, args: DecorationArgs) -> Result<()> {
    let orchestrator = Orchestrator::from_config(&config)?;
    let result = orchestrator
        .generate_decoration(args.kind, &args.style, &args.color)
        .await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    match result.error() {
        Some(e) => Err(CliError::Usage(format!("Decoration failed: {}", e))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "invitegen",
            "-vv",
            "generate",
            "--local",
            "--category",
            "wedding",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Generate(args) => {
                assert!(args.local);
                assert_eq!(args.category.as_deref(), Some("wedding"));
                assert_eq!(args.manifest, PathBuf::from("manifest.json"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_colors_are_split() {
        let cli = Cli::parse_from([
            "invitegen",
            "placeholder",
            "--colors",
            "#D4AF37,#1C1917,#FAFAF9",
            "--output",
            "out.png",
        ]);
        match cli.command {
            Command::Placeholder(args) => assert_eq!(args.colors.len(), 3),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_rejects_two_colors() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = placeholder(
            &Config::default(),
            PlaceholderArgs {
                colors: vec!["#D4AF37".into(), "#1C1917".into()],
                output: dir.path().join("out.png"),
                size: Some(32),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("3 colors"));
    }

    #[test]
    fn test_decoration_kind_parses() {
        let cli = Cli::parse_from([
            "invitegen",
            "decoration",
            "--kind",
            "flourish",
            "--style",
            "art-deco",
            "--color",
            "#C9A227",
        ]);
        match cli.command {
            Command::Decoration(args) => assert_eq!(args.kind, DecorationKind::Flourish),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        assert!(resolve_config(Some(Path::new("/nonexistent/invitegen.json"))).is_err());
    }

    #[test]
    fn test_seed_writes_templates() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("templates.json");
        seed(
            &Config::default(),
            SeedArgs {
                category: Some("anniversary".into()),
                count: Some(8),
                seed: Some(3),
                output: Some(output.clone()),
            },
        )
        .unwrap();
        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(output).unwrap()).unwrap();
        assert_eq!(written.as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_seed_rejects_unknown_category() {
        let err = seed(
            &Config::default(),
            SeedArgs {
                category: Some("retirement".into()),
                count: None,
                seed: None,
                output: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }
}
