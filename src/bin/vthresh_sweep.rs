use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vthresh::{
    compute_error_rate, compute_error_rate_par, CsvRenderer, Renderer, SvgRenderer, SweepConfig,
};

const DEFAULT_CONFIG_FILE: &str = "vthresh.json";

#[derive(Debug, Parser)]
#[command(name = "vthresh-sweep")]
#[command(about = "Sweep the misclassification rate of a noisy voltage-threshold detector")]
struct Cli {
    /// JSON sweep configuration (defaults to ./vthresh.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Nominal decision threshold [V]
    #[arg(long)]
    threshold: Option<f64>,

    /// Systematic offset added to the threshold [V]
    #[arg(long)]
    offset: Option<f64>,

    /// Standard deviation of the reading noise [V]
    #[arg(long)]
    noise_std_dev: Option<f64>,

    /// Lower end of the voltage sweep [V]
    #[arg(long)]
    v_min: Option<f64>,

    /// Upper end of the voltage sweep [V]
    #[arg(long)]
    v_max: Option<f64>,

    /// Number of sweep samples
    #[arg(long)]
    samples: Option<usize>,

    /// Evaluate samples on the rayon thread pool
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Write the CSV table here ("-" for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write an SVG chart here
    #[arg(long)]
    svg: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(error) = try_main() {
        eprintln!("vthresh sweep failed: {error:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    config.validate().context("invalid sweep configuration")?;

    let model = config.model();
    let domain = config.domain().context("failed to build voltage domain")?;
    let effective_threshold = model.effective_threshold();

    info!(
        nominal_threshold = model.nominal_threshold,
        systematic_offset = model.systematic_offset,
        noise_std_dev = model.noise_std_dev,
        samples = domain.len(),
        "running error-rate sweep"
    );

    let series = if config.parallel {
        compute_error_rate_par(&domain, &model)?
    } else {
        compute_error_rate(&domain, &model)?
    };

    let csv_to_stdout = match cli.csv.as_deref() {
        Some(path) => path == Path::new("-"),
        None => cli.svg.is_none(),
    };

    let mut renderers: Vec<Box<dyn Renderer>> = Vec::new();
    if csv_to_stdout {
        renderers.push(Box::new(CsvRenderer::new(io::stdout())));
    } else if let Some(path) = cli.csv.as_deref() {
        let renderer = CsvRenderer::create(path)
            .with_context(|| format!("failed to open CSV output {}", path.display()))?;
        renderers.push(Box::new(renderer));
    }
    if let Some(path) = cli.svg.as_deref() {
        renderers.push(Box::new(SvgRenderer::new(path, config.plot.clone())));
    }

    for renderer in &mut renderers {
        renderer
            .render(&series, effective_threshold)
            .with_context(|| format!("{} renderer failed", renderer.name()))?;
    }

    let peak = series
        .peak()
        .context("error-rate series unexpectedly empty")?;

    // Stdout carries the CSV table in that mode, so the summary goes to the log.
    if csv_to_stdout {
        info!(
            effective_threshold,
            peak_error_rate = peak.error_rate,
            peak_voltage = peak.voltage,
            "sweep complete"
        );
        return Ok(());
    }

    if let Some(path) = &cli.csv {
        println!("CSV: {}", path.display());
    }
    if let Some(path) = &cli.svg {
        println!("Chart: {}", path.display());
    }
    println!(
        "Effective threshold: {effective_threshold} V | peak error rate {:.4} at {:.4} V",
        peak.error_rate, peak.voltage
    );

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SweepConfig> {
    if let Some(path) = path {
        return SweepConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }

    let cwd_config = PathBuf::from(DEFAULT_CONFIG_FILE);
    if cwd_config.exists() {
        return SweepConfig::load(&cwd_config)
            .with_context(|| format!("failed to load config {}", cwd_config.display()));
    }

    Ok(SweepConfig::default())
}

fn apply_overrides(config: &mut SweepConfig, cli: &Cli) {
    if let Some(v) = cli.threshold {
        config.nominal_threshold = v;
    }
    if let Some(v) = cli.offset {
        config.systematic_offset = v;
    }
    if let Some(v) = cli.noise_std_dev {
        config.noise_std_dev = v;
    }
    if let Some(v) = cli.v_min {
        config.voltage_min = v;
    }
    if let Some(v) = cli.v_max {
        config.voltage_max = v;
    }
    if let Some(v) = cli.samples {
        config.num_samples = v;
    }
    if cli.parallel {
        config.parallel = true;
    }
}
