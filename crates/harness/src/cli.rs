//! CLI wiring for the kernelduel harness.

use crate::config::HarnessConfig;
use crate::params::KernelParams;
use crate::report::SuiteReport;
use crate::runner::{resolve_provider, Comparison, ComparisonRunner, TracingObserver};
use crate::verdict::{Winner, TIE_THRESHOLD_PERCENT};
use anyhow::Result;
use clap::{Parser, Subcommand};
use kernelduel_kernels::{warm_palette, MultiplyStrategy, ProviderRegistry};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "kernelduel", about = "Race two kernel implementations on identical inputs")]
pub struct Cli {
    /// Provider timed first.
    #[arg(long)]
    pub provider_a: Option<String>,

    /// Provider timed second.
    #[arg(long)]
    pub provider_b: Option<String>,

    /// Calls per side.
    #[arg(long)]
    pub iterations: Option<usize>,

    /// JSON file with per-kernel parameters.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON instead of a summary.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum StrategyArg {
    Naive,
    Optimized,
}

impl From<StrategyArg> for MultiplyStrategy {
    fn from(value: StrategyArg) -> MultiplyStrategy {
        match value {
            StrategyArg::Naive => MultiplyStrategy::Naive,
            StrategyArg::Optimized => MultiplyStrategy::Optimized,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare escape-time fractal rendering.
    Fractal {
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long, allow_negative_numbers = true)]
        center_x: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        center_y: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        zoom: Option<f64>,
        #[arg(long)]
        max_iterations: Option<u32>,
    },
    /// Compare prime counting, or enumeration with --enumerate.
    Primes {
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
        #[arg(long, default_value_t = false)]
        enumerate: bool,
    },
    /// Compare square matrix multiplication.
    Matrix {
        #[arg(long)]
        size: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_enum)]
        strategy_a: Option<StrategyArg>,
        #[arg(long, value_enum)]
        strategy_b: Option<StrategyArg>,
    },
    /// Compare the clamped box blur on a generated test image.
    Blur {
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long, allow_negative_numbers = true)]
        radius: Option<i32>,
    },
    /// Compare every kernel in sequence.
    Suite,
    /// List registered providers.
    Providers,
}

pub fn run_cli(cli: Cli) -> Result<()> {
    tracing_subscriber::fmt::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let Cli {
        provider_a,
        provider_b,
        iterations,
        config,
        json,
        command,
    } = cli;

    let mut config = match config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(name) = provider_a {
        config.provider_a = name;
    }
    if let Some(name) = provider_b {
        config.provider_b = name;
    }
    if let Some(iterations) = iterations {
        config.iterations = iterations;
    }

    let registry = ProviderRegistry::with_default_providers();
    if let Command::Providers = command {
        for provider in registry.providers() {
            println!("{:<12} {}", provider.name(), provider.module_name());
        }
        return Ok(());
    }

    let suite = planned_params(&config, command);

    let a = resolve_provider(&registry, &config.provider_a)?;
    let b = resolve_provider(&registry, &config.provider_b)?;
    let runner = ComparisonRunner::new(config.iterations)?;

    warm_palette();
    info!(
        provider_a = a.name(),
        provider_b = b.name(),
        iterations = runner.iterations(),
        kernels = suite.len(),
        "starting comparison"
    );
    let comparisons = runner.run_suite(a.as_ref(), b.as_ref(), &suite, &mut TracingObserver)?;

    if json {
        let report = SuiteReport::new(&comparisons);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for comparison in &comparisons {
            print_summary(comparison);
        }
    }
    Ok(())
}

/// Layers subcommand flags over the configured parameters for that kernel.
fn planned_params(config: &HarnessConfig, command: Command) -> Vec<KernelParams> {
    let params = match command {
        Command::Fractal {
            width,
            height,
            center_x,
            center_y,
            zoom,
            max_iterations,
        } => {
            let mut viewport = config.fractal;
            viewport.width = width.unwrap_or(viewport.width);
            viewport.height = height.unwrap_or(viewport.height);
            viewport.center_x = center_x.unwrap_or(viewport.center_x);
            viewport.center_y = center_y.unwrap_or(viewport.center_y);
            viewport.zoom = zoom.unwrap_or(viewport.zoom);
            viewport.max_iterations = max_iterations.unwrap_or(viewport.max_iterations);
            KernelParams::Fractal(viewport)
        }
        Command::Primes { limit, enumerate } => {
            let mut primes = config.primes;
            primes.limit = limit.unwrap_or(primes.limit);
            primes.enumerate |= enumerate;
            KernelParams::Primes(primes)
        }
        Command::Matrix {
            size,
            seed,
            strategy_a,
            strategy_b,
        } => {
            let mut matrix = config.matrix;
            matrix.size = size.unwrap_or(matrix.size);
            matrix.seed = seed.unwrap_or(matrix.seed);
            matrix.strategy_a = strategy_a.map_or(matrix.strategy_a, Into::into);
            matrix.strategy_b = strategy_b.map_or(matrix.strategy_b, Into::into);
            KernelParams::Matrix(matrix)
        }
        Command::Blur {
            width,
            height,
            radius,
        } => {
            let mut blur = config.blur;
            blur.width = width.unwrap_or(blur.width);
            blur.height = height.unwrap_or(blur.height);
            blur.radius = radius.unwrap_or(blur.radius);
            KernelParams::Blur(blur)
        }
        Command::Suite => return config.suite(),
        Command::Providers => return Vec::new(),
    };
    vec![params]
}

fn print_summary(comparison: &Comparison) {
    println!(
        "{} ({} runs per side)",
        comparison.kernel, comparison.iterations
    );
    for (label, provider, sample) in [
        ("A", &comparison.provider_a, &comparison.sample_a),
        ("B", &comparison.provider_b, &comparison.sample_b),
    ] {
        let stats = sample.statistics();
        println!(
            "  {label} {provider:<12} avg {:>10}  min {:>10}  max {:>10}",
            format_time(stats.avg_ms),
            format_time(stats.min_ms),
            format_time(stats.max_ms)
        );
    }

    let verdict = &comparison.verdict;
    let gap = verdict.percent_difference.abs();
    match verdict.winner {
        Winner::Tie => println!(
            "  tie: both implementations within {TIE_THRESHOLD_PERCENT:.0}% of each other"
        ),
        Winner::A => println!(
            "  {} (A) wins: {gap:.1}% faster, {:.2}x",
            comparison.provider_a, verdict.speedup
        ),
        Winner::B => println!(
            "  {} (B) wins: {gap:.1}% faster, {:.2}x",
            comparison.provider_b, verdict.speedup
        ),
    }
}

/// Microseconds below 0.01 ms, three decimals below 1 ms, two above.
pub fn format_time(ms: f64) -> String {
    if ms < 0.01 {
        format!("{:.2} µs", ms * 1000.0)
    } else if ms < 1.0 {
        format!("{ms:.3} ms")
    } else {
        format!("{ms:.2} ms")
    }
}
