//! Feature runner with report selection.
//!
//! Usage:
//!   cargo run --bin apirest-runner -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin apirest-runner
//!   cargo run --bin apirest-runner -- --runner basic
//!   cargo run --bin apirest-runner -- --live --config resources/configurations.properties
//!   cargo run --bin apirest-runner -- --features tests/bdd/features --output target/reports

#[path = "../steps/mod.rs"]
mod steps;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use apirest_bdd_tests::{features_dir, set_target, Target, MOCK_ONLY_TAG};
use apirest_config::{Configuration, RunnerKind};
use apirest_monitoring::{init_logging, LogExt, LoggingConfig};
use clap::Parser;
use cucumber::gherkin::{Feature, Rule, Scenario};
use cucumber::writer::Stats as _;
use cucumber::{writer, World, WriterExt};
use steps::hooks::{after_scenario, before_scenario};
use steps::world::ApiWorld;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Properties file
    #[arg(long, env = "APIREST_CONFIG", default_value = "resources/configurations.properties")]
    config: PathBuf,

    /// Directory containing .feature files
    #[arg(long)]
    features: Option<PathBuf>,

    /// Report format, overriding runner.execution.test
    #[arg(long)]
    runner: Option<String>,

    /// Directory for report files
    #[arg(long, default_value = "target/apirest-reports")]
    output: PathBuf,

    /// Send requests to the configured environment instead of the mock API
    #[arg(long)]
    live: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("apirest-runner: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every scenario passed
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let configuration = Configuration::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_logging(&LoggingConfig::from_configuration(&configuration))?;

    let kind = match cli.runner.as_deref() {
        Some(name) => RunnerKind::resolve(name),
        None => configuration.runner(),
    }
    .log_err("Unsupported runner")?;

    let features = cli.features.clone().unwrap_or_else(features_dir);
    let live = cli.live;
    info!(
        environment = ?configuration.environment(),
        runner = ?kind,
        features = %features.display(),
        live,
        "Running features"
    );

    set_target(if live {
        Target::Live(configuration)
    } else {
        Target::Mock
    });

    let passed = match kind.report_file_name() {
        None => run_basic(features, live).await,
        Some(file_name) => {
            let report = create_report(&cli.output, file_name).log_ok("Report file created")?;
            match kind {
                RunnerKind::JUnit => run_junit(features, live, report).await,
                _ => run_json(features, live, report).await,
            }
        }
    };

    if passed {
        info!("All scenarios passed");
    } else {
        error!("Some scenarios failed");
    }
    Ok(passed)
}

fn create_report(dir: &Path, file_name: &str) -> anyhow::Result<File> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(file_name);
    info!(report = %path.display(), "Writing report");
    File::create(&path).with_context(|| format!("creating {}", path.display()))
}

/// In live runs scenarios tagged `@mock`, or inside a feature tagged so,
/// are skipped.
fn selected(live: bool) -> impl Fn(&Feature, Option<&Rule>, &Scenario) -> bool {
    move |feature: &Feature, _: Option<&Rule>, scenario: &Scenario| {
        let mock_only = feature
            .tags
            .iter()
            .chain(scenario.tags.iter())
            .any(|tag| tag == MOCK_ONLY_TAG);
        !(live && mock_only)
    }
}

async fn run_basic(features: PathBuf, live: bool) -> bool {
    let writer = ApiWorld::cucumber()
        .max_concurrent_scenarios(1)
        .before(before_scenario)
        .after(after_scenario)
        .filter_run(features, selected(live))
        .await;
    !writer.execution_has_failed()
}

async fn run_junit(features: PathBuf, live: bool, report: File) -> bool {
    let writer = ApiWorld::cucumber()
        .max_concurrent_scenarios(1)
        .before(before_scenario)
        .after(after_scenario)
        .with_writer(
            writer::Basic::stdout()
                .summarized()
                .tee::<ApiWorld, _>(writer::JUnit::for_tee(report, 0))
                .normalized(),
        )
        .filter_run(features, selected(live))
        .await;
    !writer.execution_has_failed()
}

async fn run_json(features: PathBuf, live: bool, report: File) -> bool {
    let writer = ApiWorld::cucumber()
        .max_concurrent_scenarios(1)
        .before(before_scenario)
        .after(after_scenario)
        .with_writer(
            writer::Basic::stdout()
                .summarized()
                .tee::<ApiWorld, _>(writer::Json::for_tee(report))
                .normalized(),
        )
        .filter_run(features, selected(live))
        .await;
    !writer.execution_has_failed()
}
