use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use speclens::analyzer::{AnalysisReport, TestAnalyzer};
use speclens::cli::{Cli, Commands};
use speclens::config::Config;
use speclens::coverage::{assertion_type_tally, selector_type_tally, QualityMetrics};
use speclens::error::SpeclensError;
use speclens::metadata::TestType;

/// JSON response structure for --json output mode
#[derive(Serialize, Deserialize)]
struct JsonResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl JsonResponse {
    fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }

    fn print(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;

    match cli.command {
        Some(Commands::Analyze { root, results_dir }) => {
            handle_analyze_command(root, results_dir, json_mode).await?;
        }
        Some(Commands::Results { results_dir }) => {
            handle_results_command(results_dir, json_mode).await?;
        }
        Some(Commands::Stats { results_dir }) => {
            handle_stats_command(results_dir, json_mode).await?;
        }
        Some(Commands::Completion { shell }) => {
            handle_completion_command(&shell);
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

async fn load_config(results_dir: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load()
        .await
        .context("Failed to load configuration")?;
    if let Some(dir) = results_dir {
        config.results_dir = dir;
    }
    Ok(config)
}

async fn handle_analyze_command(
    root: Option<PathBuf>,
    results_dir: Option<PathBuf>,
    json_mode: bool,
) -> Result<()> {
    let mut config = load_config(results_dir).await?;
    if let Some(root) = root {
        config.root_candidates = vec![root];
    }
    let analyzer = TestAnalyzer::new(&config);

    let spinner = if json_mode {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
        pb.set_message("Analyzing test files...");
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let outcome = analyzer.run().await;
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    match outcome {
        Ok(report) => {
            if json_mode {
                JsonResponse::success(serde_json::to_value(&report)?).print();
            } else {
                print_report_summary(&report);
            }
            Ok(())
        }
        Err(SpeclensError::NoTestFilesFound { root }) => {
            if json_mode {
                JsonResponse::error(format!("No test files found under: {}", root)).print();
            } else {
                println!(
                    "{} No test files found under {} - nothing to analyze",
                    "ℹ️".bright_blue(),
                    root.bright_yellow()
                );
            }
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn handle_results_command(results_dir: Option<PathBuf>, json_mode: bool) -> Result<()> {
    let config = load_config(results_dir).await?;
    let analyzer = TestAnalyzer::new(&config);

    match analyzer.load_last().await {
        Ok(report) => {
            if json_mode {
                JsonResponse::success(serde_json::to_value(&report)?).print();
            } else {
                print_report_summary(&report);
                println!();
                for record in &report.test_metadata {
                    println!(
                        "  {} {} [{}] complexity {}",
                        type_icon(record.test_type),
                        record.file.bright_green(),
                        record.test_type.to_string().bright_blue(),
                        record.complexity
                    );
                }
            }
            Ok(())
        }
        Err(SpeclensError::ResultsNotFound { path }) => {
            if json_mode {
                JsonResponse::error(format!("No analysis results found at: {}", path)).print();
            } else {
                println!(
                    "{} No analysis results yet - run {} first",
                    "ℹ️".bright_blue(),
                    "speclens analyze".bright_cyan()
                );
            }
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn handle_stats_command(results_dir: Option<PathBuf>, json_mode: bool) -> Result<()> {
    let config = load_config(results_dir).await?;
    let analyzer = TestAnalyzer::new(&config);

    let report = analyzer
        .load_last()
        .await
        .context("Failed to load the last analysis run")?;
    let metrics = QualityMetrics::compute(&report.test_metadata);
    let selectors = selector_type_tally(&report.test_metadata);
    let assertions = assertion_type_tally(&report.test_metadata);

    if json_mode {
        JsonResponse::success(serde_json::json!({
            "metrics": metrics,
            "selectorTypes": selectors,
            "assertionTypes": assertions,
        }))
        .print();
        return Ok(());
    }

    println!("{} Quality metrics", "📊".bright_cyan());
    println!("{}", "─".repeat(60).bright_black());
    println!("  Tests analyzed:     {}", metrics.tests_analyzed);
    println!("  Selectors:          {}", metrics.total_selectors);
    println!("  Assertions:         {}", metrics.total_assertions);
    println!("  Average complexity: {:.2}", metrics.average_complexity);
    println!("  With screenshots:   {}", metrics.with_screenshots);
    println!("  Degraded records:   {}", metrics.degraded);
    println!("  Unclassified:       {}", metrics.unclassified);

    if !selectors.is_empty() {
        println!("\n{} Selector types", "🎯".bright_cyan());
        for (kind, count) in &selectors {
            println!("  {:<14} {}", kind.bright_blue(), count);
        }
    }
    if !assertions.is_empty() {
        println!("\n{} Assertion types", "✅".bright_cyan());
        for (kind, count) in &assertions {
            println!("  {:<20} {}", kind.bright_blue(), count);
        }
    }

    Ok(())
}

fn print_report_summary(report: &AnalysisReport) {
    println!(
        "{} Analyzed {} test files",
        "🔍".bright_cyan(),
        report.tests_analyzed.to_string().bright_green()
    );
    println!("{}", "─".repeat(60).bright_black());
    for area in &report.coverage_matrix.areas {
        let count = report.coverage_matrix.coverage.get(area).copied().unwrap_or(0);
        println!("  {:<12} {}", area.bright_blue(), count);
    }

    let degraded: Vec<_> = report
        .test_metadata
        .iter()
        .filter(|r| r.error.is_some())
        .collect();
    if !degraded.is_empty() {
        println!(
            "{} {} file(s) could not be fully analyzed:",
            "⚠️".bright_yellow(),
            degraded.len()
        );
        for record in degraded {
            println!(
                "  {} {}",
                record.file.bright_yellow(),
                record.error.as_deref().unwrap_or("")
            );
        }
    }
}

fn type_icon(test_type: TestType) -> &'static str {
    match test_type {
        TestType::Ui => "🖥️",
        TestType::Funktional => "⚙️",
        TestType::Integration => "🔗",
        TestType::Unbekannt => "❓",
    }
}

fn handle_completion_command(shell: &clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::{generate, Generator};
    use std::io;

    fn print_completions<G: Generator>(gen: G, cmd: &mut clap::Command) {
        generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    }

    let mut cmd = Cli::command();
    print_completions(*shell, &mut cmd);
}
