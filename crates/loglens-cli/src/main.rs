//! `loglens` - diagnose failures in build and test logs
//!
//! Exit status is 0 whenever the tool ran, whatever the log contained, and 1
//! on an operational failure (unreadable input, bad flag, write error).

mod cli;

use anyhow::{Context, Result};
use clap::ArgMatches;
use loglens_core::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let matches = cli::command().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so report text on stdout stays clean
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("report", args)) => report(args, ReportShape::Detailed),
        Some(("bug-report", args)) => report(args, ReportShape::BugReport),
        Some(("search", args)) => search(args),
        Some(("tail", args)) => tail(args),
        _ => unreachable!("subcommand_required is set"),
    }
}

/// Config file values, then flags on top
fn load_config(args: &ArgMatches) -> Result<AnalyzerConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };

    if let Some(label) = args.get_one::<String>("encoding") {
        config = config.with_encoding(label.as_str());
    }
    if let Some(&max) = args.get_one::<usize>("max-errors") {
        config = config.with_max_errors(max);
    }
    if let Some(&lines) = args.get_one::<usize>("context-after") {
        config = config.with_context_after(lines);
    }
    if let Some(&lines) = args.get_one::<usize>("context-before") {
        config = config.with_context_before(lines);
    }
    if let Some(&lines) = args.get_one::<usize>("tail") {
        config = config.with_tail_lines(lines);
    }
    Ok(config)
}

fn log_path(args: &ArgMatches) -> Result<&PathBuf> {
    args.get_one::<PathBuf>("log").context("missing LOG argument")
}

fn destination(args: &ArgMatches) -> Destination {
    Destination::parse(args.get_one::<String>("output").map_or("-", String::as_str))
}

fn report(args: &ArgMatches, shape: ReportShape) -> Result<()> {
    let analyzer = Analyzer::new(load_config(args)?)?;
    let log = log_path(args)?;
    let report = analyzer
        .analyze_path(log, shape)
        .with_context(|| format!("failed to analyse {}", log.display()))?;

    let options = if args.get_flag("no-timestamp") {
        RenderOptions::new()
    } else {
        RenderOptions::new().stamped_now()
    };
    let text = report.render(shape, &options);

    let destination = destination(args);
    destination.write(&text)?;
    if let Destination::File(path) = &destination {
        eprintln!(
            "{} error(s) shown of {} found; report written to {}",
            report.errors.len(),
            report.summary.total_matches,
            path.display()
        );
    }
    Ok(())
}

fn search(args: &ArgMatches) -> Result<()> {
    let mut config = load_config(args)?;
    if let Some(&lines) = args.get_one::<usize>("context") {
        config = config.with_search_context(lines);
    }
    if let Some(&max) = args.get_one::<usize>("max-matches") {
        config = config.with_max_matches(max);
    }
    let analyzer = Analyzer::new(config)?;

    let keyword = args
        .get_one::<String>("keyword")
        .context("missing KEYWORD argument")?;
    let query = if args.get_flag("regex") {
        Query::regex(keyword)?
    } else {
        Query::literal(keyword.as_str())?
    };

    let log = log_path(args)?;
    let result = analyzer
        .search_path(log, &query)
        .with_context(|| format!("failed to search {}", log.display()))?;
    destination(args).write(&result.to_string())?;
    Ok(())
}

fn tail(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let analyzer = Analyzer::new(config)?;
    let count = args
        .get_one::<usize>("lines")
        .copied()
        .unwrap_or(analyzer.config().tail_lines);

    let log = log_path(args)?;
    let excerpt = analyzer
        .tail_path(log, count)
        .with_context(|| format!("failed to read {}", log.display()))?;
    destination(args).write(&excerpt.to_string())?;
    tracing::debug!(lines = excerpt.lines.len(), "tail written");
    Ok(())
}
