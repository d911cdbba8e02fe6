use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use bibchex_core::ads::{AdsClient, AdsToken};
use bibchex_core::parser::{NodeSet, PairingStrategy, extract_citations, extract_entries};
use bibchex_core::report::{self, Summary};
use bibchex_core::resolver::{self, QueryThrottle, ResolutionPlan, ResolveError};
use bibchex_core::{Reconciliation, reconcile};
use tracing::{debug, info, warn};

use crate::ProcessExit;
use crate::app::{config, config_runtime, progress, terminal};
use crate::cli::Args;

pub(crate) async fn run_bibchex() -> Result<ProcessExit> {
    let (args, cli_sources) = config_runtime::parse_cli_with_sources();
    let file_config = config::load_file_config()?;
    let args = config_runtime::apply_config_defaults(args, &cli_sources, file_config.as_ref())?;
    let settings = config_runtime::resolve_client_settings(&args, file_config.as_ref());

    let default_level = config_runtime::resolve_default_log_level(&args);
    let force_cli_log_level = config_runtime::should_force_cli_log_level(&cli_sources);
    terminal::init_tracing(
        default_level,
        force_cli_log_level,
        terminal::is_no_color_requested(),
    );
    debug!(?args, "CLI arguments resolved");

    // The credential is checked before any file or network work.
    let token = if args.fetch {
        Some(AdsToken::from_env()?)
    } else {
        None
    };

    let document = read_input(&args.document, "LaTeX document")?;
    let bibliography = read_input(&args.bibliography, "BibTeX file")?;

    let strategy = if args.brace_scan {
        PairingStrategy::BraceDepth
    } else {
        PairingStrategy::Positional
    };
    let citations: NodeSet = extract_citations(&document).into_iter().collect();
    let entries: NodeSet = extract_entries(&bibliography, strategy)
        .into_iter()
        .collect();
    let reconciliation = reconcile(&citations, &entries);
    report_missing_citations(&reconciliation);

    let plan = resolver::plan(&reconciliation.needed, &bibliography);
    let summary = Summary::from_stages(&citations, &entries, &reconciliation, &plan);
    println!("{}", summary.parsing_table());

    match token {
        None => {
            let text = report::raw_needed_output(&reconciliation.needed, &bibliography);
            write_file(&args.outfile, &text)?;
        }
        Some(token) => {
            let client = AdsClient::new(token, &settings)?;
            fetch_and_write(&args, &client, &plan, &bibliography, summary).await?;
        }
    }

    info!("bibchex finished");
    Ok(ProcessExit::Success)
}

async fn fetch_and_write(
    args: &Args,
    client: &AdsClient,
    plan: &ResolutionPlan,
    bibliography: &str,
    summary: Summary,
) -> Result<()> {
    let throttle = QueryThrottle::new(Duration::from_millis(args.query_delay_ms));

    println!("Fetching from NASA/ADS");
    let visible = terminal::should_use_progress_bar(
        io::stderr().is_terminal(),
        args.quiet,
        terminal::is_dumb_terminal(),
    );
    let bar = progress::lookup_bar(visible, plan.pending_count());
    let outcome = resolver::execute(plan, bibliography, client, &throttle, |step| {
        progress::update(&bar, &step);
    })
    .await;
    bar.finish_and_clear();
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            let ResolveError::Export { unresolved, .. } = &err;
            write_file(&args.missing_file, &report::unresolved_output(unresolved))?;
            return Err(err.into());
        }
    };

    if !outcome.failures.is_empty() {
        println!("ERRORS:");
        for failure in &outcome.failures {
            println!("{failure}");
        }
    }
    debug!(codes = ?outcome.codes, "Exported bibcodes");

    let summary = summary.with_outcome(&outcome);
    println!("{}", summary.fetch_table());

    write_file(&args.outfile, &outcome.export)?;
    write_file(
        &args.missing_file,
        &report::unresolved_output(&outcome.unresolved),
    )?;
    Ok(())
}

fn read_input(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Cannot read {what} '{}'", path.display()))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    report::write_output(path, contents)
        .with_context(|| format!("Cannot write '{}'", path.display()))?;
    println!("{}", report::written_message(path));
    Ok(())
}

fn report_missing_citations(reconciliation: &Reconciliation) {
    for node in &reconciliation.missing {
        warn!(key = %node.key, "Citation has no BibTeX entry");
    }
}
