use std::time::Duration;

use anyhow::{Result, bail};
use bibchex_core::ads::ClientSettings;
use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};

use crate::app::config::{FileConfig, VerbositySetting};
use crate::cli::Args;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) outfile: bool,
    pub(crate) missing_file: bool,
    pub(crate) fetch: bool,
    pub(crate) brace_scan: bool,
    pub(crate) query_delay_ms: bool,
    pub(crate) api_url: bool,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
    pub(crate) log_level: bool,
}

pub(crate) fn parse_cli_with_sources() -> (Args, CliValueSources) {
    let command = Args::command();
    let matches = command.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    let sources = collect_sources(&matches);
    (args, sources)
}

fn collect_sources(matches: &ArgMatches) -> CliValueSources {
    CliValueSources {
        outfile: is_commandline_value(matches, "outfile"),
        missing_file: is_commandline_value(matches, "missing_file"),
        fetch: is_commandline_value(matches, "fetch"),
        brace_scan: is_commandline_value(matches, "brace_scan"),
        query_delay_ms: is_commandline_value(matches, "query_delay_ms"),
        api_url: is_commandline_value(matches, "api_url"),
        verbose: is_commandline_value(matches, "verbose"),
        quiet: is_commandline_value(matches, "quiet"),
        log_level: is_commandline_value(matches, "log_level"),
    }
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Fills every value not given on the command line from the config file.
pub(crate) fn apply_config_defaults(
    mut args: Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Result<Args> {
    if let Some(file_config) = file_config {
        if !cli_sources.outfile
            && let Some(outfile) = &file_config.outfile
        {
            args.outfile = outfile.clone();
        }

        if !cli_sources.missing_file
            && let Some(missing_file) = &file_config.missing_file
        {
            args.missing_file = missing_file.clone();
        }

        if !cli_sources.fetch
            && let Some(fetch) = file_config.fetch
        {
            args.fetch = fetch;
        }

        if !cli_sources.brace_scan
            && let Some(brace_scan) = file_config.brace_scan
        {
            args.brace_scan = brace_scan;
        }

        if !cli_sources.query_delay_ms
            && let Some(delay) = file_config.query_delay_ms
        {
            args.query_delay_ms = delay;
        }

        if !cli_sources.api_url
            && args.api_url.is_none()
            && let Some(api_url) = &file_config.api_url
        {
            args.api_url = Some(api_url.clone());
        }

        if !should_force_cli_log_level(cli_sources)
            && let Some(verbosity) = file_config.verbosity
        {
            apply_config_verbosity(&mut args, verbosity);
        }
    }

    if args.query_delay_ms > 60_000 {
        bail!(
            "Invalid effective query_delay_ms value: {}. Expected range: 0..=60000",
            args.query_delay_ms
        );
    }

    Ok(args)
}

fn apply_config_verbosity(args: &mut Args, verbosity: VerbositySetting) {
    match verbosity {
        VerbositySetting::Default => {
            args.quiet = false;
            args.verbose = 0;
        }
        VerbositySetting::Verbose => {
            args.quiet = false;
            args.verbose = 1;
        }
        VerbositySetting::Quiet => {
            args.quiet = true;
            args.verbose = 0;
        }
        VerbositySetting::Debug => {
            args.quiet = false;
            args.verbose = 2;
        }
    }
}

/// HTTP settings for the NASA/ADS client.
pub(crate) fn resolve_client_settings(
    args: &Args,
    file_config: Option<&FileConfig>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();
    if let Some(api_url) = &args.api_url {
        settings = settings.with_api_url(api_url.clone());
    }
    let Some(file_config) = file_config else {
        return settings;
    };
    if let Some(secs) = file_config.connect_timeout_secs {
        settings.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file_config.read_timeout_secs {
        settings.read_timeout = Duration::from_secs(secs);
    }
    settings
}

pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if let Some(level) = args.log_level {
        return level.as_str();
    }
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

pub(crate) fn should_force_cli_log_level(cli_sources: &CliValueSources) -> bool {
    cli_sources.verbose || cli_sources.quiet || cli_sources.log_level
}
