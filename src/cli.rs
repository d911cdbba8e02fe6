//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use bibchex_core::resolver::DEFAULT_QUERY_DELAY;

pub(crate) const DEFAULT_OUTFILE: &str = "output.bib";
pub(crate) const DEFAULT_MISSING_FILE: &str = "missing.bib";

/// Reconcile LaTeX citations with a BibTeX file.
///
/// Finds the entries a document actually cites, reports citations with no
/// entry, and (with --fetch) rebuilds the cited entries from NASA/ADS.
#[derive(Parser, Debug)]
#[command(name = "bibchex")]
#[command(author, version, about)]
pub struct Args {
    /// LaTeX document to scan for citations
    pub document: PathBuf,

    /// BibTeX file holding the bibliography entries
    pub bibliography: PathBuf,

    /// Primary output file
    #[arg(short = 'o', long, default_value = DEFAULT_OUTFILE)]
    pub outfile: PathBuf,

    /// Output file for entries that could not be resolved in NASA/ADS
    #[arg(short = 'm', long, default_value = DEFAULT_MISSING_FILE)]
    pub missing_file: PathBuf,

    /// Do network requests to fetch entries from NASA/ADS (needs ADS_TOKEN)
    #[arg(long)]
    pub fetch: bool,

    /// End each entry at its matching closing brace instead of pairing
    /// entries with lone `}` lines in order
    #[arg(long)]
    pub brace_scan: bool,

    /// Pause after each NASA/ADS lookup in milliseconds (0 to disable, max 60000)
    #[arg(long, default_value_t = default_query_delay_ms(), value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub query_delay_ms: u64,

    /// NASA/ADS API root URL
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Increase output verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Set the logging level directly
    #[arg(long, value_enum, alias = "loglevel", conflicts_with_all = ["verbose", "quiet"])]
    pub log_level: Option<LogLevel>,
}

fn default_query_delay_ms() -> u64 {
    u64::try_from(DEFAULT_QUERY_DELAY.as_millis()).unwrap_or(200)
}

/// Log levels accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_positional_paths_and_defaults() {
        let args = Args::try_parse_from(["bibchex", "paper.tex", "refs.bib"]).unwrap();
        assert_eq!(args.document, PathBuf::from("paper.tex"));
        assert_eq!(args.bibliography, PathBuf::from("refs.bib"));
        assert_eq!(args.outfile, PathBuf::from("output.bib"));
        assert_eq!(args.missing_file, PathBuf::from("missing.bib"));
        assert!(!args.fetch);
        assert!(!args.brace_scan);
        assert_eq!(args.query_delay_ms, 200);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn test_cli_missing_positional_rejected() {
        let result = Args::try_parse_from(["bibchex", "paper.tex"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_output_flags() {
        let args = Args::try_parse_from([
            "bibchex", "a.tex", "a.bib", "-o", "new.bib", "-m", "lost.bib", "--fetch",
        ])
        .unwrap();
        assert_eq!(args.outfile, PathBuf::from("new.bib"));
        assert_eq!(args.missing_file, PathBuf::from("lost.bib"));
        assert!(args.fetch);

        let args = Args::try_parse_from([
            "bibchex",
            "a.tex",
            "a.bib",
            "--outfile",
            "x.bib",
            "--missing-file",
            "y.bib",
        ])
        .unwrap();
        assert_eq!(args.outfile, PathBuf::from("x.bib"));
        assert_eq!(args.missing_file, PathBuf::from("y.bib"));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["bibchex", "a.tex", "a.bib", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_verbose_and_quiet_conflict() {
        let err = Args::try_parse_from(["bibchex", "a.tex", "a.bib", "-v", "-q"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_log_level_and_alias() {
        let args =
            Args::try_parse_from(["bibchex", "a.tex", "a.bib", "--log-level", "debug"]).unwrap();
        assert_eq!(args.log_level, Some(LogLevel::Debug));

        let args =
            Args::try_parse_from(["bibchex", "a.tex", "a.bib", "--loglevel", "error"]).unwrap();
        assert_eq!(args.log_level.map(LogLevel::as_str), Some("error"));
    }

    #[test]
    fn test_cli_invalid_log_level_rejected() {
        let err = Args::try_parse_from(["bibchex", "a.tex", "a.bib", "--log-level", "loud"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_cli_query_delay_range() {
        let args =
            Args::try_parse_from(["bibchex", "a.tex", "a.bib", "--query-delay-ms", "0"]).unwrap();
        assert_eq!(args.query_delay_ms, 0);

        let err = Args::try_parse_from(["bibchex", "a.tex", "a.bib", "--query-delay-ms", "60001"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["bibchex", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["bibchex", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["bibchex", "a.tex", "a.bib", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
