//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};

/// Environment variable pointing at an explicit config file.
pub(crate) const CONFIG_PATH_ENV: &str = "BIBCHEX_CONFIG";

/// `key = value` file configuration for bibchex defaults.
#[derive(Debug, Clone, Default)]
pub(crate) struct FileConfig {
    pub(crate) outfile: Option<PathBuf>,
    pub(crate) missing_file: Option<PathBuf>,
    /// Resolve entries through NASA/ADS by default.
    pub(crate) fetch: Option<bool>,
    /// Use the brace-depth entry scanner by default.
    pub(crate) brace_scan: Option<bool>,
    pub(crate) query_delay_ms: Option<u64>,
    pub(crate) api_url: Option<String>,
    pub(crate) verbosity: Option<VerbositySetting>,
    pub(crate) connect_timeout_secs: Option<u64>,
    pub(crate) read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(delay) = self.query_delay_ms
            && delay > 60_000
        {
            bail!("Invalid config value for `query_delay_ms`: {delay}. Expected range: 0..=60000");
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

/// Resolves the config path.
///
/// Priority:
/// 1. `$BIBCHEX_CONFIG`
/// 2. `$XDG_CONFIG_HOME/bibchex/config.toml`
/// 3. `$HOME/.config/bibchex/config.toml`
pub(crate) fn resolve_config_path() -> Option<PathBuf> {
    if let Some(explicit) = env_var_non_empty_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("bibchex")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("bibchex")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the resolved path if a file is there.
pub(crate) fn load_file_config() -> Result<Option<FileConfig>> {
    let Some(path) = resolve_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    read_file_config(&path).map(Some)
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = without_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };
        let entry = ConfigValue {
            key: raw_key.trim(),
            raw: raw_value.trim(),
            line_no,
        };

        match entry.key {
            "outfile" => cfg.outfile = Some(entry.quoted()?.into()),
            "missing_file" => cfg.missing_file = Some(entry.quoted()?.into()),
            "fetch" => cfg.fetch = Some(entry.flag()?),
            "brace_scan" => cfg.brace_scan = Some(entry.flag()?),
            "query_delay_ms" => cfg.query_delay_ms = Some(entry.count()?),
            "api_url" => cfg.api_url = Some(entry.quoted()?),
            "verbosity" => {
                let label = entry.quoted()?;
                let setting = label
                    .parse::<VerbositySetting>()
                    .map_err(|err| entry.invalid(err))?;
                cfg.verbosity = Some(setting);
            }
            "connect_timeout_secs" => cfg.connect_timeout_secs = Some(entry.count()?),
            "read_timeout_secs" => cfg.read_timeout_secs = Some(entry.count()?),
            unknown => bail!("Unknown configuration key: '{unknown}' on line {line_no}"),
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Cuts a trailing `# comment`, leaving `#` inside quoted values alone.
fn without_comment(line: &str) -> &str {
    let mut quoted = false;
    line.char_indices()
        .find_map(|(index, ch)| {
            if ch == '"' {
                quoted = !quoted;
            }
            (ch == '#' && !quoted).then_some(index)
        })
        .map_or(line, |index| &line[..index])
}

/// The right-hand side of one `key = value` line.
struct ConfigValue<'a> {
    key: &'a str,
    raw: &'a str,
    line_no: usize,
}

impl ConfigValue<'_> {
    fn invalid(&self, reason: impl std::fmt::Display) -> anyhow::Error {
        anyhow!(
            "Invalid `{}` value on line {}: {reason}",
            self.key,
            self.line_no
        )
    }

    /// Paths, URLs and labels are written as `"..."`.
    fn quoted(&self) -> Result<String> {
        self.raw
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .map(str::to_string)
            .ok_or_else(|| self.invalid("expected a double-quoted string"))
    }

    fn flag(&self) -> Result<bool> {
        self.raw
            .parse()
            .map_err(|_| self.invalid("expected `true` or `false`"))
    }

    /// Delays and timeouts; all are non-negative.
    fn count(&self) -> Result<u64> {
        if self.raw.starts_with('-') {
            return Err(self.invalid("expected a non-negative integer"));
        }
        self.raw.parse::<u64>().map_err(|err| self.invalid(err))
    }
}

impl FromStr for VerbositySetting {
    type Err = &'static str;

    fn from_str(label: &str) -> std::result::Result<Self, Self::Err> {
        match label {
            "default" => Ok(Self::Default),
            "verbose" => Ok(Self::Verbose),
            "quiet" => Ok(Self::Quiet),
            "debug" => Ok(Self::Debug),
            _ => Err("expected one of: default, verbose, quiet, debug"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
fetch = true
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.fetch, Some(true));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.outfile.is_none());
    }

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
outfile = "paper.bib"
missing_file = "paper-missing.bib"
fetch = false
brace_scan = true
query_delay_ms = 500
api_url = "http://127.0.0.1:8080/v1"
verbosity = "debug"
connect_timeout_secs = 5
read_timeout_secs = 60
"#,
        )
        .expect("full config should parse");
        assert_eq!(cfg.outfile, Some(PathBuf::from("paper.bib")));
        assert_eq!(cfg.missing_file, Some(PathBuf::from("paper-missing.bib")));
        assert_eq!(cfg.fetch, Some(false));
        assert_eq!(cfg.brace_scan, Some(true));
        assert_eq!(cfg.query_delay_ms, Some(500));
        assert_eq!(cfg.api_url.as_deref(), Some("http://127.0.0.1:8080/v1"));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Debug));
        assert_eq!(cfg.connect_timeout_secs, Some(5));
        assert_eq!(cfg.read_timeout_secs, Some(60));
    }

    #[test]
    fn test_parse_config_rejects_invalid_query_delay() {
        let err = parse_config_str("query_delay_ms = 60001").expect_err("out of range");
        assert!(err.to_string().contains("query_delay_ms"));
    }

    #[test]
    fn test_parse_config_rejects_negative_delay() {
        let err = parse_config_str("query_delay_ms = -1").expect_err("negative");
        assert!(err.to_string().contains("query_delay_ms"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_timeout_value() {
        let err = parse_config_str("read_timeout_secs = 0").expect_err("invalid timeout expected");
        assert!(err.to_string().contains("read_timeout_secs"));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r#"
query_delay_ms = 250 # be gentle
outfile = "out#1.bib" # hash inside quotes is kept
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.query_delay_ms, Some(250));
        assert_eq!(cfg.outfile, Some(PathBuf::from("out#1.bib")));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_path() {
        let err = parse_config_str("outfile = out.bib").expect_err("quotes required");
        assert!(err.to_string().contains("outfile"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_boolean() {
        let err = parse_config_str("fetch = yes").expect_err("invalid boolean expected");
        assert!(err.to_string().contains("fetch"));
    }

    #[test]
    fn test_parse_config_rejects_bad_syntax() {
        let err = parse_config_str("fetch true").expect_err("missing equals");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("unknown_key"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_verbosity_label() {
        let err = parse_config_str("verbosity = \"loud\"").expect_err("unknown label");
        let message = err.to_string();
        assert!(message.contains("verbosity"));
        assert!(message.contains("line 1"));
    }

    #[test]
    fn test_without_comment_respects_quotes() {
        assert_eq!(without_comment("fetch = true # note"), "fetch = true ");
        assert_eq!(without_comment(r#"outfile = "a#b.bib""#), r#"outfile = "a#b.bib""#);
        assert_eq!(without_comment("# whole line"), "");
    }

    #[test]
    fn test_read_file_config_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "brace_scan = true\n").expect("write config");
        let cfg = read_file_config(&path).expect("config should load");
        assert_eq!(cfg.brace_scan, Some(true));
    }
}
