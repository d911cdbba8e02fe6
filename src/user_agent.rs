//! Shared User-Agent string for NASA/ADS requests.

/// User-Agent for API requests (identifies the tool and its version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("bibchex/{version} (bibliography-reconciliation-tool)")
}
