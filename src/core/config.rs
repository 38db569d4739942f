// src/core/config.rs

use std::time::Duration;
use tracing::{debug, warn};

use crate::core::knowledge_base::{COMMON_SUBDOMAINS, DEFAULT_USER_AGENT, SECURITY_HEADERS};
use crate::core::models::{HeaderSet, RecordType};
use crate::core::scanner::fingerprint_scanner::SignatureTable;
use crate::logging::PROJECT_NAME;

/// Tunables and tables for a reconnaissance run.
///
/// `Default` gives the stock behaviour: 100 ms between record-type queries,
/// 50 ms between subdomain candidates, a 10 s probe timeout and the built-in
/// header, signature and subdomain tables.
#[derive(Debug, Clone)]
pub struct ReconConfig {
    /// Minimum pause between successive record-type queries for one name.
    pub dns_query_delay: Duration,
    /// Minimum pause between successive subdomain candidates.
    pub subdomain_delay: Duration,
    /// Hard bound on a single HTTP(S) probe.
    pub probe_timeout: Duration,
    /// Bound on a single DNS query.
    pub dns_timeout: Duration,
    pub user_agent: String,
    /// Sent with every probe; overrides the user agent on collision.
    pub extra_headers: HeaderSet,
    pub record_types: Vec<RecordType>,
    pub security_headers: Vec<String>,
    pub signatures: SignatureTable,
    pub default_subdomains: Vec<String>,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            dns_query_delay: Duration::from_millis(100),
            subdomain_delay: Duration::from_millis(50),
            probe_timeout: Duration::from_millis(10_000),
            dns_timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_headers: HeaderSet::new(),
            record_types: RecordType::all(),
            security_headers: SECURITY_HEADERS.iter().map(|h| h.to_string()).collect(),
            signatures: SignatureTable::builtin(),
            default_subdomains: COMMON_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ReconConfig {
    /// The default configuration with overrides read from the process environment.
    ///
    /// Recognised variables (prefix is the crate name, uppercased):
    /// `*_DNS_DELAY_MS`, `*_SUBDOMAIN_DELAY_MS`, `*_PROBE_TIMEOUT_MS`,
    /// `*_DNS_TIMEOUT_MS` and `*_USER_AGENT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Applies overrides from an arbitrary key lookup. Unparseable values are
    /// logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |suffix: &str| format!("{}_{}", PROJECT_NAME.as_str(), suffix);

        let millis = |suffix: &str| -> Option<Duration> {
            let name = key(suffix);
            let raw = lookup(&name)?;
            match raw.trim().parse::<u64>() {
                Ok(ms) => {
                    debug!(variable = %name, ms, "Applying duration override.");
                    Some(Duration::from_millis(ms))
                }
                Err(e) => {
                    warn!(variable = %name, value = %raw, error = %e, "Ignoring invalid duration override.");
                    None
                }
            }
        };

        if let Some(d) = millis("DNS_DELAY_MS") {
            self.dns_query_delay = d;
        }
        if let Some(d) = millis("SUBDOMAIN_DELAY_MS") {
            self.subdomain_delay = d;
        }
        if let Some(d) = millis("PROBE_TIMEOUT_MS") {
            self.probe_timeout = d;
        }
        if let Some(d) = millis("DNS_TIMEOUT_MS") {
            self.dns_timeout = d;
        }
        if let Some(agent) = lookup(&key("USER_AGENT")).filter(|a| !a.trim().is_empty()) {
            self.user_agent = agent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_rate_limits() {
        let config = ReconConfig::default();
        assert_eq!(config.dns_query_delay, Duration::from_millis(100));
        assert_eq!(config.subdomain_delay, Duration::from_millis(50));
        assert_eq!(config.probe_timeout, Duration::from_secs(10));
        assert_eq!(config.record_types.len(), 6);
        assert_eq!(config.security_headers.len(), 6);
    }

    #[test]
    fn overrides_apply_and_bad_values_are_ignored() {
        let vars: HashMap<String, String> = [
            ("VANGUARD_RECON_DNS_DELAY_MS", "5"),
            ("VANGUARD_RECON_SUBDOMAIN_DELAY_MS", "not-a-number"),
            ("VANGUARD_RECON_USER_AGENT", "custom-agent/1.0"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let mut config = ReconConfig::default();
        config.apply_overrides(|key| vars.get(key).cloned());

        assert_eq!(config.dns_query_delay, Duration::from_millis(5));
        assert_eq!(config.subdomain_delay, Duration::from_millis(50));
        assert_eq!(config.user_agent, "custom-agent/1.0");
    }
}
