// src/core/scanner/mod.rs

// This file acts as the public interface for the `scanner` module.
// It declares the individual stage modules and sequences them into a run.
pub mod dns_scanner;
pub mod fingerprint_scanner;
pub mod headers_scanner;
pub mod http_prober;
pub mod subdomain_scanner;

use tracing::{info, warn};

use crate::core::config::ReconConfig;
use crate::core::error::{LookupError, ProbeError, ReconError};
use crate::core::models::{
    DnsRecordSet, HttpResults, ProbeResult, ScanOptions, ScanResult, ScanTarget,
    SecurityHeaderReport, StageOutcome, SubdomainHit, TechnologySet,
};
use self::dns_scanner::{query_records, DnsLookup, HickoryLookup};
use self::fingerprint_scanner::detect_technologies;
use self::headers_scanner::analyze_headers;
use self::http_prober::{HttpProbe, HttpProber, ProbeOptions};
use self::subdomain_scanner::sweep_subdomains;

/// The reconnaissance engine: a configuration plus the DNS and HTTP backends.
///
/// A `Recon` holds no per-scan state, so one instance can run any number of
/// scans; each call to [`Recon::scan`] builds and returns its own `ScanResult`.
pub struct Recon<R, P> {
    config: ReconConfig,
    resolver: R,
    prober: P,
}

impl Recon<HickoryLookup, HttpProber> {
    /// Builds an engine backed by hickory and reqwest.
    pub fn new(config: ReconConfig) -> Result<Self, ReconError> {
        let resolver = HickoryLookup::new(config.dns_timeout);
        let prober = HttpProber::new(&config.user_agent)?;
        Ok(Self::with_parts(config, resolver, prober))
    }
}

impl<R: DnsLookup, P: HttpProbe> Recon<R, P> {
    pub fn with_parts(config: ReconConfig, resolver: R, prober: P) -> Self {
        Self { config, resolver, prober }
    }

    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Runs one reconnaissance pass against `domain`.
    ///
    /// Stages run in a fixed order (DNS, HTTP, subdomains) and each one
    /// fails soft: its outcome is recorded in the result and the next stage
    /// still runs. The only error returned is an invalid target, detected
    /// before any network activity.
    ///
    /// # Arguments
    /// * `domain` - The domain (or URL) to scan.
    /// * `options` - Whether to sweep subdomains, and with which candidates.
    pub async fn scan(&self, domain: &str, options: &ScanOptions) -> Result<ScanResult, ReconError> {
        let target = ScanTarget::parse(domain)?;
        info!(target = %target, subdomains = options.enumerate_subdomains, "Starting reconnaissance.");

        let mut result = ScanResult::new(target);
        let name = result.domain.as_str().to_string();

        result.dns = self.run_dns_stage(&name).await;

        result.http = self.run_http_stage(&name).await;
        let (security, technologies) = self.analyze_response(result.http.primary());
        result.security = security;
        result.technologies = technologies;

        result.subdomains = self.run_subdomain_stage(&name, options).await;

        info!(
            target = %result.domain,
            dns = result.dns.is_success(),
            http = !result.http.is_empty(),
            technologies = result.technologies.success().map_or(0, TechnologySet::len),
            subdomains = result.subdomains.success().map_or(0, Vec::len),
            "Reconnaissance finished."
        );
        Ok(result)
    }

    async fn run_dns_stage(&self, name: &str) -> StageOutcome<DnsRecordSet> {
        info!("Performing DNS analysis.");
        let results = query_records(
            &self.resolver,
            name,
            &self.config.record_types,
            self.config.dns_query_delay,
        )
        .await;

        // Every type failing on timeouts or dead servers means the resolver
        // itself is unusable, not that the name lacks records.
        let resolver_down = !results.is_empty()
            && results
                .iter()
                .all(|(_, result)| result.as_ref().is_err_and(LookupError::is_transport));
        if resolver_down {
            warn!(target = %name, "DNS analysis failed: resolver unreachable.");
            return StageOutcome::Failed("resolver unreachable".to_string());
        }

        info!("DNS analysis completed.");
        StageOutcome::Success(results.into_iter().collect())
    }

    async fn run_http_stage(&self, name: &str) -> HttpResults {
        info!("Performing HTTP analysis.");
        let options = ProbeOptions {
            timeout: self.config.probe_timeout,
            headers: self.config.extra_headers.clone(),
            ..ProbeOptions::default()
        };
        let http_url = format!("http://{name}");
        let https_url = format!("https://{name}");

        let (http, https) = tokio::join!(
            self.prober.probe(&http_url, &options),
            self.prober.probe(&https_url, &options)
        );

        HttpResults {
            http: probe_outcome(&http_url, http),
            https: probe_outcome(&https_url, https),
        }
    }

    fn analyze_response(
        &self,
        response: Option<&ProbeResult>,
    ) -> (StageOutcome<SecurityHeaderReport>, StageOutcome<TechnologySet>) {
        let Some(response) = response else {
            warn!("No HTTP response available, skipping header analysis and fingerprinting.");
            return (StageOutcome::Skipped, StageOutcome::Skipped);
        };

        info!(url = %response.url, "Analyzing response.");
        let security = analyze_headers(&self.config.security_headers, &response.headers);
        let technologies = detect_technologies(&self.config.signatures, &response.headers, &response.body);
        (StageOutcome::Success(security), StageOutcome::Success(technologies))
    }

    async fn run_subdomain_stage(&self, name: &str, options: &ScanOptions) -> StageOutcome<Vec<SubdomainHit>> {
        if !options.enumerate_subdomains {
            return StageOutcome::Skipped;
        }

        info!("Enumerating subdomains.");
        let candidates = options.wordlist.as_deref().unwrap_or(&self.config.default_subdomains);
        let hits = sweep_subdomains(&self.resolver, name, candidates, self.config.subdomain_delay).await;
        info!(found = hits.len(), "Subdomain enumeration completed.");
        StageOutcome::Success(hits)
    }
}

fn probe_outcome(url: &str, result: Result<ProbeResult, ProbeError>) -> StageOutcome<ProbeResult> {
    match result {
        Ok(response) => {
            info!(url, status = ?response.status, "Probe succeeded.");
            StageOutcome::Success(response)
        }
        Err(e) => {
            warn!(url, error = %e, "Probe failed.");
            StageOutcome::Failed(e.to_string())
        }
    }
}

/// Runs a full scan with the default hickory/reqwest backends.
///
/// Configuration is read from the environment (see [`ReconConfig::from_env`]).
pub async fn run_full_scan(domain: &str, options: &ScanOptions) -> Result<ScanResult, ReconError> {
    Recon::new(ReconConfig::from_env())?.scan(domain, options).await
}
