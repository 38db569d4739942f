use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

use vanguard_recon::{
    DnsLookup, HeaderPresence, HeaderSet, HttpProbe, LookupError, ProbeError, ProbeOptions,
    ProbeResult, Recon, ReconConfig, ReconError, RecordOutcome, RecordType, ScanOptions,
    StageOutcome,
};

#[derive(Default)]
struct FakeResolver {
    records: HashMap<RecordType, Result<Vec<String>, LookupError>>,
    addresses: HashMap<String, IpAddr>,
    all_records_fail_with: Option<LookupError>,
    queries: Mutex<Vec<String>>,
}

impl DnsLookup for FakeResolver {
    async fn lookup_records(&self, name: &str, record_type: RecordType) -> Result<Vec<String>, LookupError> {
        self.queries.lock().unwrap().push(format!("{record_type} {name}"));
        if let Some(error) = &self.all_records_fail_with {
            return Err(error.clone());
        }
        self.records
            .get(&record_type)
            .cloned()
            .unwrap_or(Err(LookupError::NoRecords))
    }

    async fn lookup_addresses(&self, name: &str) -> Result<Vec<IpAddr>, LookupError> {
        self.queries.lock().unwrap().push(format!("ADDR {name}"));
        self.addresses
            .get(name)
            .map(|ip| vec![*ip])
            .ok_or(LookupError::NxDomain)
    }
}

#[derive(Default)]
struct FakeProber {
    responses: HashMap<String, Result<ProbeResult, ProbeError>>,
    requested: Mutex<Vec<(String, ProbeOptions)>>,
}

impl FakeProber {
    fn respond(mut self, url: &str, headers: &[(&str, &str)], body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(ProbeResult {
                status: Some(200),
                headers: headers.iter().copied().collect(),
                body: body.to_string(),
                url: url.to_string(),
            }),
        );
        self
    }
}

impl HttpProbe for FakeProber {
    async fn probe(&self, url: &str, options: &ProbeOptions) -> Result<ProbeResult, ProbeError> {
        self.requested
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(ProbeError::Network("connection refused".to_string())))
    }
}

fn fast_config() -> ReconConfig {
    ReconConfig {
        dns_query_delay: Duration::ZERO,
        subdomain_delay: Duration::ZERO,
        ..ReconConfig::default()
    }
}

fn resolver_with_a_record() -> FakeResolver {
    let mut resolver = FakeResolver::default();
    resolver
        .records
        .insert(RecordType::A, Ok(vec!["93.184.216.34".to_string()]));
    resolver
}

#[tokio::test]
async fn invalid_target_is_rejected_before_any_io() {
    let recon = Recon::with_parts(fast_config(), FakeResolver::default(), FakeProber::default());

    let err = recon.scan("   ", &ScanOptions::default()).await.unwrap_err();

    assert!(matches!(err, ReconError::InvalidTarget(_)));
    assert!(recon.resolver().queries.lock().unwrap().is_empty());
    assert!(recon.prober().requested.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_web_server_still_yields_a_result() {
    let recon = Recon::with_parts(fast_config(), resolver_with_a_record(), FakeProber::default());

    let result = recon.scan("example.com", &ScanOptions::default()).await.unwrap();

    assert!(result.http.is_empty());
    assert!(matches!(result.http.http, StageOutcome::Failed(_)));
    assert!(matches!(result.http.https, StageOutcome::Failed(_)));
    assert_eq!(result.security, StageOutcome::Skipped);
    assert_eq!(result.technologies, StageOutcome::Skipped);
    assert_eq!(result.subdomains, StageOutcome::Skipped);

    let dns = result.dns.success().expect("dns stage should succeed");
    assert_eq!(dns.len(), 6);
    assert_eq!(dns.records(RecordType::A), Some(&["93.184.216.34".to_string()][..]));
    assert!(matches!(dns.get(RecordType::MX), Some(RecordOutcome::Error(_))));
}

#[tokio::test]
async fn both_schemes_are_probed_with_configured_options() {
    let mut config = fast_config();
    config.probe_timeout = Duration::from_millis(1234);
    config.extra_headers.insert("X-Scan-Id", "42");
    let recon = Recon::with_parts(config, resolver_with_a_record(), FakeProber::default());

    recon.scan("Example.com", &ScanOptions::default()).await.unwrap();

    let requested = recon.prober().requested.lock().unwrap().clone();
    let mut urls: Vec<_> = requested.iter().map(|(url, _)| url.clone()).collect();
    urls.sort();
    assert_eq!(urls, vec!["http://example.com", "https://example.com"]);
    for (_, options) in &requested {
        assert_eq!(options.timeout, Duration::from_millis(1234));
        assert_eq!(options.headers.get("x-scan-id"), Some("42"));
    }
}

#[tokio::test]
async fn https_response_is_preferred_for_analysis() {
    let prober = FakeProber::default()
        .respond(
            "http://example.com",
            &[("Server", "Apache/2.4.41")],
            "",
        )
        .respond(
            "https://example.com",
            &[("Server", "nginx/1.18.0"), ("Strict-Transport-Security", "max-age=63072000")],
            "",
        );
    let recon = Recon::with_parts(fast_config(), resolver_with_a_record(), prober);

    let result = recon.scan("example.com", &ScanOptions::default()).await.unwrap();

    let technologies = result.technologies.success().unwrap();
    assert!(technologies.contains("Nginx"));
    assert!(!technologies.contains("Apache"));

    let security = result.security.success().unwrap();
    assert_eq!(
        security.get("strict-transport-security"),
        Some(&HeaderPresence::Present("max-age=63072000".to_string()))
    );
    assert_eq!(security.get("x-frame-options"), Some(&HeaderPresence::NotPresent));
}

#[tokio::test]
async fn plain_http_is_used_when_https_fails() {
    let prober = FakeProber::default().respond(
        "http://example.com",
        &[("X-Powered-By", "PHP/7.4.3")],
        "<script src=\"/wp-includes/js/jquery/jquery.js\"></script>",
    );
    let recon = Recon::with_parts(fast_config(), resolver_with_a_record(), prober);

    let result = recon.scan("example.com", &ScanOptions::default()).await.unwrap();

    assert!(result.http.http.is_success());
    assert!(matches!(result.http.https, StageOutcome::Failed(_)));
    let technologies = result.technologies.success().unwrap();
    for label in ["PHP", "WordPress", "jQuery"] {
        assert!(technologies.contains(label), "missing {label}");
    }
    assert_eq!(result.security.success().unwrap().len(), 6);
}

#[tokio::test]
async fn dead_resolver_fails_only_the_dns_stage() {
    let mut resolver = FakeResolver {
        all_records_fail_with: Some(LookupError::Timeout),
        ..FakeResolver::default()
    };
    resolver
        .addresses
        .insert("www.example.com".to_string(), "93.184.216.34".parse().unwrap());
    let prober = FakeProber::default().respond("https://example.com", &[], "");
    let recon = Recon::with_parts(fast_config(), resolver, prober);
    let options = ScanOptions {
        enumerate_subdomains: true,
        wordlist: Some(vec!["www".to_string()]),
    };

    let result = recon.scan("example.com", &options).await.unwrap();

    assert!(matches!(result.dns, StageOutcome::Failed(_)));
    assert!(result.http.https.is_success());
    assert_eq!(result.subdomains.success().map(Vec::len), Some(1));
}

#[tokio::test]
async fn nxdomain_on_every_type_is_not_a_stage_failure() {
    let resolver = FakeResolver {
        all_records_fail_with: Some(LookupError::NxDomain),
        ..FakeResolver::default()
    };
    let recon = Recon::with_parts(fast_config(), resolver, FakeProber::default());

    let result = recon.scan("example.com", &ScanOptions::default()).await.unwrap();

    let dns = result.dns.success().expect("dns stage should succeed");
    assert!(dns.iter().all(|(_, outcome)| matches!(outcome, RecordOutcome::Error(_))));
}

#[tokio::test]
async fn subdomain_sweep_uses_caller_wordlist_in_order() {
    let mut resolver = resolver_with_a_record();
    resolver
        .addresses
        .insert("www.example.com".to_string(), "93.184.216.34".parse().unwrap());
    resolver
        .addresses
        .insert("api.example.com".to_string(), "93.184.216.35".parse().unwrap());
    let recon = Recon::with_parts(fast_config(), resolver, FakeProber::default());
    let options = ScanOptions {
        enumerate_subdomains: true,
        wordlist: Some(vec![
            "api".to_string(),
            "doesnotexist123".to_string(),
            "www".to_string(),
        ]),
    };

    let result = recon.scan("example.com", &options).await.unwrap();

    let hits = result.subdomains.success().unwrap();
    let names: Vec<_> = hits.iter().map(|h| h.subdomain.as_str()).collect();
    assert_eq!(names, vec!["api.example.com", "www.example.com"]);
    assert_eq!(hits[0].ip, "93.184.216.35".parse::<IpAddr>().unwrap());
}

#[tokio::test(start_paused = true)]
async fn default_candidate_list_is_swept_with_rate_limit() {
    let config = ReconConfig {
        dns_query_delay: Duration::ZERO,
        ..ReconConfig::default()
    };
    let candidate_count = config.default_subdomains.len();
    let delay = config.subdomain_delay;
    let recon = Recon::with_parts(config, resolver_with_a_record(), FakeProber::default());
    let options = ScanOptions {
        enumerate_subdomains: true,
        wordlist: None,
    };

    let started = tokio::time::Instant::now();
    let result = recon.scan("example.com", &options).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(result.subdomains, StageOutcome::Success(Vec::new()));
    let address_queries = recon
        .resolver()
        .queries
        .lock()
        .unwrap()
        .iter()
        .filter(|q| q.starts_with("ADDR "))
        .count();
    assert_eq!(address_queries, candidate_count);
    assert!(elapsed >= delay * (candidate_count as u32 - 1));
}

#[tokio::test]
async fn result_serializes_with_stable_field_names() {
    let prober = FakeProber::default().respond("https://example.com", &[("Server", "cloudflare")], "");
    let recon = Recon::with_parts(fast_config(), resolver_with_a_record(), prober);

    let result = recon.scan("example.com", &ScanOptions::default()).await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["domain"], "example.com");
    assert!(json["timestamp"].is_string());
    assert_eq!(json["dns"]["status"], "success");
    assert_eq!(json["dns"]["data"]["A"]["records"][0], "93.184.216.34");
    assert_eq!(json["http"]["https"]["data"]["status"], 200);
    assert_eq!(json["http"]["http"]["status"], "failed");
    assert_eq!(json["security"]["data"]["x-frame-options"], "not_present");
    assert_eq!(json["technologies"]["data"][0], "Cloudflare");
    assert_eq!(json["subdomains"]["status"], "skipped");
}

#[test]
fn header_set_collects_from_pairs() {
    let headers: HeaderSet = [("Server", "nginx")].into_iter().collect();
    assert_eq!(headers.get("SERVER"), Some("nginx"));
}
