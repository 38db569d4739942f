// src/core/scanner/http_prober.rs

use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use tracing::{debug, info, warn};
use url::Url;

use crate::core::error::{ProbeError, ReconError};
use crate::core::models::{HeaderSet, ProbeResult};

/// Bodies are cut off past this size; fingerprints only need the page head.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Per-request options for a probe.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Hard bound on the whole exchange, body included. On expiry the
    /// connection is dropped.
    pub timeout: Duration,
    /// Merged over the default headers; these win on collision.
    pub headers: HeaderSet,
    /// Body bytes kept; the rest of the response is not read.
    pub max_body_bytes: usize,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            headers: HeaderSet::new(),
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

/// Something that can issue a single HTTP(S) GET and capture the response.
pub trait HttpProbe {
    fn probe(&self, url: &str, options: &ProbeOptions) -> impl Future<Output = Result<ProbeResult, ProbeError>> + Send;
}

/// `HttpProbe` backed by a shared `reqwest::Client`.
///
/// Redirects are never followed; a 3xx comes back as-is with its `Location`
/// header. Proxies from the environment are ignored so probes hit the target
/// directly.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(user_agent: &str) -> Result<Self, ReconError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(Policy::none())
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }
}

impl HttpProbe for HttpProber {
    async fn probe(&self, url: &str, options: &ProbeOptions) -> Result<ProbeResult, ProbeError> {
        let parsed = Url::parse(url).map_err(|e| ProbeError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProbeError::InvalidUrl(format!("{url}: unsupported scheme")));
        }

        let headers = to_header_map(&options.headers)?;
        info!(url = %parsed, timeout_ms = millis(options.timeout), "Sending probe.");

        let response = self
            .client
            .get(parsed.clone())
            .headers(headers)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| classify(&e, options.timeout))?;

        let status = response.status().as_u16();
        let mut captured = HeaderSet::new();
        for (name, value) in response.headers() {
            match value.to_str() {
                Ok(s) => captured.append(name.as_str(), s),
                Err(_) => {
                    warn!(header_name = %name, "Header contained invalid UTF-8.");
                    captured.append(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
                }
            }
        }

        let body = read_body(response, options).await?;
        debug!(url = %parsed, status, bytes = body.len(), "Probe finished.");

        Ok(ProbeResult {
            status: Some(status),
            headers: captured,
            body,
            url: url.to_string(),
        })
    }
}

/// Reads at most `options.max_body_bytes` of the body, decoding lossily.
///
/// Dropping the response past the cap closes the connection instead of
/// draining it.
async fn read_body(mut response: reqwest::Response, options: &ProbeOptions) -> Result<String, ProbeError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| classify(&e, options.timeout))? {
        let room = options.max_body_bytes - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            if chunk.len() > room {
                debug!(limit = options.max_body_bytes, "Response body truncated.");
            }
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn to_header_map(headers: &HeaderSet) -> Result<HeaderMap, ProbeError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ProbeError::Protocol(format!("invalid header name '{name}': {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ProbeError::Protocol(format!("invalid value for header '{name}': {e}")))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Sorts a reqwest failure into timeout, network or protocol error.
///
/// Anything with an I/O error underneath is a network failure; what remains
/// (malformed status line, bad framing, undecodable body) is a protocol error.
fn classify(error: &reqwest::Error, timeout: Duration) -> ProbeError {
    if error.is_timeout() {
        return ProbeError::Timeout(millis(timeout));
    }
    if error.is_connect() {
        return ProbeError::Network(describe(error));
    }

    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return ProbeError::Timeout(millis(timeout));
            }
            return ProbeError::Network(describe(error));
        }
        source = cause.source();
    }
    ProbeError::Protocol(describe(error))
}

// reqwest's Display hides the cause; append the chain so logs say what happened.
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
