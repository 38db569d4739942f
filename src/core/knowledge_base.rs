//! Static reference data used by the reconnaissance stages.
//!
//! Everything here is plain data. The stages never read these tables directly;
//! they receive them through `ReconConfig`, so tests and callers can swap in
//! their own tables.

/// The security-relevant response headers checked by the header analyzer,
/// in canonical lowercase form.
pub static SECURITY_HEADERS: &[&str] = &[
    "strict-transport-security",
    "content-security-policy",
    "x-frame-options",
    "x-content-type-options",
    "x-xss-protection",
    "referrer-policy",
];

/// Technology signatures as `(label, pattern)` pairs.
///
/// Patterns are regular expressions compiled case-insensitively and matched
/// against the `Server` header, the `X-Powered-By` header and the response body.
pub static TECHNOLOGY_SIGNATURES: &[(&str, &str)] = &[
    ("WordPress", r"wp-content|wp-includes|wordpress"),
    ("Joomla", r"joomla"),
    ("Drupal", r"drupal"),
    ("Apache", r"apache"),
    ("Nginx", r"nginx"),
    ("IIS", r"microsoft-iis"),
    ("PHP", r"php"),
    ("ASP.NET", r"asp\.net|aspx"),
    ("jQuery", r"jquery"),
    ("React", r"react"),
    ("Angular", r"angular"),
    ("Vue.js", r"vue"),
    ("Bootstrap", r"bootstrap"),
    ("Google Analytics", r"google-analytics|ga\.js"),
    ("Cloudflare", r"cloudflare"),
];

/// Subdomain labels swept when the caller supplies no wordlist.
pub static COMMON_SUBDOMAINS: &[&str] = &[
    "www", "mail", "ftp", "localhost", "webmail", "smtp", "pop", "ns1", "webdisk",
    "ns2", "cpanel", "whm", "autodiscover", "autoconfig", "m", "imap", "test", "staging",
    "dev", "blog", "shop", "api", "admin", "forum", "support", "help", "docs", "news",
    "app", "apps", "secure", "vpn", "portal", "download", "uploads", "cdn", "media",
    "static", "assets", "img", "images", "js", "css", "files", "backup", "db", "database",
];

/// The user agent sent with every probe unless the caller overrides it.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
