//! Root-domain canonicalization for URLs and bare domains.

use url::Url;

/// Reduce a URL or bare domain to a comparable root-domain token.
///
/// Lowercases, parses (prepending `https://` when no http(s) scheme is
/// present), keeps the host and strips any leading `www.` labels. Inputs that
/// do not parse, or parse without a host, come back lowercased but otherwise
/// untouched. Never fails.
///
/// ```
/// use brandrank_core::normalize_domain;
///
/// assert_eq!(normalize_domain("https://www.Example.com/path"), "example.com");
/// assert_eq!(normalize_domain("EXAMPLE.COM"), "example.com");
/// ```
#[must_use]
pub fn normalize_domain(input: &str) -> String {
    let lower = input.trim().to_lowercase();

    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        lower.clone()
    } else {
        format!("https://{lower}")
    };

    let Ok(parsed) = Url::parse(&candidate) else {
        return lower;
    };

    match parsed.host_str() {
        Some(host) if !host.is_empty() => strip_www(host).to_string(),
        _ => lower,
    }
}

/// `true` when `result_domain` is `brand_domain` or one of its subdomains.
///
/// Both arguments are expected to be normalized already.
#[must_use]
pub fn domain_matches(result_domain: &str, brand_domain: &str) -> bool {
    if brand_domain.is_empty() || result_domain.is_empty() {
        return false;
    }
    result_domain == brand_domain
        || result_domain
            .strip_suffix(brand_domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

// Repeated so that normalizing twice is a no-op.
fn strip_www(host: &str) -> &str {
    let mut host = host;
    while let Some(rest) = host.strip_prefix("www.") {
        host = rest;
    }
    host
}
