use url::Url;

/// Minimal URL and domain helpers shared by the detectors
pub struct DomainUtils;

impl DomainUtils {
    /// Parse a URL string, returning `None` when it has no usable host
    pub fn parse(url: &str) -> Option<Url> {
        match Url::parse(url.trim()) {
            Ok(parsed) if parsed.host_str().map_or(false, |h| !h.is_empty()) => Some(parsed),
            Ok(_) => {
                log::debug!("URL has no network location: {}", url);
                None
            }
            Err(e) => {
                log::debug!("Unparsable URL '{}': {}", url, e);
                None
            }
        }
    }

    /// Extract the lower-cased host of a URL
    pub fn extract_host(url: &str) -> Option<String> {
        Self::parse(url).and_then(|u| u.host_str().map(|h| h.to_lowercase()))
    }

    /// Extract the lower-cased query string of a URL (empty when absent).
    /// Falls back to the raw text between `?` and `#` when the URL does not
    /// parse, so scheme-less input keeps its query.
    pub fn extract_query(url: &str) -> String {
        match Self::parse(url) {
            Some(parsed) => parsed.query().unwrap_or("").to_lowercase(),
            None => Self::raw_query(url).to_lowercase(),
        }
    }

    /// Text after the first `?` and before any `#`
    pub fn raw_query(url: &str) -> &str {
        let without_fragment = url.split('#').next().unwrap_or("");
        without_fragment
            .split_once('?')
            .map(|(_, query)| query)
            .unwrap_or("")
    }

    /// Canonicalize domain (remove www prefix)
    pub fn canonicalize_domain(domain: &str) -> String {
        let domain_lower = domain.trim().to_lowercase();
        if let Some(stripped) = domain_lower.strip_prefix("www.") {
            stripped.to_string()
        } else {
            domain_lower
        }
    }

    /// Brand token of a canonical domain: the label before the first dot
    pub fn brand_label(domain: &str) -> String {
        let canonical = Self::canonicalize_domain(domain);
        match canonical.split_once('.') {
            Some((label, _)) => label.to_string(),
            None => canonical,
        }
    }
}
