use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use dsei_scraper::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Derives the site's own domain from its base URL
///
/// A leading `www.` is dropped so both the bare domain and its subdomains
/// can be recognized as internal.
///
/// ```
/// use url::Url;
/// use dsei_scraper::url::own_domain;
///
/// let base = Url::parse("https://www.dsei.co.uk").unwrap();
/// assert_eq!(own_domain(&base), Some("dsei.co.uk".to_string()));
/// ```
pub fn own_domain(base: &Url) -> Option<String> {
    extract_domain(base).map(|host| match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain_lowercases() {
        let url = Url::parse("https://Expo.Example.COM/a").unwrap();
        assert_eq!(extract_domain(&url), Some("expo.example.com".to_string()));
    }

    #[test]
    fn test_own_domain_without_www() {
        let url = Url::parse("https://expo.example.com").unwrap();
        assert_eq!(own_domain(&url), Some("expo.example.com".to_string()));
    }

    #[test]
    fn test_own_domain_ip_host() {
        let url = Url::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(own_domain(&url), Some("127.0.0.1".to_string()));
    }
}
