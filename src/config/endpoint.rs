//! Structured endpoint descriptor.
//!
//! The base URL is parsed once at startup. Host and port come from the
//! URL parser; a missing port resolves to the scheme's well-known default.

use reqwest::Method;
use url::Url;

use crate::config::validation::ValidationError;

/// URL scheme accepted for targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// An absolute path with no query or fragment.
///
/// `Url::set_path` would percent-encode a `?` or `#` into the path itself.
pub(crate) fn is_plain_path(path: &str) -> bool {
    path.starts_with('/') && !path.contains(['?', '#'])
}

/// A validated request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub method: Method,
    url: Url,
}

impl Endpoint {
    /// Build an endpoint from a base URL, a path and a method name.
    pub fn parse(base_url: &str, path: &str, method: &str) -> Result<Self, ValidationError> {
        let url = Url::parse(base_url).map_err(|e| ValidationError::BaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => return Err(ValidationError::Scheme(other.to_string())),
        };

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ValidationError::BaseUrl {
                url: base_url.to_string(),
                reason: "missing host".to_string(),
            })?
            .to_string();

        let port = url.port_or_known_default().ok_or_else(|| ValidationError::BaseUrl {
            url: base_url.to_string(),
            reason: "cannot determine port".to_string(),
        })?;

        if !is_plain_path(path) {
            return Err(ValidationError::Path(path.to_string()));
        }

        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| ValidationError::Method(method.to_string()))?;

        // A base URL may carry a prefix such as "/service"; keep it in front of the path.
        let path = format!("{}{}", url.path().trim_end_matches('/'), path);
        let mut url = url;
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self {
            scheme,
            host,
            port,
            path,
            method,
            url,
        })
    }

    /// Fully qualified URL for this endpoint.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_port() {
        let ep = Endpoint::parse("http://localhost:9090", "/api/comments", "post").unwrap();
        assert_eq!(ep.scheme, Scheme::Http);
        assert_eq!(ep.host, "localhost");
        assert_eq!(ep.port, 9090);
        assert_eq!(ep.path, "/api/comments");
        assert_eq!(ep.method, Method::POST);
    }

    #[test]
    fn test_default_ports_per_scheme() {
        let http = Endpoint::parse("http://example.com", "/x", "POST").unwrap();
        assert_eq!(http.port, 80);

        let https = Endpoint::parse("https://example.com", "/x", "POST").unwrap();
        assert_eq!(https.port, 443);
        assert_eq!(https.url().as_str(), "https://example.com/x");
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let ep = Endpoint::parse("http://127.0.0.1:8080/service/", "/api/comments", "POST").unwrap();
        assert_eq!(ep.path, "/service/api/comments");
        assert_eq!(ep.url().as_str(), "http://127.0.0.1:8080/service/api/comments");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            Endpoint::parse("localhost:8080", "/x", "POST"),
            Err(ValidationError::Scheme(_)) | Err(ValidationError::BaseUrl { .. })
        ));
        assert!(matches!(
            Endpoint::parse("ftp://example.com", "/x", "POST"),
            Err(ValidationError::Scheme(s)) if s == "ftp"
        ));
        assert!(matches!(
            Endpoint::parse("http://example.com", "api", "POST"),
            Err(ValidationError::Path(_))
        ));
        for path in ["/api/comments?x=1", "/api/comments#top"] {
            assert_eq!(
                Endpoint::parse("http://example.com", path, "POST"),
                Err(ValidationError::Path(path.to_string()))
            );
        }
        assert!(matches!(
            Endpoint::parse("http://example.com", "/x", "BAD METHOD"),
            Err(ValidationError::Method(_))
        ));
    }
}
