//! HTTP response snapshot returned by every fetch.

use serde::{Deserialize, Serialize};

/// A fully-read response from Gatherer: status, headers, body.
///
/// This is the value stored in the response cache, so it owns everything and
/// is cheap to clone compared to re-fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GathererResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order (names lowercased by the transport).
    pub headers: Vec<(String, String)>,
    /// Response body as text.
    pub body: String,
}

impl GathererResponse {
    /// Look up a header value by name, case-insensitively. Returns the first
    /// occurrence.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The redirect target, if this is a redirect response.
    ///
    /// A response counts as a redirect only when the status is 3xx AND a
    /// `Location` header is present; a 3xx without `Location` is terminal.
    pub fn redirect_location(&self) -> Option<&str> {
        if (300..400).contains(&self.status) {
            self.header("location")
        } else {
            None
        }
    }

    /// Whether this response is a followable redirect.
    pub fn is_redirect(&self) -> bool {
        self.redirect_location().is_some()
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, headers: Vec<(&str, &str)>) -> GathererResponse {
        GathererResponse {
            status,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: String::new(),
        }
    }

    #[test]
    fn test_redirect_classification() {
        let r = response(302, vec![("location", "/Pages/Default.aspx")]);
        assert!(r.is_redirect());
        assert_eq!(r.redirect_location(), Some("/Pages/Default.aspx"));
    }

    #[test]
    fn test_3xx_without_location_is_terminal() {
        let r = response(304, vec![]);
        assert!(!r.is_redirect());
        assert_eq!(r.redirect_location(), None);
    }

    #[test]
    fn test_200_with_location_is_terminal() {
        let r = response(200, vec![("location", "/elsewhere")]);
        assert!(!r.is_redirect());
        assert!(r.is_success());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let r = response(301, vec![("Location", "/a")]);
        assert_eq!(r.header("location"), Some("/a"));
        assert_eq!(r.header("LOCATION"), Some("/a"));
        assert_eq!(r.header("content-type"), None);
    }
}
