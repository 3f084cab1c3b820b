use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use super::error::PostTextError;

/// `scheme://` or bare `www.` followed by the longest run of non-whitespace.
const URL_PATTERN: &str = r"(?i)(?:[a-z][a-z0-9+.\-]*://|www\.)\S+";

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern is a valid regex"))
}

/// A URL detected in post text, located by byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSpan {
    pub range: Range<usize>,
}

impl UrlSpan {
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.range.clone()]
    }
}

/// Finds URL spans in left-to-right order. Spans never overlap.
pub fn find_urls(text: &str) -> Vec<UrlSpan> {
    url_regex()
        .find_iter(text)
        .map(|m| UrlSpan { range: m.range() })
        .collect()
}

/// Returns the last URL span if nothing but whitespace follows it.
pub fn trailing_url(text: &str, spans: &[UrlSpan]) -> Option<UrlSpan> {
    let last = spans.last()?;
    text[last.range.end..]
        .chars()
        .all(char::is_whitespace)
        .then(|| last.clone())
}

/// Checks that a link handed in for composition is an absolute http(s) URL
/// with a host, and that the detector would see it as exactly one URL.
///
/// # Errors
///
/// Returns [`PostTextError::InvalidLink`] describing the first problem found.
pub fn validate_link(link: &str) -> Result<Url, PostTextError> {
    let invalid = |reason: String| PostTextError::InvalidLink {
        link: link.to_owned(),
        reason,
    };

    if link.chars().any(char::is_whitespace) {
        return Err(invalid("contains whitespace".to_owned()));
    }

    let url = Url::parse(link).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(invalid(format!(
                "unsupported scheme: {scheme} (only http/https allowed)"
            )))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_owned()));
    }

    let spans = find_urls(link);
    if spans.len() != 1 || spans[0].range != (0..link.len()) {
        return Err(invalid("not recognised as a single link".to_owned()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(text: &str) -> Vec<&str> {
        find_urls(text).iter().map(|s| s.as_str(text)).collect()
    }

    #[test]
    fn test_finds_scheme_urls() {
        assert_eq!(
            urls("Check this out: https://example.com and http://a.b/c?d=e"),
            vec!["https://example.com", "http://a.b/c?d=e"]
        );
    }

    #[test]
    fn test_finds_www_urls() {
        assert_eq!(urls("see www.example.org/page now"), vec!["www.example.org/page"]);
    }

    #[test]
    fn test_greedy_to_whitespace() {
        assert_eq!(
            urls("記事: https://example.com/path/日本語?x=1。次"),
            vec!["https://example.com/path/日本語?x=1。次"]
        );
    }

    #[test]
    fn test_no_urls() {
        assert!(find_urls("plain text with no links").is_empty());
        assert!(find_urls("www. is not a link").is_empty());
        assert!(find_urls("").is_empty());
    }

    #[test]
    fn test_multiple_urls_in_order() {
        let text = "複数URL: https://site1.com https://site2.com";
        assert_eq!(urls(text), vec!["https://site1.com", "https://site2.com"]);
    }

    #[test]
    fn test_trailing_url_detection() {
        let text = "summary\nhttps://example.com/a";
        let spans = find_urls(text);
        let trailing = trailing_url(text, &spans).unwrap();
        assert_eq!(trailing.as_str(text), "https://example.com/a");

        let text = "https://example.com/a then words";
        let spans = find_urls(text);
        assert!(trailing_url(text, &spans).is_none());

        assert!(trailing_url("no links", &[]).is_none());
    }

    #[test]
    fn test_validate_link_accepts_http() {
        assert!(validate_link("https://example.com/feed.xml").is_ok());
        assert!(validate_link("http://news.example.org").is_ok());
    }

    #[test]
    fn test_validate_link_rejects_bad_input() {
        assert!(validate_link("").is_err());
        assert!(validate_link("not a url").is_err());
        assert!(validate_link("ftp://example.com").is_err());
        assert!(validate_link("file:///etc/passwd").is_err());
        assert!(validate_link("https://exa mple.com").is_err());
    }

    #[test]
    fn test_validate_link_error_message() {
        let err = validate_link("ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }
}
