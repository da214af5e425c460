use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::concurrent::DedupSet;
use crate::enrich::json_urls::parse_document_urls;
use crate::filter::is_valid;

static HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href=["'](https?://[^"']+)["']"#).unwrap());
static ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a [^>]*href=["'](https?://[^"']+)["'][^>]*>"#).unwrap()
});
static SRC: Lazy<Regex> = Lazy::new(|| Regex::new(r#"src=["'](https?://[^"']+)["']"#).unwrap());
static QUOTED_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r#""/[^"]+""#).unwrap());

/// Endpoint candidates found in one document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UrlHits {
    /// Absolute links and JSON `url` values. Not filtered, not yet claimed.
    pub absolute: BTreeSet<String>,
    /// Quoted root-relative paths that passed the validity filter and were
    /// newly added to the endpoint set by this scan.
    pub relative: BTreeSet<String>,
    /// Distinct quoted paths that passed the validity filter, claimed or not.
    pub relative_found: usize,
}

impl UrlHits {
    /// Candidates found in the document, whether or not they were new to the run.
    pub fn found(&self) -> usize {
        self.absolute.len() + self.relative_found
    }

    pub fn into_union(self) -> BTreeSet<String> {
        let mut all = self.absolute;
        all.extend(self.relative);
        all
    }
}

/// Scan `content` for endpoints, claiming new relative paths in `endpoints`.
///
/// Only the surrounding quotes are stripped from a quoted path: `"/login"`
/// yields `/login` with its leading slash, so its provenance line reads
/// `{source}//login`.
pub fn scan_urls(content: &str, endpoints: &DedupSet) -> UrlHits {
    let mut hits = UrlHits::default();
    let mut valid_relative = BTreeSet::new();

    for re in [&*HREF, &*ANCHOR, &*SRC] {
        for cap in re.captures_iter(content) {
            if let Some(m) = cap.get(1) {
                hits.absolute.insert(m.as_str().to_string());
            }
        }
    }

    for m in QUOTED_PATH.find_iter(content) {
        let quoted = m.as_str();
        let path = &quoted[1..quoted.len() - 1];
        if !is_valid(path) {
            continue;
        }
        valid_relative.insert(path);
        if endpoints.claim(path) {
            hits.relative.insert(path.to_string());
        }
    }
    hits.relative_found = valid_relative.len();

    hits.absolute.extend(parse_document_urls(content));
    hits
}

/// Every endpoint candidate in `content`; relative paths are deduplicated
/// against (and recorded into) `endpoints` as a side effect.
pub fn extract_all_urls(content: &str, endpoints: &DedupSet) -> BTreeSet<String> {
    scan_urls(content, endpoints).into_union()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrent::DedupMode;

    #[test]
    fn test_absolute_links_skip_filter() {
        let set = DedupSet::new(DedupMode::Locked);
        let html = r#"<a class="x" href="https://example.com/a?b=1">x</a><script src='http://cdn.example.com/app.js'></script>"#;
        let hits = scan_urls(html, &set);
        assert!(hits.absolute.contains("https://example.com/a?b=1"));
        assert!(hits.absolute.contains("http://cdn.example.com/app.js"));
        assert!(hits.relative.is_empty());
        assert!(set.is_empty());
    }

    #[test]
    fn test_relative_paths_filtered_and_claimed() {
        let set = DedupSet::new(DedupMode::Locked);
        let js = r#"get("/api/users"); get("/img/logo.png"); get("/a,b"); get("/")"#;
        let hits = scan_urls(js, &set);
        assert_eq!(hits.relative, BTreeSet::from(["/api/users".to_string()]));
        assert_eq!(hits.found(), 1);
        assert!(set.contains("/api/users"));

        // second document: already claimed, not reported again
        let again = scan_urls(js, &set);
        assert!(again.relative.is_empty());
        assert_eq!(again.found(), 1);
    }

    #[test]
    fn test_json_document_urls() {
        let set = DedupSet::new(DedupMode::Locked);
        let urls = extract_all_urls(r#"{"data": {"url": "https://api.example.com/v1"}}"#, &set);
        assert!(urls.contains("https://api.example.com/v1"));
    }
}
