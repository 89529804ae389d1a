use crate::crawler::frontier::VisitedSet;
use crate::url::{CrawlUrl, HTTP_SCHEMES};

/// Decides which normalized candidates are admitted to the frontier
///
/// A candidate is accepted only if all of the following hold:
///
/// 1. The scheme is `http` or `https`
/// 2. The percent-decoded path contains none of the exclusion substrings (case-sensitive)
/// 3. The host equals the seed's host exactly; ports and schemes are not compared
/// 4. The URL has not been visited yet
#[derive(Debug, Clone)]
pub struct UrlFilter {
    seed_host: Option<String>,
    exclude: Vec<String>,
}

impl UrlFilter {
    pub fn new(seed: &CrawlUrl, exclude: Vec<String>) -> Self {
        Self {
            seed_host: seed.host().map(str::to_string),
            exclude,
        }
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Returns true if the candidate should be enqueued
    pub fn should_crawl(&self, url: &CrawlUrl, visited: &VisitedSet) -> bool {
        match url.scheme() {
            Some(scheme) if HTTP_SCHEMES.contains(&scheme) => {}
            _ => return false,
        }

        if let Some(pattern) = self.excluded_by(url) {
            tracing::trace!("{} excluded by '{}'", url, pattern);
            return false;
        }

        if url.host().is_none() || url.host() != self.seed_host.as_deref() {
            return false;
        }

        !visited.contains(url)
    }

    /// Returns the first exclusion pattern found in the URL's decoded path
    fn excluded_by(&self, url: &CrawlUrl) -> Option<&str> {
        if self.exclude.is_empty() {
            return None;
        }

        let decoded = urlencoding::decode_binary(url.path().as_bytes());
        let path = String::from_utf8_lossy(&decoded);
        self.exclude
            .iter()
            .find(|pattern| path.contains(pattern.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::{normalize_against, parse_href};

    fn seed() -> CrawlUrl {
        CrawlUrl::parse_absolute("https://example.com/").unwrap()
    }

    fn candidate(raw: &str) -> CrawlUrl {
        normalize_against(&parse_href(raw, HTTP_SCHEMES).unwrap(), &seed())
    }

    fn filter(exclude: &[&str]) -> UrlFilter {
        UrlFilter::new(&seed(), exclude.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn test_same_host_accepted() {
        let visited = VisitedSet::new();
        assert!(filter(&[]).should_crawl(&candidate("/a"), &visited));
        assert!(filter(&[]).should_crawl(&candidate("https://example.com/b"), &visited));
    }

    #[test]
    fn test_scheme_mismatch_with_same_host_accepted() {
        let visited = VisitedSet::new();
        assert!(filter(&[]).should_crawl(&candidate("http://example.com/plain"), &visited));
    }

    #[test]
    fn test_other_host_rejected() {
        let visited = VisitedSet::new();
        let filter = filter(&[]);

        assert!(!filter.should_crawl(&candidate("https://other.com/c"), &visited));
        assert!(!filter.should_crawl(&candidate("https://www.example.com/"), &visited));
        assert!(!filter.should_crawl(&candidate("https://sub.example.com/a"), &visited));
    }

    #[test]
    fn test_host_match_ignores_port() {
        let visited = VisitedSet::new();
        assert!(filter(&[]).should_crawl(&candidate("https://example.com:8443/a"), &visited));
    }

    #[test]
    fn test_exclusion_matches_path_substring() {
        let visited = VisitedSet::new();
        let filter = filter(&["/blog"]);

        assert!(!filter.should_crawl(&candidate("https://example.com/blog/post-1"), &visited));
        assert!(filter.should_crawl(&candidate("https://example.com/news/post-1"), &visited));
    }

    #[test]
    fn test_exclusion_matches_decoded_path() {
        let visited = VisitedSet::new();

        let umlaut = filter(&["/über"]);
        assert_eq!(candidate("/über/x").path(), "/%C3%BCber/x");
        assert!(!umlaut.should_crawl(&candidate("/über/x"), &visited));
        assert!(!umlaut.should_crawl(&candidate("/%C3%BCber/y"), &visited));
        assert!(umlaut.should_crawl(&candidate("/uber/x"), &visited));

        let space = filter(&["my docs"]);
        assert!(!space.should_crawl(&candidate("/my docs/a"), &visited));
    }

    #[test]
    fn test_exclusion_is_case_sensitive() {
        let visited = VisitedSet::new();
        let filter = filter(&["/blog"]);
        assert!(filter.should_crawl(&candidate("/Blog/post-1"), &visited));
    }

    #[test]
    fn test_exclusion_ignores_query() {
        let visited = VisitedSet::new();
        let filter = filter(&["print"]);

        assert!(filter.should_crawl(&candidate("/article?view=print"), &visited));
        assert!(!filter.should_crawl(&candidate("/print/article"), &visited));
    }

    #[test]
    fn test_any_exclusion_pattern_rejects() {
        let visited = VisitedSet::new();
        let filter = filter(&["/tag", ".pdf"]);

        assert!(!filter.should_crawl(&candidate("/tag/rust"), &visited));
        assert!(!filter.should_crawl(&candidate("/files/report.pdf"), &visited));
        assert!(filter.should_crawl(&candidate("/about"), &visited));
    }

    #[test]
    fn test_visited_rejected() {
        let mut visited = VisitedSet::new();
        let url = candidate("/a");
        visited.insert(&url);

        let filter = filter(&[]);
        assert!(!filter.should_crawl(&url, &visited));
        // Dedup uses the resolved form, not the written href
        assert!(!filter.should_crawl(&candidate("https://example.com/a"), &visited));
        assert!(!filter.should_crawl(&candidate("/a#section"), &visited));
    }

    #[test]
    fn test_visited_rejection_is_stable() {
        let mut visited = VisitedSet::new();
        let url = candidate("/a");
        visited.insert(&url);

        let filter = filter(&[]);
        for _ in 0..3 {
            assert!(!filter.should_crawl(&url, &visited));
        }
    }

    #[test]
    fn test_relative_candidate_rejected() {
        // Candidates must be normalized before filtering
        let visited = VisitedSet::new();
        let relative = parse_href("/a", HTTP_SCHEMES).unwrap();
        assert!(!filter(&[]).should_crawl(&relative, &visited));
    }
}
