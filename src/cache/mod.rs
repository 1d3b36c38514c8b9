//! Disk-backed HTTP response cache
//!
//! Every page the crawler fetches is cached on disk under a path derived from
//! the request itself, mirroring the source site's URL structure so cache
//! entries stay human-inspectable. A request is described by a
//! [`RequestDescriptor`]; two descriptors with the same method, URL, query
//! parameters and namespace always map to the same cache path, no matter in
//! which order the query parameters were added.

mod store;

pub use store::{CacheStore, CachedResponse};

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Normalized description of one cacheable HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP method, uppercase ("GET" for everything the crawler does)
    pub method: String,

    /// Request URL without query string (scheme + host + path)
    pub base_url: String,

    /// Query parameters; BTreeMap keeps key derivation order-insensitive
    pub query: BTreeMap<String, String>,

    /// Extra path segment inserted into the cache path, may be empty
    pub route_prefix: String,

    /// Cache namespace separating logical endpoints (e.g. "card")
    pub namespace: String,
}

impl RequestDescriptor {
    /// Creates a GET descriptor
    pub fn get(
        base_url: impl Into<String>,
        query: BTreeMap<String, String>,
        route_prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            method: "GET".to_string(),
            base_url: base_url.into(),
            query,
            route_prefix: route_prefix.into(),
            namespace: namespace.into(),
        }
    }

    /// Full request URL including the sorted query string
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.base_url.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.base_url, query)
    }

    /// Cache path relative to the cache root:
    /// `<namespace>/<route_prefix>/<url path>/<sorted query>.html`
    ///
    /// Non-GET methods get a method prefix on the file name so they can never
    /// collide with a GET for the same URL.
    pub fn cache_path(&self) -> PathBuf {
        let mut path = PathBuf::new();

        for segment in self.namespace.split('/').filter(|s| !s.is_empty()) {
            path.push(sanitize(segment));
        }
        for segment in self.route_prefix.split('/').filter(|s| !s.is_empty()) {
            path.push(sanitize(segment));
        }

        // Mirror the URL path below the namespace. The scheme and host are
        // deliberately left out; the namespace already partitions endpoints.
        if let Ok(url) = url::Url::parse(&self.base_url) {
            for segment in url.path().split('/').filter(|s| !s.is_empty()) {
                path.push(sanitize(segment));
            }
        }

        let query = if self.query.is_empty() {
            "index".to_string()
        } else {
            self.query
                .iter()
                .map(|(k, v)| format!("{}={}", sanitize(k), sanitize(v)))
                .collect::<Vec<_>>()
                .join("&")
        };

        let file = if self.method == "GET" {
            format!("{}.html", query)
        } else {
            format!("{}__{}.html", self.method.to_lowercase(), query)
        };
        path.push(file);

        path
    }
}

/// Keeps path components filesystem-safe
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | '=') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_cache_path_ignores_insertion_order() {
        let mut a = BTreeMap::new();
        a.insert("product_no".to_string(), "WX-05".to_string());
        a.insert("card_page".to_string(), "2".to_string());

        let mut b = BTreeMap::new();
        b.insert("card_page".to_string(), "2".to_string());
        b.insert("product_no".to_string(), "WX-05".to_string());

        let da = RequestDescriptor::get("https://example.com/card/list.php", a, "", "card");
        let db = RequestDescriptor::get("https://example.com/card/list.php", b, "", "card");

        assert_eq!(da.cache_path(), db.cache_path());
    }

    #[test]
    fn test_cache_path_mirrors_url_path() {
        let d = RequestDescriptor::get(
            "https://example.com/card/list.php",
            query(&[("product_no", "WX-05")]),
            "",
            "card",
        );
        assert_eq!(
            d.cache_path(),
            PathBuf::from("card/card/list.php/product_no=WX-05.html")
        );
    }

    #[test]
    fn test_different_namespaces_never_collide() {
        let q = query(&[("card_no", "WX05-001")]);
        let a = RequestDescriptor::get("https://example.com/detail.php", q.clone(), "", "card");
        let b = RequestDescriptor::get(
            "https://example.com/detail.php",
            q,
            "",
            "products/wixoss",
        );
        assert_ne!(a.cache_path(), b.cache_path());
    }

    #[test]
    fn test_empty_query_uses_index_file() {
        let d = RequestDescriptor::get(
            "https://example.com/card/list.php",
            BTreeMap::new(),
            "",
            "card",
        );
        assert!(d.cache_path().ends_with("index.html"));
    }

    #[test]
    fn test_url_includes_sorted_query() {
        let d = RequestDescriptor::get(
            "https://example.com/list.php",
            query(&[("b", "2"), ("a", "1")]),
            "",
            "card",
        );
        assert_eq!(d.url(), "https://example.com/list.php?a=1&b=2");
    }

    #[test]
    fn test_unsafe_characters_sanitized() {
        let d = RequestDescriptor::get(
            "https://example.com/list.php",
            query(&[("keyword", "a/b c")]),
            "",
            "card",
        );
        let path = d.cache_path();
        let file = path.file_name().unwrap().to_str().unwrap();
        assert!(!file.contains('/'));
        assert!(!file.contains(' '));
    }
}
