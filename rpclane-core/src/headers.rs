//! Merging extra headers into whatever collection a request carries.
//!
//! Three shapes are supported through [`HeaderSink`]: ordered name/value
//! pairs (appended), an [`http::HeaderMap`] (overwritten per name) and plain
//! string mappings (overwritten per key). An absent `Option` collection is
//! replaced by one holding only the additions.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("invalid header name {name:?}")]
    InvalidName {
        name: String,
        #[source]
        source: http::header::InvalidHeaderName,
    },
    #[error("invalid value for header {name:?}")]
    InvalidValue {
        name: String,
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}

/// A collection that can take one more header.
pub trait HeaderSink {
    fn apply(&mut self, name: &str, value: &str) -> Result<(), HeaderError>;
}

/// Ordered pairs: append, duplicates allowed.
impl HeaderSink for Vec<(String, String)> {
    fn apply(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        self.push((name.to_string(), value.to_string()));
        Ok(())
    }
}

impl HeaderSink for HeaderMap {
    fn apply(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|source| HeaderError::InvalidName {
                name: name.to_string(),
                source,
            })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|source| HeaderError::InvalidValue {
                name: name.to_string(),
                source,
            })?;
        self.insert(header_name, header_value);
        Ok(())
    }
}

impl<S: BuildHasher> HeaderSink for HashMap<String, String, S> {
    fn apply(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        self.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

impl HeaderSink for BTreeMap<String, String> {
    fn apply(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        self.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: BuildHasher> HeaderSink for IndexMap<String, String, S> {
    fn apply(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        self.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

impl<H: HeaderSink + Default> HeaderSink for Option<H> {
    fn apply(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        self.get_or_insert_with(H::default).apply(name, value)
    }
}

/// Apply every addition to `headers` in iteration order.
///
/// Stops at the first name or value the collection rejects; additions before
/// it stay applied.
pub fn merge_headers<H, I, K, V>(headers: &mut H, additions: I) -> Result<(), HeaderError>
where
    H: HeaderSink + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (name, value) in additions {
        headers.apply(name.as_ref(), value.as_ref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_pairs_are_appended() {
        let mut headers = pairs(&[("x", "y")]);
        merge_headers(&mut headers, [("a", "b"), ("c", "d")]).unwrap();
        assert_eq!(headers, pairs(&[("x", "y"), ("a", "b"), ("c", "d")]));
    }

    #[test]
    fn test_pairs_keep_duplicates() {
        let mut headers = pairs(&[("a", "1")]);
        merge_headers(&mut headers, [("a", "2")]).unwrap();
        assert_eq!(headers, pairs(&[("a", "1"), ("a", "2")]));
    }

    #[test]
    fn test_plain_mapping_overwrites() {
        let mut headers: HashMap<String, String> = pairs(&[("a", "c"), ("b", "d")]).into_iter().collect();
        merge_headers(&mut headers, [("a", "b"), ("c", "d")]).unwrap();

        let expected: HashMap<String, String> =
            pairs(&[("a", "b"), ("b", "d"), ("c", "d")]).into_iter().collect();
        assert_eq!(headers, expected);
    }

    #[test]
    fn test_index_map_keeps_insertion_order() {
        let mut headers: IndexMap<String, String> = pairs(&[("a", "c"), ("b", "d")]).into_iter().collect();
        merge_headers(&mut headers, [("a", "b"), ("c", "d")]).unwrap();

        let keys: Vec<&str> = headers.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(headers["a"], "b");
    }

    #[test]
    fn test_btree_map_overwrites() {
        let mut headers: BTreeMap<String, String> = pairs(&[("a", "c")]).into_iter().collect();
        merge_headers(&mut headers, [("a", "b")]).unwrap();
        assert_eq!(headers["a"], "b");
    }

    #[test]
    fn test_header_map_sets_by_name() {
        let mut headers = HeaderMap::new();
        headers.insert("a", HeaderValue::from_static("b"));
        merge_headers(&mut headers, [("c", "d")]).unwrap();

        assert_eq!(headers.get("a").unwrap(), "b");
        assert_eq!(headers.get("c").unwrap(), "d");

        merge_headers(&mut headers, [("A", "z")]).unwrap();
        assert_eq!(headers.get_all("a").iter().count(), 1);
        assert_eq!(headers.get("a").unwrap(), "z");
    }

    #[test]
    fn test_header_map_rejects_bad_name() {
        let mut headers = HeaderMap::new();
        let err = merge_headers(&mut headers, [("bad name", "v")]).unwrap_err();
        assert!(matches!(err, HeaderError::InvalidName { .. }));
    }

    #[test]
    fn test_header_map_rejects_bad_value() {
        let mut headers = HeaderMap::new();
        let err = merge_headers(&mut headers, [("x-token", "line\nbreak")]).unwrap_err();
        assert!(matches!(err, HeaderError::InvalidValue { .. }));
    }

    #[test]
    fn test_absent_collection_takes_additions() {
        let mut headers: Option<Vec<(String, String)>> = None;
        merge_headers(&mut headers, [("a", "b"), ("c", "d")]).unwrap();
        assert_eq!(headers, Some(pairs(&[("a", "b"), ("c", "d")])));
    }

    #[test]
    fn test_accepts_owned_additions() {
        let mut headers = HeaderMap::new();
        let additions: HashMap<String, String> = pairs(&[("x-jwt-token", "secret")]).into_iter().collect();
        merge_headers(&mut headers, &additions).unwrap();
        assert_eq!(headers.get("x-jwt-token").unwrap(), "secret");
    }
}
