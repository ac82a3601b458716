//! The output multi-map.

mod encode;

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use encode::{encode, encode_key};

/// A multi-map from string keys to ordered lists of string values.
///
/// Keys are kept sorted, so iteration and [`Values::encode`] are
/// deterministic regardless of the order entries were added in.
///
/// ```
/// use query_values::Values;
///
/// let mut values = Values::new();
/// values.add("tag", "a");
/// values.add("tag", "b");
/// values.set("page", "2");
///
/// assert_eq!(values.get("tag"), Some("a"));
/// assert_eq!(values.get_all("tag"), ["a", "b"]);
/// assert_eq!(values.encode(), "page=2&tag=a&tag=b");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Values {
    inner: BTreeMap<String, Vec<String>>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values already stored under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces every value stored under `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns all values stored under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.inner.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.inner.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.inner.iter()
    }

    /// Encodes the values as a querystring, sorted by key.
    ///
    /// Brackets in keys are kept as-is, everything else follows the
    /// WHATWG query percent-encode set with spaces written as `+`.
    pub fn encode(&self) -> String {
        self.encode_with(false)
    }

    /// Encodes the values as a querystring, optionally using the stricter
    /// `application/x-www-form-urlencoded` encoding.
    pub fn encode_with(&self, use_form_encoding: bool) -> String {
        // a guess at a reasonable starting size
        let mut buffer = Vec::with_capacity(self.inner.len() * 16);
        let mut first_kv = true;
        for (key, values) in &self.inner {
            for value in values {
                if first_kv {
                    first_kv = false;
                } else {
                    buffer.push(b'&');
                }
                for encoded in encode_key(key.as_bytes(), use_form_encoding) {
                    buffer.extend_from_slice(&encoded);
                }
                buffer.push(b'=');
                for encoded in encode(value.as_bytes(), use_form_encoding) {
                    buffer.extend_from_slice(&encoded);
                }
            }
        }
        // percent-encoding only ever emits ASCII for escaped bytes and copies
        // the remaining UTF-8 input through untouched
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl fmt::Display for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        values.extend(iter);
        values
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Values {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl IntoIterator for Values {
    type Item = (String, Vec<String>);
    type IntoIter = btree_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl From<Values> for BTreeMap<String, Vec<String>> {
    fn from(values: Values) -> Self {
        values.inner
    }
}
