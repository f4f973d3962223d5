//! Request-scoped path parameters.

/// Path parameters bound by the router for the request being dispatched.
///
/// An ordered list of `(name, value)` pairs: names come from the `:name`
/// segments of the matched pattern, values are the literal path text found at
/// those positions. The store lives inside its [`Request`](crate::Request), so
/// it is never shared between requests. The router empties it when dispatch
/// finishes, whatever the outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value bound to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Binds `value` to `key`. An existing binding is overwritten in place,
    /// so the original insertion order is kept.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Removes every binding. The backing allocation is kept for reuse.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
