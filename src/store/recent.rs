//! Recency List Module
//!
//! The bounded most-recent-first key list persisted under the reserved key.

// == Recency List ==
/// Tracks recently touched keys.
///
/// Keys are stored in a Vec where:
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecencyList {
    /// Order of keys by access time
    order: Vec<String>,
}

impl RecencyList {
    // == Decode ==
    /// Parses the stored form. Absent or empty input gives an empty list.
    ///
    /// Empty items and repeats are dropped, keeping the first occurrence, so a
    /// list damaged by another writer still satisfies the invariants.
    pub fn decode(raw: Option<&str>, delimiter: &str) -> Self {
        let mut order: Vec<String> = Vec::new();

        if let Some(raw) = raw.filter(|r| !r.is_empty()) {
            for key in raw.split(delimiter) {
                if !key.is_empty() && !order.iter().any(|k| k == key) {
                    order.push(key.to_string());
                }
            }
        }

        Self { order }
    }

    // == Encode ==
    /// Joins the keys with `delimiter`.
    pub fn encode(&self, delimiter: &str) -> String {
        self.order.join(delimiter)
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// Truncates to `max_size - 1` first so the list never exceeds
    /// `max_size` once the key is prepended.
    pub fn touch(&mut self, key: &str, max_size: usize) {
        self.order.truncate(max_size.saturating_sub(1));
        self.remove(key);
        self.order.insert(0, key.to_string());
    }

    // == Remove ==
    /// Removes a key, reporting whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.order.len();
        self.order.retain(|k| k != key);
        self.order.len() != before
    }

    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}
