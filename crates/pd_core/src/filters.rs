pub const PARAM_LIMIT: &str = "limit";
pub const PARAM_QUERY: &str = "query";
pub const PARAM_STATUSES: &str = "statuses[]";
pub const PARAM_URGENCIES: &str = "urgencies[]";
pub const PARAM_SERVICE_IDS: &str = "service_ids[]";
pub const PARAM_TEAM_IDS: &str = "team_ids[]";
pub const PARAM_INCIDENT_KEY: &str = "incident_key";

pub const DEFAULT_LIMIT: i64 = 100;

/// Ordered multi-map of provider query parameters.
///
/// A key can be present with zero values. That state means "restrict to the empty set" and is
/// different from the key being absent, which means "no restriction". See [`matches_nothing`].
///
/// [`matches_nothing`]: FilterParams::matches_nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    entries: Vec<(String, Vec<String>)>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, key: &str) -> &mut Vec<String> {
        let idx = match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    /// Marks `key` present without adding a value.
    pub fn declare(&mut self, key: &str) {
        self.slot(key);
    }

    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.slot(key).push(value.into());
    }

    /// Declares `key` and appends every value, so an empty iterator still leaves the key present.
    pub fn extend<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slot = self.slot(key);
        slot.extend(values.into_iter().map(Into::into));
    }

    /// Single-valued parameter: replaces whatever was there.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let slot = self.slot(key);
        slot.clear();
        slot.push(value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Keys that are present but hold no values.
    pub fn empty_filters(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k.as_str())
    }

    /// True when some filter restricts results to the empty set.
    pub fn matches_nothing(&self) -> bool {
        self.empty_filters().next().is_some()
    }

    /// Flattened `(key, value)` pairs in insertion order, ready for a query string.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
            .collect()
    }
}
