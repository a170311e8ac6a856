//! `queries` parameter handling for `/queries` and `/updates`

/// Smallest accepted query count
const MIN_QUERIES: i32 = 1;

/// Largest accepted query count
const MAX_QUERIES: i32 = 500;

/// Number of worlds a multi-query request works on.
///
/// Always within `1..=500`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCount(usize);

impl QueryCount {
    /// Parse the raw `queries` value.
    ///
    /// - Missing or not a 32-bit integer => 1
    /// - Otherwise clamped to 1..=500
    pub fn parse(raw: Option<&str>) -> Self {
        let parsed = raw
            .and_then(|value| value.parse::<i32>().ok())
            .unwrap_or(MIN_QUERIES)
            .clamp(MIN_QUERIES, MAX_QUERIES);
        Self(parsed as usize)
    }

    /// Count from decoded query-string pairs.
    ///
    /// Takes the first `queries` pair; later repeats are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let raw = pairs
            .iter()
            .find(|(key, _)| key == "queries")
            .map(|(_, value)| value.as_str());
        Self::parse(raw)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for QueryCount {
    fn default() -> Self {
        Self(MIN_QUERIES as usize)
    }
}
