//! Query parameters for list and count calls

/// Paging and keyword filters for list and count calls
///
/// Keywords are sent as `_keywords_<name>[]=<value>`; repeated names become
/// repeated query pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    offset: Option<u64>,
    limit: Option<u64>,
    keywords: Vec<(String, String)>,
}

impl SearchParams {
    /// Empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the first `offset` members
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Return at most `limit` members
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filter by keyword `name` matching `value`
    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.keywords.push((name.into(), value.into()));
        self
    }

    /// Same keywords, paging removed (count calls ignore paging)
    pub fn without_paging(&self) -> Self {
        Self {
            offset: None,
            limit: None,
            keywords: self.keywords.clone(),
        }
    }

    /// Query pairs in a stable order: keywords, then offset, then limit
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .keywords
            .iter()
            .map(|(name, value)| (format!("_keywords_{name}[]"), value.clone()))
            .collect();
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}
