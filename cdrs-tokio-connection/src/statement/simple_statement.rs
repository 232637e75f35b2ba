use cassandra_protocol::consistency::Consistency;
use derive_more::Display;

/// Driver-native statement: CQL text with an optional consistency level. Statements without
/// consistency use the driver default.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{query}")]
pub struct Statement {
    query: String,
    consistency: Option<Consistency>,
}

impl Statement {
    pub fn new(query: impl Into<String>) -> Self {
        Statement {
            query: query.into(),
            consistency: None,
        }
    }

    /// Sets new statement consistency
    #[must_use]
    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }

    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[inline]
    pub fn consistency(&self) -> Option<Consistency> {
        self.consistency
    }
}
