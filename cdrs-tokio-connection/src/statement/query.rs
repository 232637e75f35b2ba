use std::collections::HashMap;

use cassandra_protocol::consistency::Consistency;
use cassandra_protocol::query::QueryValues;
use derivative::Derivative;

use crate::statement::Statement;

/// Structured statement which renders itself to CQL together with the values it binds.
pub trait CqlStatement: Send + Sync {
    /// CQL text of the statement.
    fn to_cql(&self) -> String;

    /// Values bound by the statement.
    fn context(&self) -> QueryValues;
}

/// Anything which can be executed through a
/// [`ConnectionContext`](crate::ConnectionContext).
#[derive(Derivative)]
#[derivative(Debug)]
pub enum Query {
    /// Driver-native statement, passed through unchanged.
    Statement(Statement),
    /// Structured statement, rendered before execution.
    Structured(#[derivative(Debug = "ignore")] Box<dyn CqlStatement>),
    /// Raw CQL text.
    Text(String),
}

impl Query {
    pub fn structured<S: CqlStatement + 'static>(statement: S) -> Self {
        Query::Structured(Box::new(statement))
    }

    /// Converts into a driver statement and the values to bind. Structured statements bind
    /// their own context instead of `values`; text and structured statements are executed at
    /// `consistency`. Missing values become an empty named set.
    pub fn normalize(
        self,
        consistency: Consistency,
        values: Option<QueryValues>,
    ) -> (Statement, QueryValues) {
        let (statement, values) = match self {
            Query::Statement(statement) => (statement, values),
            Query::Structured(statement) => (
                Statement::new(statement.to_cql()).with_consistency(consistency),
                Some(statement.context()),
            ),
            Query::Text(query) => (Statement::new(query).with_consistency(consistency), values),
        };

        (
            statement,
            values.unwrap_or_else(|| QueryValues::NamedValues(HashMap::new())),
        )
    }
}

impl From<Statement> for Query {
    fn from(statement: Statement) -> Self {
        Query::Statement(statement)
    }
}

impl From<String> for Query {
    fn from(query: String) -> Self {
        Query::Text(query)
    }
}

impl From<&str> for Query {
    fn from(query: &str) -> Self {
        Query::Text(query.to_string())
    }
}

impl From<Box<dyn CqlStatement>> for Query {
    fn from(statement: Box<dyn CqlStatement>) -> Self {
        Query::Structured(statement)
    }
}
