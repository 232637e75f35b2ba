use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cassandra_protocol::query::QueryValues;
use cassandra_protocol::types::value::Value;
use derive_more::{Constructor, Display};
use futures::future::BoxFuture;

use crate::cluster::Cluster;
use crate::error::Result;
use crate::statement::Statement;

/// Row with values accessible by column name.
pub type Row = HashMap<String, Value>;

/// Shape in which a session returns rows.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display, Hash)]
pub enum RowShape {
    /// Rows keyed by column name. Required by the connection layer.
    Named,
    /// Rows as positional tuples.
    Positional,
}

/// Result of executing a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Constructor)]
pub struct ResultSet {
    rows: Vec<Row>,
}

impl ResultSet {
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[inline]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Established, reusable handle for issuing queries against a cluster. Provided by the
/// underlying driver.
pub trait Session: Send + Sync {
    /// Current row shape.
    fn row_shape(&self) -> RowShape;

    /// Changes the shape of rows returned by subsequent queries.
    fn set_row_shape(&self, row_shape: RowShape);

    /// The cluster this session has been derived from.
    fn cluster(&self) -> Arc<dyn Cluster>;

    /// Executes a statement. `timeout` of `None` means the driver default.
    fn execute(
        &self,
        statement: Statement,
        values: QueryValues,
        timeout: Option<Duration>,
        tracing: bool,
    ) -> BoxFuture<'_, Result<ResultSet>>;
}
