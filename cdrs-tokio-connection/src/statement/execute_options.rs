use std::time::Duration;

use cassandra_protocol::consistency::Consistency;
use cassandra_protocol::query::QueryValues;

use crate::cluster::ConnectionKey;

/// Per-call parameters of [`ConnectionContext::execute`](crate::ConnectionContext::execute).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecuteOptions {
    /// Values to bind. Empty named values if not set.
    pub values: Option<QueryValues>,
    /// Consistency for text and structured queries. Context default if not set.
    pub consistency: Option<Consistency>,
    /// Driver timeout. Driver default if not set.
    pub timeout: Option<Duration>,
    /// Should tracing be enabled.
    pub tracing: bool,
    /// Target session in multi-session mode. Ignored otherwise.
    pub connection_key: Option<ConnectionKey>,
}

impl ExecuteOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets new statement values.
    #[must_use]
    pub fn with_values(mut self, values: impl Into<QueryValues>) -> Self {
        self.values = Some(values.into());
        self
    }

    /// Sets new statement consistency
    #[must_use]
    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_tracing(mut self, tracing: bool) -> Self {
        self.tracing = tracing;
        self
    }

    /// Sets the session to execute on, when multiple sessions are configured.
    #[must_use]
    pub fn with_connection_key(mut self, connection_key: ConnectionKey) -> Self {
        self.connection_key = Some(connection_key);
        self
    }
}
