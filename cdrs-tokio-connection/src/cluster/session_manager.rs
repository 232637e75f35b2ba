use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cassandra_protocol::query::QueryValues;
use tracing::*;

use crate::cluster::{
    get_connection_key, Cluster, ConnectedCluster, ConnectionKey, ResultSet, Session,
    SessionFactory,
};
use crate::config::ConnectionOptions;
use crate::error::{Error, Result};
use crate::statement::Statement;
use crate::types::UdtRegistration;

/// Maintains multiple sessions, one per cluster name and keyspace combination, and routes
/// statements to them by [`ConnectionKey`].
#[derive(Clone, Debug)]
pub struct SessionManager {
    factory: SessionFactory,
    options: ConnectionOptions,
    connections: HashMap<ConnectionKey, ConnectedCluster>,
}

impl SessionManager {
    /// Creates an empty manager. `options` are used for every connection made by it.
    pub fn new(factory: SessionFactory, options: ConnectionOptions) -> Self {
        SessionManager {
            factory,
            options,
            connections: Default::default(),
        }
    }

    /// Opens a new cluster connection. Errors are returned as they are - retrying is up to the
    /// caller.
    pub async fn create_cluster_and_session(
        &self,
        cluster_name: &str,
        hosts: &[String],
    ) -> Result<ConnectedCluster> {
        let connected = self.factory.create(hosts, &self.options).await?;
        debug!(cluster_name, "SessionManager: connection established.");

        Ok(connected)
    }

    /// Connects and stores the session under the key built from `cluster_name` and `keyspace`.
    /// A session already stored under that key gets replaced.
    pub async fn add_connection(
        &mut self,
        hosts: &[String],
        keyspace: &str,
        cluster_name: &str,
    ) -> Result<ConnectionKey> {
        let connected = self.create_cluster_and_session(cluster_name, hosts).await?;
        let key = get_connection_key(cluster_name, keyspace);

        if self.connections.insert(key.clone(), connected).is_some() {
            warn!(%key, "Replacing existing session for connection key.");
        }

        Ok(key)
    }

    /// Executes a statement on the session registered for `connection_key`.
    pub async fn execute(
        &self,
        statement: Statement,
        values: QueryValues,
        timeout: Option<Duration>,
        tracing: bool,
        connection_key: &ConnectionKey,
    ) -> Result<ResultSet> {
        let session = self
            .get_session(connection_key)
            .ok_or_else(|| Error::ConnectionNotFound(connection_key.clone()))?;

        session.execute(statement, values, timeout, tracing).await
    }

    pub fn get_session(&self, connection_key: &ConnectionKey) -> Option<Arc<dyn Session>> {
        self.connections
            .get(connection_key)
            .map(|connected| connected.session.clone())
    }

    /// Returns the cluster for given name and keyspace.
    pub fn get_cluster(&self, cluster_name: &str, keyspace: &str) -> Result<Arc<dyn Cluster>> {
        let key = get_connection_key(cluster_name, keyspace);
        self.connections
            .get(&key)
            .map(|connected| connected.cluster.clone())
            .ok_or_else(|| {
                Error::NotConfigured(format!(
                    "cluster for connection key {key} is not configured"
                ))
            })
    }

    /// Registers a user type with every managed cluster. Every cluster is attempted; the first
    /// error is returned.
    pub fn register_user_type(&self, registration: &UdtRegistration) -> Result<()> {
        let mut first_error = None;

        for (key, connected) in &self.connections {
            if let Err(error) = registration.register_with(connected.cluster.as_ref()) {
                warn!(%error, %key, "Error registering user type.");
                first_error.get_or_insert(error);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    pub fn connection_keys(&self) -> impl Iterator<Item = &ConnectionKey> {
        self.connections.keys()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
