#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cdrs_tokio_connection::cluster::{
    Cluster, ClusterConnector, ConnectedCluster, ResultSet, RowShape, Session,
};
use cdrs_tokio_connection::config::ConnectionOptions;
use cdrs_tokio_connection::statement::Statement;
use cdrs_tokio_connection::types::UdtDescriptor;
use cdrs_tokio_connection::{Error, QueryValues, Result, Value};
use futures::future::BoxFuture;
use futures::FutureExt;
use maplit::hashmap;

/// Statement received by a [`FakeSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub statement: Statement,
    pub values: QueryValues,
    pub timeout: Option<Duration>,
    pub tracing: bool,
}

/// Cluster which knows a fixed set of keyspaces and records registered types.
pub struct FakeCluster {
    pub hosts: Vec<String>,
    keyspaces: HashSet<String>,
    registered_types: Mutex<Vec<(String, String, String)>>,
}

impl FakeCluster {
    pub fn new(hosts: Vec<String>, keyspaces: HashSet<String>) -> Self {
        FakeCluster {
            hosts,
            keyspaces,
            registered_types: Mutex::new(vec![]),
        }
    }

    /// `(keyspace, type name, rust type)` of every successful registration.
    pub fn registered_types(&self) -> Vec<(String, String, String)> {
        self.registered_types.lock().unwrap().clone()
    }
}

impl Cluster for FakeCluster {
    fn register_user_type(
        &self,
        keyspace: &str,
        type_name: &str,
        descriptor: Arc<UdtDescriptor>,
    ) -> Result<()> {
        if !self.keyspaces.contains(keyspace) {
            return Err(Error::UserTypeDoesNotExist {
                keyspace: keyspace.into(),
                type_name: type_name.into(),
            });
        }

        self.registered_types.lock().unwrap().push((
            keyspace.into(),
            type_name.into(),
            descriptor.rust_type().into(),
        ));
        Ok(())
    }
}

/// Session answering every statement with a single row naming its first host.
pub struct FakeSession {
    cluster: Arc<FakeCluster>,
    row_shape: Mutex<RowShape>,
    executed: Mutex<Vec<ExecutedStatement>>,
}

impl FakeSession {
    pub fn new(cluster: Arc<FakeCluster>, row_shape: RowShape) -> Self {
        FakeSession {
            cluster,
            row_shape: Mutex::new(row_shape),
            executed: Mutex::new(vec![]),
        }
    }

    pub fn fake_cluster(&self) -> &Arc<FakeCluster> {
        &self.cluster
    }

    pub fn executed(&self) -> Vec<ExecutedStatement> {
        self.executed.lock().unwrap().clone()
    }
}

impl Session for FakeSession {
    fn row_shape(&self) -> RowShape {
        *self.row_shape.lock().unwrap()
    }

    fn set_row_shape(&self, row_shape: RowShape) {
        *self.row_shape.lock().unwrap() = row_shape;
    }

    fn cluster(&self) -> Arc<dyn Cluster> {
        self.cluster.clone()
    }

    fn execute(
        &self,
        statement: Statement,
        values: QueryValues,
        timeout: Option<Duration>,
        tracing: bool,
    ) -> BoxFuture<'_, Result<ResultSet>> {
        self.executed.lock().unwrap().push(ExecutedStatement {
            statement,
            values,
            timeout,
            tracing,
        });

        let host = self.cluster.hosts.first().cloned().unwrap_or_default();
        async move {
            Ok(ResultSet::new(vec![
                hashmap! { "host".to_string() => Value::new(host) },
            ]))
        }
        .boxed()
    }
}

/// In-memory driver connector counting connection attempts.
pub struct FakeConnector {
    reachable: AtomicBool,
    connect_attempts: AtomicUsize,
    connect_delay: Option<Duration>,
    keyspaces: HashSet<String>,
    sessions: Mutex<Vec<Arc<FakeSession>>>,
}

impl FakeConnector {
    /// Reachable connector whose clusters contain given keyspaces.
    pub fn new(keyspaces: &[&str]) -> Self {
        FakeConnector {
            reachable: AtomicBool::new(true),
            connect_attempts: AtomicUsize::new(0),
            connect_delay: None,
            keyspaces: keyspaces.iter().map(|keyspace| keyspace.to_string()).collect(),
            sessions: Mutex::new(vec![]),
        }
    }

    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn connect_attempts(&self) -> usize {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    /// Sessions created so far, in creation order.
    pub fn sessions(&self) -> Vec<Arc<FakeSession>> {
        self.sessions.lock().unwrap().clone()
    }

    /// Total number of statements executed on all sessions.
    pub fn executed_count(&self) -> usize {
        self.sessions()
            .iter()
            .map(|session| session.executed().len())
            .sum()
    }

    /// Session built outside of the connector, e.g. for `set_session`.
    pub fn external_session(&self, hosts: &[&str], row_shape: RowShape) -> Arc<FakeSession> {
        let cluster = Arc::new(FakeCluster::new(
            hosts.iter().map(|host| host.to_string()).collect(),
            self.keyspaces.clone(),
        ));

        Arc::new(FakeSession::new(cluster, row_shape))
    }
}

impl ClusterConnector for FakeConnector {
    fn connect<'a>(
        &'a self,
        hosts: &'a [String],
        _options: &'a ConnectionOptions,
    ) -> BoxFuture<'a, Result<ConnectedCluster>> {
        async move {
            self.connect_attempts.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.connect_delay {
                tokio::time::sleep(delay).await;
            }

            if !self.reachable.load(Ordering::SeqCst) {
                return Err(Error::ConnectionUnavailable {
                    hosts: hosts.join(","),
                    reason: "connection refused".into(),
                });
            }

            let cluster = Arc::new(FakeCluster::new(hosts.to_vec(), self.keyspaces.clone()));
            let session = Arc::new(FakeSession::new(cluster.clone(), RowShape::Positional));
            self.sessions.lock().unwrap().push(session.clone());

            Ok(ConnectedCluster::new(cluster, session))
        }
        .boxed()
    }
}

pub fn hosts(hosts: &[&str]) -> Vec<String> {
    hosts.iter().map(|host| host.to_string()).collect()
}
