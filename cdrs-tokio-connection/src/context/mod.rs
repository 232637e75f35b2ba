mod defaults;
mod lazy_connect;

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use cassandra_protocol::consistency::Consistency;
use derivative::Derivative;
use tracing::*;

use crate::cluster::{
    Cluster, ClusterConnector, ConnectedCluster, ConnectionKey, ResultSet, Session,
    SessionFactory, SessionManager,
};
use crate::config::{
    ConnectionConfig, ConnectionOptions, ConnectionsConfig, DEFAULT_CONTACT_POINT,
};
use crate::context::defaults::ContextDefaults;
use crate::context::lazy_connect::{LazyConnectGuard, LazyConnector};
use crate::error::{Error, Result};
use crate::statement::{ExecuteOptions, Query};
use crate::types::{TypeRegistry, UdtDescriptor};

/// Connection state: either a single session or a set of keyed sessions.
#[derive(Debug)]
enum ActiveConnection {
    Single(ConnectedCluster),
    Managed(SessionManager),
}

/// Owns the connection state used to execute statements: the active session (or sessions),
/// default consistency and keyspace, deferred connection arguments and the user-defined types
/// to register with every new cluster.
///
/// The active state is swapped as a whole, so readers never observe a cluster without its
/// session. Changes of the active state are serialized, while executing statements only reads
/// a snapshot.
///
/// ```no_run
/// use cdrs_tokio_connection::cluster::ClusterConnector;
/// use cdrs_tokio_connection::config::ConnectionConfigBuilder;
/// use cdrs_tokio_connection::statement::ExecuteOptions;
/// use cdrs_tokio_connection::ConnectionContext;
/// use std::sync::Arc;
///
/// async fn run(connector: Arc<dyn ClusterConnector>) -> cdrs_tokio_connection::Result<()> {
///     let context = ConnectionContext::new(connector);
///     context
///         .setup(
///             ConnectionConfigBuilder::new("test_ks")
///                 .with_contact_point("127.0.0.1:9042")
///                 .with_lazy_connect(true)
///                 .build(),
///         )
///         .await?;
///
///     let rows = context
///         .execute("SELECT * FROM users", ExecuteOptions::new())
///         .await?;
///     println!("{} rows", rows.len());
///     Ok(())
/// }
/// ```
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ConnectionContext {
    #[derivative(Debug = "ignore")]
    factory: SessionFactory,
    active: ArcSwapOption<ActiveConnection>,
    defaults: ContextDefaults,
    lazy_connect: LazyConnector,
}

impl ConnectionContext {
    /// Creates an empty context with its own type registry.
    pub fn new(connector: Arc<dyn ClusterConnector>) -> Self {
        Self::with_type_registry(connector, Default::default())
    }

    /// Creates an empty context sharing given type registry.
    pub fn with_type_registry(
        connector: Arc<dyn ClusterConnector>,
        type_registry: Arc<TypeRegistry>,
    ) -> Self {
        ConnectionContext {
            factory: SessionFactory::new(connector, type_registry),
            active: ArcSwapOption::empty(),
            defaults: Default::default(),
            lazy_connect: Default::default(),
        }
    }

    /// Connects to the local node at [`DEFAULT_CONTACT_POINT`] using driver defaults.
    pub async fn default_connection(&self) -> Result<()> {
        let mut lazy_connect = self.lazy_connect.lock().await;
        self.ensure_replaceable(&lazy_connect, false)?;

        let connected = self
            .factory
            .create(&[DEFAULT_CONTACT_POINT.to_string()], &ConnectionOptions::new())
            .await?;

        self.install(ActiveConnection::Single(connected), &mut lazy_connect);
        debug!("Connection initialized with default session to localhost.");

        Ok(())
    }

    /// Uses an externally created session. The session must return named rows.
    pub async fn set_session(&self, session: Arc<dyn Session>) -> Result<()> {
        let mut lazy_connect = self.lazy_connect.lock().await;
        self.ensure_replaceable(&lazy_connect, false)?;

        let connected = self.factory.adopt(session)?;

        self.install(ActiveConnection::Single(connected), &mut lazy_connect);
        debug!("Connection initialized with external session.");

        Ok(())
    }

    /// Sets up a single session connection. Depending on the configuration, connecting is
    /// deferred until first use and/or re-attempted on first use after a failure; the failure
    /// itself is always returned.
    pub async fn setup(&self, config: ConnectionConfig) -> Result<()> {
        config.validate()?;

        let mut lazy_connect = self.lazy_connect.lock().await;
        self.ensure_replaceable(&lazy_connect, config.force_replace())?;

        self.defaults.update(config.default_keyspace(), config.consistency());

        if config.lazy_connect() {
            debug!(keyspace = config.default_keyspace(), "Deferring connection until first use.");
            lazy_connect.arm(config);
            return Ok(());
        }

        self.connect_single(config, &mut lazy_connect).await
    }

    /// Replaces the active connection with a set of keyed sessions, one for every entry of
    /// `connections`. If any connection fails, the previous state is left intact.
    pub async fn setup_connections(
        &self,
        connections: &ConnectionsConfig,
        options: ConnectionOptions,
    ) -> Result<()> {
        options.ensure_no_credentials()?;

        let mut lazy_connect = self.lazy_connect.lock().await;
        self.ensure_replaceable(&lazy_connect, false)?;

        let mut manager = SessionManager::new(self.factory.clone(), options);
        for (cluster_name, keyspace, hosts) in connections.iter() {
            manager.add_connection(hosts, keyspace, cluster_name).await?;
        }

        debug!(sessions = manager.len(), "Multiple session connection initialized.");
        self.install(ActiveConnection::Managed(manager), &mut lazy_connect);

        Ok(())
    }

    /// Adds a keyed session. Starts multi-session mode if nothing is active.
    pub async fn add_connection(
        &self,
        hosts: &[String],
        keyspace: &str,
        cluster_name: &str,
    ) -> Result<ConnectionKey> {
        let mut lazy_connect = self.lazy_connect.lock().await;
        if lazy_connect.is_pending() {
            return Err(Error::AlreadyConfigured);
        }

        let active = self.active.load_full();
        let mut manager = match active.as_deref() {
            Some(ActiveConnection::Managed(manager)) => manager.clone(),
            Some(ActiveConnection::Single(_)) => return Err(Error::AlreadyConfigured),
            None => SessionManager::new(self.factory.clone(), ConnectionOptions::new()),
        };

        let key = manager.add_connection(hosts, keyspace, cluster_name).await?;
        self.install(ActiveConnection::Managed(manager), &mut lazy_connect);

        Ok(key)
    }

    /// Drops the active connection and any deferred connection arguments. Returns `true` if
    /// there was anything to drop.
    pub async fn close(&self) -> bool {
        let mut lazy_connect = self.lazy_connect.lock().await;
        let was_pending = lazy_connect.clear();
        let was_active = self.active.swap(None).is_some();

        debug!(was_active, was_pending, "Connection closed.");
        was_active || was_pending
    }

    /// Executes a query on the active session. In multi-session mode `options` need to contain
    /// the connection key of the target session.
    pub async fn execute<Q: Into<Query>>(
        &self,
        query: Q,
        options: ExecuteOptions,
    ) -> Result<ResultSet> {
        let query = query.into();
        self.handle_lazy_connect().await?;

        let active = self.active.load_full().ok_or_else(|| {
            Error::NotConfigured(
                "it is required to set up a connection before executing queries".into(),
            )
        })?;

        let consistency = options
            .consistency
            .unwrap_or_else(|| self.defaults.consistency());
        let (statement, values) = query.normalize(consistency, options.values);

        debug!(query = statement.query(), "Executing statement.");

        match active.as_ref() {
            ActiveConnection::Single(connected) => {
                connected
                    .session
                    .execute(statement, values, options.timeout, options.tracing)
                    .await
            }
            ActiveConnection::Managed(manager) => {
                let connection_key = options
                    .connection_key
                    .as_ref()
                    .ok_or(Error::MissingConnectionKey)?;

                manager
                    .execute(
                        statement,
                        values,
                        options.timeout,
                        options.tracing,
                        connection_key,
                    )
                    .await
            }
        }
    }

    /// Returns the single active session, connecting first if the connection was deferred.
    pub async fn get_session(&self) -> Result<Arc<dyn Session>> {
        self.handle_lazy_connect().await?;

        match self.active.load_full().as_deref() {
            Some(ActiveConnection::Single(connected)) => Ok(connected.session.clone()),
            Some(ActiveConnection::Managed(_)) => Err(Error::NotConfigured(
                "multiple sessions are configured; a connection key is required".into(),
            )),
            None => Err(Error::NotConfigured(
                "it is required to set up a connection first".into(),
            )),
        }
    }

    /// Returns the cluster of the single active session.
    pub fn cluster(&self) -> Option<Arc<dyn Cluster>> {
        match self.active.load().as_deref() {
            Some(ActiveConnection::Single(connected)) => Some(connected.cluster.clone()),
            _ => None,
        }
    }

    /// Returns the cluster for given name and keyspace in multi-session mode.
    pub fn get_cluster(&self, cluster_name: &str, keyspace: &str) -> Result<Arc<dyn Cluster>> {
        match self.active.load().as_deref() {
            Some(ActiveConnection::Managed(manager)) => manager.get_cluster(cluster_name, keyspace),
            _ => Err(Error::NotConfigured(
                "cluster is not configured; set up multiple sessions first".into(),
            )),
        }
    }

    /// Snapshot of the session manager in multi-session mode.
    pub fn session_manager(&self) -> Option<SessionManager> {
        match self.active.load().as_deref() {
            Some(ActiveConnection::Managed(manager)) => Some(manager.clone()),
            _ => None,
        }
    }

    /// Registers a user-defined type mapping. It gets registered with all active clusters right
    /// away and with every cluster connected later. A type missing from a cluster is not an
    /// error, since schema synchronization is expected to create it.
    ///
    /// Waits for connection changes in progress, so clusters being connected at the same time
    /// receive the mapping as well.
    pub async fn register_udt(
        &self,
        keyspace: &str,
        type_name: &str,
        descriptor: UdtDescriptor,
    ) -> Result<()> {
        let _lazy_connect = self.lazy_connect.lock().await;

        let registration = self
            .factory
            .type_registry()
            .insert(keyspace, type_name, Arc::new(descriptor));

        match self.active.load().as_deref() {
            Some(ActiveConnection::Single(connected)) => {
                registration.register_with(connected.cluster.as_ref())
            }
            Some(ActiveConnection::Managed(manager)) => manager.register_user_type(&registration),
            None => Ok(()),
        }
    }

    /// Consistency used for statements without an explicit one.
    #[inline]
    pub fn default_consistency(&self) -> Consistency {
        self.defaults.consistency()
    }

    /// Keyspace given to the last [`setup`](Self::setup).
    #[inline]
    pub fn default_keyspace(&self) -> Option<Arc<String>> {
        self.defaults.keyspace()
    }

    #[inline]
    pub fn is_configured(&self) -> bool {
        self.active.load().is_some()
    }

    /// Is a connection waiting to be established on first use.
    #[inline]
    pub fn is_lazy_connect_pending(&self) -> bool {
        self.lazy_connect.is_armed()
    }

    #[inline]
    pub fn type_registry(&self) -> &Arc<TypeRegistry> {
        self.factory.type_registry()
    }

    /// Establishes a deferred connection, if there is one. Concurrent callers wait for the
    /// first one, which makes the only attempt; if it fails, the waiting callers get its error
    /// and the next attempt is left to later calls.
    pub async fn handle_lazy_connect(&self) -> Result<()> {
        if !self.lazy_connect.is_armed() {
            return Ok(());
        }

        let seen_resolutions = self.lazy_connect.resolutions();

        let mut lazy_connect = self.lazy_connect.lock().await;
        if let Some(error) = lazy_connect.failure_since(seen_resolutions) {
            return Err(error);
        }

        if let Some(config) = lazy_connect.take() {
            debug!("Lazy connect.");

            let result = self.connect_single(config, &mut lazy_connect).await;
            lazy_connect.finish_resolution(&result);
            result?;
        }

        Ok(())
    }

    async fn connect_single(
        &self,
        config: ConnectionConfig,
        lazy_connect: &mut LazyConnectGuard<'_>,
    ) -> Result<()> {
        match self.factory.create(config.hosts(), config.options()).await {
            Ok(connected) => {
                if self.is_configured() {
                    warn!("Configuring new connection when one was already set.");
                }

                self.install(ActiveConnection::Single(connected), lazy_connect);
                debug!("Connection initialized with internally created session.");

                Ok(())
            }
            Err(error @ Error::ConnectionUnavailable { .. }) if config.retry_connect() => {
                warn!(%error, "Connect failed, setting up for re-attempt on first use.");
                lazy_connect.arm(config);

                Err(error)
            }
            Err(error) => Err(error),
        }
    }

    fn ensure_replaceable(
        &self,
        lazy_connect: &LazyConnectGuard<'_>,
        force_replace: bool,
    ) -> Result<()> {
        if (self.is_configured() || lazy_connect.is_pending()) && !force_replace {
            return Err(Error::AlreadyConfigured);
        }

        Ok(())
    }

    fn install(&self, active: ActiveConnection, lazy_connect: &mut LazyConnectGuard<'_>) {
        lazy_connect.clear();
        self.active.store(Some(Arc::new(active)));
    }
}
