use std::collections::BTreeMap;

use cassandra_protocol::consistency::Consistency;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};

/// Contact point used by
/// [`ConnectionContext::default_connection`](crate::ConnectionContext::default_connection).
pub const DEFAULT_CONTACT_POINT: &str = "127.0.0.1:9042";

const CREDENTIAL_OPTIONS: [&str; 2] = ["username", "password"];

/// Pass-through options for the underlying driver connector.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionOptions(Map<String, JsonValue>);

impl ConnectionOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds an option, replacing a previous value with the same name.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(name.into(), value.into());
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.0.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Credentials belong to the driver's authenticator provider and are rejected here.
    pub fn ensure_no_credentials(&self) -> Result<()> {
        if CREDENTIAL_OPTIONS.iter().any(|name| self.contains(name)) {
            return Err(Error::InlineCredentials);
        }

        Ok(())
    }
}

impl From<Map<String, JsonValue>> for ConnectionOptions {
    fn from(options: Map<String, JsonValue>) -> Self {
        ConnectionOptions(options)
    }
}

/// Single session connection configuration, consumed by
/// [`ConnectionContext::setup`](crate::ConnectionContext::setup).
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionConfig {
    hosts: Vec<String>,
    default_keyspace: String,
    consistency: Consistency,
    lazy_connect: bool,
    retry_connect: bool,
    force_replace: bool,
    options: ConnectionOptions,
}

impl ConnectionConfig {
    #[inline]
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    #[inline]
    pub fn default_keyspace(&self) -> &str {
        &self.default_keyspace
    }

    #[inline]
    pub fn consistency(&self) -> Consistency {
        self.consistency
    }

    /// Should connecting be deferred until first use.
    #[inline]
    pub fn lazy_connect(&self) -> bool {
        self.lazy_connect
    }

    /// Should a failed connection be attempted again on next use.
    #[inline]
    pub fn retry_connect(&self) -> bool {
        self.retry_connect
    }

    /// May this configuration replace an already active connection.
    #[inline]
    pub fn force_replace(&self) -> bool {
        self.force_replace
    }

    #[inline]
    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    pub(crate) fn into_eager(mut self) -> Self {
        self.lazy_connect = false;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.options.ensure_no_credentials()?;

        if self.hosts.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one contact point is required".into(),
            ));
        }

        Ok(())
    }
}

/// Builder structure that helps to configure a single session connection.
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    /// Creates a builder with `One` as default consistency, connecting eagerly without retries.
    pub fn new(default_keyspace: impl Into<String>) -> Self {
        ConnectionConfigBuilder {
            config: ConnectionConfig {
                hosts: vec![],
                default_keyspace: default_keyspace.into(),
                consistency: Consistency::One,
                lazy_connect: false,
                retry_connect: false,
                force_replace: false,
                options: Default::default(),
            },
        }
    }

    /// Adds a contact point.
    pub fn with_contact_point(mut self, host: impl Into<String>) -> Self {
        self.config.hosts.push(host.into());
        self
    }

    /// Adds multiple contact points.
    pub fn with_contact_points<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.hosts.extend(hosts.into_iter().map(Into::into));
        self
    }

    /// Sets default consistency for queries without explicit one.
    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.config.consistency = consistency;
        self
    }

    pub fn with_lazy_connect(mut self, lazy_connect: bool) -> Self {
        self.config.lazy_connect = lazy_connect;
        self
    }

    pub fn with_retry_connect(mut self, retry_connect: bool) -> Self {
        self.config.retry_connect = retry_connect;
        self
    }

    pub fn with_force_replace(mut self, force_replace: bool) -> Self {
        self.config.force_replace = force_replace;
        self
    }

    /// Adds a driver option.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.config.options.insert(name, value);
        self
    }

    /// Replaces all driver options.
    pub fn with_options(mut self, options: ConnectionOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Finalizes building process
    pub fn build(self) -> ConnectionConfig {
        self.config
    }
}

/// Multi-session configuration: cluster name -> keyspace -> contact points.
///
/// ```
/// use cdrs_tokio_connection::config::ConnectionsConfig;
///
/// let config = ConnectionsConfig::from_json(
///     r#"{ "main": { "accounts": ["10.0.0.1:9042"], "events": ["10.0.0.2:9042"] } }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionsConfig(BTreeMap<String, BTreeMap<String, Vec<String>>>);

impl ConnectionsConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Parses configuration from JSON object of the form
    /// `{ "<cluster>": { "<keyspace>": ["<host>", ...] } }`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|error| Error::InvalidConfig(error.to_string()))
    }

    /// Adds a connection for given cluster and keyspace.
    pub fn with_connection<I, S>(
        mut self,
        cluster_name: impl Into<String>,
        keyspace: impl Into<String>,
        hosts: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(cluster_name.into())
            .or_default()
            .insert(keyspace.into(), hosts.into_iter().map(Into::into).collect());
        self
    }

    /// Iterates over `(cluster name, keyspace, hosts)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.0.iter().flat_map(|(cluster_name, keyspaces)| {
            keyspaces.iter().map(move |(keyspace, hosts)| {
                (cluster_name.as_str(), keyspace.as_str(), hosts.as_slice())
            })
        })
    }

    /// Number of configured connections.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
