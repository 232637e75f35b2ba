use derive_more::{Constructor, Display};

/// Identifies a session in multi-session mode. Keys are compared field by field; the display
/// form `<cluster_name>__<keyspace>` is meant for humans only.
#[derive(Clone, Debug, Constructor, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{cluster_name}__{keyspace}")]
pub struct ConnectionKey {
    cluster_name: String,
    keyspace: String,
}

impl ConnectionKey {
    #[inline]
    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    #[inline]
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }
}

/// Returns the key under which the session for given cluster and keyspace is registered.
pub fn get_connection_key(
    cluster_name: impl Into<String>,
    keyspace: impl Into<String>,
) -> ConnectionKey {
    ConnectionKey::new(cluster_name.into(), keyspace.into())
}
