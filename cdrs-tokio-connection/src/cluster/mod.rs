use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

mod connection_key;
mod connector;
mod session;
mod session_factory;
mod session_manager;

pub use crate::cluster::connection_key::{get_connection_key, ConnectionKey};
pub use crate::cluster::connector::{ClusterConnector, ConnectedCluster};
pub use crate::cluster::session::{ResultSet, Row, RowShape, Session};
pub use crate::cluster::session_factory::SessionFactory;
pub use crate::cluster::session_manager::SessionManager;

use crate::error::Result;
use crate::types::UdtDescriptor;

/// Connection pool and topology handle a [`Session`] is derived from. Provided by the
/// underlying driver.
#[cfg_attr(test, automock)]
pub trait Cluster: Send + Sync {
    /// Registers a user-defined type mapping, so rows containing it can be decoded. Fails with
    /// [`Error::UserTypeDoesNotExist`](crate::Error::UserTypeDoesNotExist) if the keyspace or
    /// type are not present in the cluster schema.
    fn register_user_type(
        &self,
        keyspace: &str,
        type_name: &str,
        descriptor: Arc<UdtDescriptor>,
    ) -> Result<()>;
}
