use std::sync::Arc;

use derivative::Derivative;
use derive_more::Constructor;
use futures::future::BoxFuture;

use crate::cluster::{Cluster, Session};
use crate::config::ConnectionOptions;
use crate::error::Result;

/// Freshly established cluster handle together with its session.
#[derive(Clone, Constructor, Derivative)]
#[derivative(Debug)]
pub struct ConnectedCluster {
    #[derivative(Debug = "ignore")]
    pub cluster: Arc<dyn Cluster>,
    #[derivative(Debug = "ignore")]
    pub session: Arc<dyn Session>,
}

/// Establishes connections to clusters. This is the entry point into the underlying driver.
pub trait ClusterConnector: Send + Sync {
    /// Connects to a cluster using given contact points and driver options. Fails with
    /// [`Error::ConnectionUnavailable`](crate::Error::ConnectionUnavailable) if none of the
    /// hosts can be reached.
    fn connect<'a>(
        &'a self,
        hosts: &'a [String],
        options: &'a ConnectionOptions,
    ) -> BoxFuture<'a, Result<ConnectedCluster>>;
}
