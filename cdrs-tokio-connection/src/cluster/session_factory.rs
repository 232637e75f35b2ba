use std::sync::Arc;

use derivative::Derivative;
use derive_more::Constructor;
use itertools::Itertools;
use tracing::*;

use crate::cluster::{ClusterConnector, ConnectedCluster, RowShape, Session};
use crate::config::ConnectionOptions;
use crate::error::{Error, Result};
use crate::types::TypeRegistry;

/// Row shape every session managed by the connection layer must use.
pub(crate) const REQUIRED_ROW_SHAPE: RowShape = RowShape::Named;

/// Opens new cluster connections and prepares them for use: enforces the row shape and
/// replays known user-defined types.
#[derive(Clone, Constructor, Derivative)]
#[derivative(Debug)]
pub struct SessionFactory {
    #[derivative(Debug = "ignore")]
    connector: Arc<dyn ClusterConnector>,
    type_registry: Arc<TypeRegistry>,
}

impl SessionFactory {
    /// Connects to given hosts.
    pub async fn create(
        &self,
        hosts: &[String],
        options: &ConnectionOptions,
    ) -> Result<ConnectedCluster> {
        options.ensure_no_credentials()?;

        debug!(hosts = %hosts.iter().join(","), "Establishing new cluster connection.");

        let connected = self.connector.connect(hosts, options).await?;
        connected.session.set_row_shape(REQUIRED_ROW_SHAPE);

        self.type_registry
            .register_known_types(connected.cluster.as_ref())?;

        Ok(connected)
    }

    /// Adopts an externally created session. The session must already return named rows.
    pub fn adopt(&self, session: Arc<dyn Session>) -> Result<ConnectedCluster> {
        let row_shape = session.row_shape();
        if row_shape != REQUIRED_ROW_SHAPE {
            return Err(Error::RowShapeMismatch {
                expected: REQUIRED_ROW_SHAPE,
                actual: row_shape,
            });
        }

        let cluster = session.cluster();
        self.type_registry.register_known_types(cluster.as_ref())?;

        Ok(ConnectedCluster::new(cluster, session))
    }

    #[inline]
    pub fn type_registry(&self) -> &Arc<TypeRegistry> {
        &self.type_registry
    }
}
