use std::sync::Arc;

use arc_swap::ArcSwap;
use derive_more::Constructor;
use tracing::*;

use crate::cluster::Cluster;
use crate::error::Result;
use crate::types::UdtDescriptor;

/// User-defined type mapping waiting to be registered with clusters.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct UdtRegistration {
    keyspace: String,
    type_name: String,
    descriptor: Arc<UdtDescriptor>,
}

impl UdtRegistration {
    #[inline]
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Registers this mapping with given cluster. A type which doesn't exist yet is not an
    /// error, since schema synchronization creates it later.
    pub fn register_with(&self, cluster: &dyn Cluster) -> Result<()> {
        let result =
            cluster.register_user_type(&self.keyspace, &self.type_name, self.descriptor.clone());

        match result {
            Err(error) if error.is_deferred_type_error() => {
                debug!(
                    keyspace = %self.keyspace,
                    type_name = %self.type_name,
                    "User type not present in cluster yet; deferring registration."
                );
                Ok(())
            }
            result => result,
        }
    }
}

/// Keeps user-defined type mappings independently of any connection, so they can be replayed
/// against every newly established cluster. Mappings are kept in registration order.
#[derive(Debug)]
pub struct TypeRegistry {
    registrations: ArcSwap<Vec<UdtRegistration>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry {
            registrations: ArcSwap::from_pointee(vec![]),
        }
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Stores a mapping. Registering an already known `(keyspace, type_name)` pair replaces its
    /// descriptor but keeps its position.
    pub fn insert(
        &self,
        keyspace: &str,
        type_name: &str,
        descriptor: Arc<UdtDescriptor>,
    ) -> UdtRegistration {
        let registration = UdtRegistration::new(keyspace.into(), type_name.into(), descriptor);

        self.registrations.rcu(|registrations| {
            let mut registrations = Vec::clone(registrations);
            match registrations.iter_mut().find(|existing| {
                existing.keyspace == registration.keyspace
                    && existing.type_name == registration.type_name
            }) {
                Some(existing) => existing.descriptor = registration.descriptor.clone(),
                None => registrations.push(registration.clone()),
            }

            registrations
        });

        registration
    }

    /// Replays all known mappings against a cluster. Each mapping is attempted regardless of
    /// failures of the previous ones; the first non-deferred error is returned afterwards.
    pub fn register_known_types(&self, cluster: &dyn Cluster) -> Result<()> {
        let mut first_error = None;

        for registration in self.registrations.load().iter() {
            if let Err(error) = registration.register_with(cluster) {
                warn!(
                    %error,
                    keyspace = %registration.keyspace,
                    type_name = %registration.type_name,
                    "Error registering user type."
                );

                first_error.get_or_insert(error);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    pub fn get(&self, keyspace: &str, type_name: &str) -> Option<Arc<UdtDescriptor>> {
        self.registrations
            .load()
            .iter()
            .find(|registration| {
                registration.keyspace == keyspace && registration.type_name == type_name
            })
            .map(|registration| registration.descriptor.clone())
    }

    /// Snapshot of all registrations, in registration order.
    pub fn registrations(&self) -> Vec<UdtRegistration> {
        Vec::clone(&self.registrations.load())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registrations.load().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
