use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use cassandra_protocol::consistency::Consistency;

/// Holds the settings applied to statements which don't specify their own.
#[derive(Debug)]
pub(crate) struct ContextDefaults {
    keyspace: ArcSwapOption<String>,
    consistency: ArcSwap<Consistency>,
}

impl Default for ContextDefaults {
    fn default() -> Self {
        ContextDefaults {
            keyspace: ArcSwapOption::empty(),
            consistency: ArcSwap::from_pointee(Consistency::One),
        }
    }
}

impl ContextDefaults {
    #[inline]
    pub(crate) fn keyspace(&self) -> Option<Arc<String>> {
        self.keyspace.load().clone()
    }

    #[inline]
    pub(crate) fn consistency(&self) -> Consistency {
        **self.consistency.load()
    }

    pub(crate) fn update(&self, keyspace: &str, consistency: Consistency) {
        self.keyspace.store(Some(Arc::new(keyspace.to_string())));
        self.consistency.store(Arc::new(consistency));
    }
}
