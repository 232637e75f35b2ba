use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::{Mutex, MutexGuard};

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct LazySlot {
    pending: Option<ConnectionConfig>,
    // hosts and reason of the last failed resolution
    last_failure: Option<(String, String)>,
}

/// Guards connection state changes and keeps the arguments of a deferred connection. Every
/// change of the active connection happens while holding the lock, so deferred arguments are
/// resolved by exactly one caller.
#[derive(Debug, Default)]
pub(crate) struct LazyConnector {
    armed: AtomicBool,
    resolutions: AtomicU64,
    slot: Mutex<LazySlot>,
}

impl LazyConnector {
    /// Cheap check whether a deferred connection is waiting, without taking the lock.
    #[inline]
    pub(crate) fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Number of finished resolution attempts. Callers read it before waiting for the lock to
    /// find out whether an attempt finished in the meantime.
    #[inline]
    pub(crate) fn resolutions(&self) -> u64 {
        self.resolutions.load(Ordering::Acquire)
    }

    pub(crate) async fn lock(&self) -> LazyConnectGuard<'_> {
        LazyConnectGuard {
            slot: self.slot.lock().await,
            armed: &self.armed,
            resolutions: &self.resolutions,
        }
    }
}

pub(crate) struct LazyConnectGuard<'a> {
    slot: MutexGuard<'a, LazySlot>,
    armed: &'a AtomicBool,
    resolutions: &'a AtomicU64,
}

impl LazyConnectGuard<'_> {
    /// Stores arguments for a connection attempt on next use.
    pub(crate) fn arm(&mut self, config: ConnectionConfig) {
        self.slot.pending = Some(config.into_eager());
        self.slot.last_failure = None;
    }

    #[inline]
    pub(crate) fn is_pending(&self) -> bool {
        self.slot.pending.is_some()
    }

    /// Takes the stored arguments. The connector is reported as armed until the guard is
    /// dropped, so callers arriving meanwhile wait for the outcome.
    pub(crate) fn take(&mut self) -> Option<ConnectionConfig> {
        self.slot.pending.take()
    }

    pub(crate) fn clear(&mut self) -> bool {
        self.slot.last_failure = None;
        self.take().is_some()
    }

    /// Records the outcome of a resolution attempt.
    pub(crate) fn finish_resolution(&mut self, result: &Result<()>) {
        self.slot.last_failure = match result {
            Err(Error::ConnectionUnavailable { hosts, reason }) => {
                Some((hosts.clone(), reason.clone()))
            }
            _ => None,
        };

        self.resolutions.fetch_add(1, Ordering::AcqRel);
    }

    /// Failure of an attempt which finished after `seen_resolutions` was read.
    pub(crate) fn failure_since(&self, seen_resolutions: u64) -> Option<Error> {
        if self.resolutions.load(Ordering::Acquire) == seen_resolutions {
            return None;
        }

        self.slot
            .last_failure
            .as_ref()
            .map(|(hosts, reason)| Error::ConnectionUnavailable {
                hosts: hosts.clone(),
                reason: reason.clone(),
            })
    }
}

impl Drop for LazyConnectGuard<'_> {
    fn drop(&mut self) {
        self.armed.store(self.slot.pending.is_some(), Ordering::Release);
    }
}
