use std::result;

use thiserror::Error as ThisError;

use crate::cluster::{ConnectionKey, RowShape};

pub type Result<T> = result::Result<T, Error>;

/// Connection layer error. Configuration errors (see [`Error::is_configuration`]) are caused by
/// the way the layer is used and never go away by retrying, while
/// [`Error::ConnectionUnavailable`] and driver errors may be transient.
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// Credentials were passed as plain connection options.
    #[error("username & password are handled by the native driver's authenticator provider, not by connection options")]
    InlineCredentials,
    /// Session returns rows in a shape other than named rows.
    #[error("Failed to initialize: session row shape must be {expected}, got {actual}")]
    RowShapeMismatch {
        expected: RowShape,
        actual: RowShape,
    },
    /// No connection has been set up yet.
    #[error("Not configured: {0}")]
    NotConfigured(String),
    /// A connection is already active and replacing it was not requested.
    #[error("A connection is already configured; close it or force replacement first")]
    AlreadyConfigured,
    /// Multi-session execution requires a connection key.
    #[error("A connection key is required when multiple sessions are configured")]
    MissingConnectionKey,
    /// Invalid configuration data.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// None of the given hosts could be reached.
    #[error("Unable to connect to any of the hosts [{hosts}]: {reason}")]
    ConnectionUnavailable { hosts: String, reason: String },
    /// No session is registered for given key.
    #[error("No session found for the given connection key: {0}")]
    ConnectionNotFound(ConnectionKey),
    /// The keyspace or type of a user-defined type does not exist (yet).
    #[error("User type {keyspace}.{type_name} does not exist")]
    UserTypeDoesNotExist { keyspace: String, type_name: String },
    /// Error returned by the underlying driver.
    #[error(transparent)]
    Driver(#[from] cassandra_protocol::Error),
}

impl Error {
    /// Is this an error caused by illegal options or usage of an unconfigured context.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InlineCredentials
                | Error::RowShapeMismatch { .. }
                | Error::NotConfigured(_)
                | Error::AlreadyConfigured
                | Error::MissingConnectionKey
                | Error::InvalidConfig(_)
        )
    }

    /// Might retrying the operation at a later time succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::ConnectionUnavailable { .. } | Error::Driver(_))
    }

    /// Is this a missing user type, which schema synchronization is expected to create later.
    #[inline]
    pub fn is_deferred_type_error(&self) -> bool {
        matches!(self, Error::UserTypeDoesNotExist { .. })
    }
}
