//! **cdrs-tokio-connection** is a connection management layer for Cassandra drivers.
//!
//! It sits between an application and the driver and takes care of:
//!
//! * deferring the connection until first use, optionally retrying a failed connection on the
//!   next use,
//! * keeping multiple sessions for different clusters and keyspaces, routed by
//!   [`ConnectionKey`](crate::cluster::ConnectionKey),
//! * remembering user-defined type mappings declared before any connection exists and
//!   registering them with every cluster connected later.
//!
//! The driver itself is plugged in through the traits in the [`cluster`] module.
//!
//! ## Getting started
//!
//! ```no_run
//! use cdrs_tokio_connection::cluster::ClusterConnector;
//! use cdrs_tokio_connection::config::ConnectionConfigBuilder;
//! use cdrs_tokio_connection::consistency::Consistency;
//! use cdrs_tokio_connection::statement::ExecuteOptions;
//! use cdrs_tokio_connection::types::UdtDescriptor;
//! use cdrs_tokio_connection::ConnectionContext;
//! use std::sync::Arc;
//!
//! async fn run(connector: Arc<dyn ClusterConnector>) -> cdrs_tokio_connection::Result<()> {
//!     let context = ConnectionContext::new(connector);
//!
//!     context
//!         .register_udt(
//!             "test_ks",
//!             "address",
//!             UdtDescriptor::new("Address").with_field("street", "text"),
//!         )
//!         .await?;
//!
//!     context
//!         .setup(
//!             ConnectionConfigBuilder::new("test_ks")
//!                 .with_contact_point("127.0.0.1:9042")
//!                 .with_consistency(Consistency::Quorum)
//!                 .with_retry_connect(true)
//!                 .build(),
//!         )
//!         .await?;
//!
//!     context
//!         .execute("SELECT * FROM test_ks.users", ExecuteOptions::new())
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod cluster;
pub mod config;
mod context;
pub mod error;
pub mod statement;
pub mod types;

pub use cassandra_protocol::consistency;
pub use cassandra_protocol::query::QueryValues;
pub use cassandra_protocol::types::value::Value;

pub use crate::cluster::get_connection_key;
pub use crate::context::ConnectionContext;

pub type Error = error::Error;
pub type Result<T> = error::Result<T>;
