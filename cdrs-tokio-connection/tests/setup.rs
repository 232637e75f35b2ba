mod common;

use std::sync::Arc;
use std::time::Duration;

use cdrs_tokio_connection::cluster::{RowShape, Session};
use cdrs_tokio_connection::config::{
    ConnectionConfigBuilder, ConnectionOptions, ConnectionsConfig, DEFAULT_CONTACT_POINT,
};
use cdrs_tokio_connection::consistency::Consistency;
use cdrs_tokio_connection::statement::{ExecuteOptions, Statement};
use cdrs_tokio_connection::types::UdtDescriptor;
use cdrs_tokio_connection::{ConnectionContext, Error, QueryValues, Value};
use common::{hosts, FakeConnector};
use maplit::hashmap;

#[tokio::test]
async fn should_reject_inline_credentials_before_connecting() {
    let connector = Arc::new(FakeConnector::new(&["ks"]));
    let context = ConnectionContext::new(connector.clone());

    let result = context
        .setup(
            ConnectionConfigBuilder::new("ks")
                .with_contact_point("h1")
                .with_option("username", "cassandra")
                .build(),
        )
        .await;
    assert!(matches!(result, Err(Error::InlineCredentials)));

    let result = context
        .setup_connections(
            &ConnectionsConfig::new().with_connection("c1", "ks", ["h1"]),
            ConnectionOptions::new().with_option("password", "cassandra"),
        )
        .await;
    assert!(matches!(result, Err(Error::InlineCredentials)));

    assert_eq!(connector.connect_attempts(), 0);
    assert!(!context.is_configured());
    assert!(context.default_keyspace().is_none());
}

#[tokio::test]
async fn should_require_force_replace_or_close_to_replace_connection() {
    let connector = Arc::new(FakeConnector::new(&["ks"]));
    let context = ConnectionContext::new(connector.clone());

    context
        .setup(
            ConnectionConfigBuilder::new("ks")
                .with_contact_point("h1")
                .build(),
        )
        .await
        .unwrap();

    let result = context
        .setup(
            ConnectionConfigBuilder::new("ks")
                .with_contact_point("h2")
                .build(),
        )
        .await;
    assert!(matches!(result, Err(Error::AlreadyConfigured)));
    assert_eq!(connector.connect_attempts(), 1);

    context
        .setup(
            ConnectionConfigBuilder::new("ks")
                .with_contact_point("h2")
                .with_force_replace(true)
                .build(),
        )
        .await
        .unwrap();

    let rows = context
        .execute("SELECT * FROM t", ExecuteOptions::new())
        .await
        .unwrap();
    assert_eq!(
        rows.rows(),
        &[hashmap! { "host".to_string() => Value::new("h2") }]
    );

    assert!(matches!(
        context.default_connection().await,
        Err(Error::AlreadyConfigured)
    ));

    assert!(context.close().await);
    assert!(!context.is_configured());
    assert!(!context.close().await);

    context
        .setup(
            ConnectionConfigBuilder::new("ks")
                .with_contact_point("h3")
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(connector.connect_attempts(), 3);
}

#[tokio::test]
async fn default_connection_should_connect_to_local_node() {
    let connector = Arc::new(FakeConnector::new(&["ks"]));
    let context = ConnectionContext::new(connector.clone());

    context.default_connection().await.unwrap();

    let sessions = connector.sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(
        sessions[0].fake_cluster().hosts,
        vec![DEFAULT_CONTACT_POINT.to_string()]
    );
    assert_eq!(sessions[0].row_shape(), RowShape::Named);
}

#[tokio::test]
async fn set_session_should_require_named_rows() {
    let connector = Arc::new(FakeConnector::new(&["ks"]));
    let context = ConnectionContext::new(connector.clone());

    let session = connector.external_session(&["external"], RowShape::Positional);
    let result = context.set_session(session).await;
    assert!(matches!(
        result,
        Err(Error::RowShapeMismatch {
            expected: RowShape::Named,
            actual: RowShape::Positional,
        })
    ));
    assert!(result.unwrap_err().is_configuration());
    assert!(!context.is_configured());

    let session = connector.external_session(&["external"], RowShape::Named);
    context.set_session(session.clone()).await.unwrap();

    context
        .execute("SELECT * FROM t", ExecuteOptions::new())
        .await
        .unwrap();

    assert_eq!(session.executed().len(), 1);
    assert_eq!(connector.connect_attempts(), 0);

    let other = connector.external_session(&["other"], RowShape::Named);
    assert!(matches!(
        context.set_session(other).await,
        Err(Error::AlreadyConfigured)
    ));
}

#[tokio::test]
async fn should_apply_consistency_defaults_and_overrides() {
    let connector = Arc::new(FakeConnector::new(&["ks"]));
    let context = ConnectionContext::new(connector.clone());

    assert_eq!(context.default_consistency(), Consistency::One);

    context
        .setup(
            ConnectionConfigBuilder::new("ks")
                .with_contact_point("h1")
                .with_consistency(Consistency::Quorum)
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(context.default_consistency(), Consistency::Quorum);
    assert_eq!(context.default_keyspace().as_deref().map(String::as_str), Some("ks"));

    context
        .execute("SELECT * FROM t", ExecuteOptions::new())
        .await
        .unwrap();
    context
        .execute(
            "SELECT * FROM t",
            ExecuteOptions::new().with_consistency(Consistency::All),
        )
        .await
        .unwrap();
    context
        .execute(Statement::new("SELECT * FROM t"), ExecuteOptions::new())
        .await
        .unwrap();

    let executed = connector.sessions()[0].executed();
    let consistencies: Vec<_> = executed
        .iter()
        .map(|executed| executed.statement.consistency())
        .collect();

    assert_eq!(
        consistencies,
        vec![Some(Consistency::Quorum), Some(Consistency::All), None]
    );
}

#[tokio::test]
async fn should_pass_execute_options_to_session() {
    let connector = Arc::new(FakeConnector::new(&["ks"]));
    let context = ConnectionContext::new(connector.clone());

    context
        .setup(
            ConnectionConfigBuilder::new("ks")
                .with_contact_point("h1")
                .build(),
        )
        .await
        .unwrap();

    let values = QueryValues::SimpleValues(vec![Value::new(1i32)]);
    context
        .execute(
            "SELECT * FROM t WHERE id = ?",
            ExecuteOptions::new()
                .with_values(values.clone())
                .with_timeout(Duration::from_secs(3))
                .with_tracing(true),
        )
        .await
        .unwrap();
    context
        .execute("SELECT * FROM t", ExecuteOptions::new())
        .await
        .unwrap();

    let executed = connector.sessions()[0].executed();

    assert_eq!(executed[0].values, values);
    assert_eq!(executed[0].timeout, Some(Duration::from_secs(3)));
    assert!(executed[0].tracing);

    assert_eq!(executed[1].values, QueryValues::NamedValues(Default::default()));
    assert_eq!(executed[1].timeout, None);
    assert!(!executed[1].tracing);
}

#[tokio::test]
async fn execute_should_fail_without_connection() {
    let connector = Arc::new(FakeConnector::new(&["ks"]));
    let context = ConnectionContext::new(connector.clone());

    let error = context
        .execute("SELECT * FROM t", ExecuteOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(error, Error::NotConfigured(_)));
    assert!(error.is_configuration());
    assert!(matches!(
        context.get_session().await,
        Err(Error::NotConfigured(_))
    ));
}

#[tokio::test]
async fn lazy_setup_end_to_end() {
    let connector = Arc::new(FakeConnector::new(&["ks"]));
    let context = ConnectionContext::new(connector.clone());

    context
        .setup(
            ConnectionConfigBuilder::new("ks")
                .with_contact_points(hosts(&["h1"]))
                .with_lazy_connect(true)
                .build(),
        )
        .await
        .unwrap();
    context
        .register_udt(
            "ks",
            "addr",
            UdtDescriptor::new("Address").with_field("street", "text"),
        )
        .await
        .unwrap();

    assert_eq!(connector.connect_attempts(), 0);

    context
        .execute("SELECT * FROM t", ExecuteOptions::new())
        .await
        .unwrap();

    let sessions = connector.sessions();
    assert_eq!(sessions.len(), 1);

    let session = &sessions[0];
    assert_eq!(
        session.fake_cluster().registered_types(),
        vec![("ks".to_string(), "addr".to_string(), "Address".to_string())]
    );

    let executed = session.executed();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].statement.query(), "SELECT * FROM t");
    assert_eq!(executed[0].statement.consistency(), Some(Consistency::One));
}
