use bookstore_hex::config::Config;
use bookstore_store::{build_store, Store};
use bookstore_types::domain::connection::ConnectionState;
use bookstore_types::ports::store::StoreConnection;

#[tokio::test]
async fn builds_store_from_env_config() {
    temp_env::with_vars(
        [
            ("ATLAS_USER_NAME", Some("u1")),
            ("ATLAS_PASSWORD", Some("p1")),
        ],
        || {
            let config = Config::from_env().expect("config");
            let store: Store = build_store(Some(&config.connection_uri())).expect("build store");
            // Construction is offline: the handle exists but has not
            // attempted the handshake yet.
            assert_eq!(store.state(), ConnectionState::Connecting);
        },
    );
}

#[cfg(feature = "mongo")]
#[tokio::test]
async fn mongo_store_requires_a_uri() {
    let err = build_store(None).unwrap_err();
    assert!(err.to_string().contains("connection URI"));
}
