use chrono::{Duration, NaiveDate, NaiveTime};
use secrecy::ExposeSecret;
use sqlx::{PgPool, PgConnection, Connection, Executor};
use std::net::TcpListener;
use uuid::Uuid;
use once_cell::sync::Lazy;

use pitchside_backend::run;
use pitchside_backend::config::settings::{get_config, DatabaseSettings};
use pitchside_backend::league::{LeagueFinalizer, SlotDefaults};
use pitchside_backend::telemetry::{get_subscriber, init_subscriber};

use super::memory_store::MemoryLeagueStore;

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub fn init_tracing() {
    Lazy::force(&TRACING);
}

pub const DEFAULT_LOCATION: &str = "Field 1";

pub fn default_match_time() -> NaiveTime {
    NaiveTime::from_hms_opt(19, 0, 0).unwrap()
}

/// Monday, March 3rd 2025
pub fn season_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
}

pub fn test_finalizer(store: MemoryLeagueStore) -> LeagueFinalizer<MemoryLeagueStore> {
    init_tracing();
    LeagueFinalizer::new(
        store,
        SlotDefaults {
            match_time: default_match_time(),
            location: DEFAULT_LOCATION.to_string(),
        },
        Duration::minutes(5),
    )
}

pub struct TestApp {
    pub address: String,
    pub store: MemoryLeagueStore,
}

pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = MemoryLeagueStore::new();
    let server = run(listener, test_finalizer(store.clone()))
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
    }
}

/// Fresh, migrated database named after a random UUID
pub async fn spawn_test_db() -> PgPool {
    init_tracing();
    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    // A DATABASE_URL override would point every test at the same database
    configuration.database.db_url = None;
    configure_db(&configuration.database).await
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(
            &config.connection_string_without_db()
        )
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}
