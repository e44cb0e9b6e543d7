//! Test database utilities
//!
//! Provides an in-memory SQLite store so tests run without external
//! dependencies. Each call creates a completely isolated instance.

use shiptrack::config::DatabaseConfig;
use shiptrack::Store;

/// Config for an isolated in-memory store.
pub fn test_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        // In-memory databases exist per connection
        max_connections: 1,
        connection_timeout: 5,
    }
}

/// Create a migrated in-memory store.
pub async fn create_test_store() -> Store {
    let store = Store::connect(&test_db_config())
        .await
        .expect("Failed to create in-memory test store");
    store.migrate().await.expect("Failed to run migrations");
    store
}
