use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invoice with ID={0} not found")]
    NotFound(i64),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid database name: {0}")]
    InvalidDatabaseName(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connection plumbing for the invoices database and its test siblings
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool against `database_name` on the configured server.
    pub async fn connect(config: &DatabaseConfig, database_name: &str) -> Result<PgPool, DatabaseError> {
        if !Self::is_valid_db_name(database_name) {
            return Err(DatabaseError::InvalidDatabaseName(database_name.to_string()));
        }

        let connection_string = Self::build_connection_string(config, database_name)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        info!("Created database pool for: {}", database_name);
        Ok(pool)
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database schema is up to date");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    pub async fn create_database(admin_pool: &PgPool, database_name: &str) -> Result<(), DatabaseError> {
        if !Self::is_valid_db_name(database_name) {
            return Err(DatabaseError::InvalidDatabaseName(database_name.to_string()));
        }

        let query = format!("CREATE DATABASE {}", Self::quote_identifier(database_name));
        sqlx::query(&query).execute(admin_pool).await?;

        info!("Created database {}", database_name);
        Ok(())
    }

    pub async fn drop_database(admin_pool: &PgPool, database_name: &str) -> Result<(), DatabaseError> {
        if !Self::is_valid_db_name(database_name) {
            return Err(DatabaseError::InvalidDatabaseName(database_name.to_string()));
        }

        let query = format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", Self::quote_identifier(database_name));
        sqlx::query(&query).execute(admin_pool).await?;

        info!("Dropped database {}", database_name);
        Ok(())
    }

    /// Either swaps the path of `DATABASE_URL` or assembles a URL from the discrete settings.
    pub fn build_connection_string(config: &DatabaseConfig, database_name: &str) -> Result<String, DatabaseError> {
        let mut url = match &config.url {
            Some(base) => url::Url::parse(base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?,
            None => {
                let mut url = url::Url::parse("postgres://localhost").map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
                url.set_host(Some(&config.host)).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
                url.set_port(Some(config.port)).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
                if !config.user.is_empty() {
                    url.set_username(&config.user).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
                }
                if !config.pass.is_empty() {
                    url.set_password(Some(&config.pass)).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
                }
                url
            }
        };

        url.set_path(&format!("/{}", database_name));
        Ok(url.into())
    }

    /// Quote SQL identifier to prevent injection
    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Database names are restricted to `[a-zA-Z0-9_]`, starting with a letter or underscore.
    pub fn is_valid_db_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return false,
        }
        name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
