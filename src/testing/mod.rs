use chrono::Duration;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{generate_jwt, ClaimSet};
use crate::config::DatabaseConfig;
use crate::database::{DatabaseError, DatabaseManager, PgInvoiceRepository};

/// `Authorization` header value carrying a one-hour token with `claims`.
pub fn bearer(secret: &str, claims: &ClaimSet) -> anyhow::Result<String> {
    let token = generate_jwt(secret, claims, Duration::hours(1))?;
    Ok(format!("Bearer {}", token))
}

/// Throwaway database: created with a unique name, migrated, and dropped by `drop_database`.
pub struct TestDatabase {
    pub name: String,
    pub pool: PgPool,
    admin_pool: PgPool,
}

impl TestDatabase {
    /// Create `test_db_<uuid>` on the server described by `config`, using its
    /// `postgres` database for the administrative statements.
    pub async fn create(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let name = Self::generate_name();
        let admin_pool = DatabaseManager::connect(config, "postgres").await?;
        DatabaseManager::create_database(&admin_pool, &name).await?;

        match Self::connect_and_migrate(config, &name).await {
            Ok(pool) => Ok(Self { name, pool, admin_pool }),
            Err(e) => {
                if let Err(drop_err) = DatabaseManager::drop_database(&admin_pool, &name).await {
                    tracing::warn!("failed to drop {} after setup error: {}", name, drop_err);
                }
                admin_pool.close().await;
                Err(e)
            }
        }
    }

    async fn connect_and_migrate(config: &DatabaseConfig, name: &str) -> Result<PgPool, DatabaseError> {
        let pool = DatabaseManager::connect(config, name).await?;
        if let Err(e) = DatabaseManager::migrate(&pool).await {
            pool.close().await;
            return Err(e);
        }
        Ok(pool)
    }

    pub fn repository(&self) -> PgInvoiceRepository {
        PgInvoiceRepository::new(self.pool.clone())
    }

    pub async fn drop_database(self) -> Result<(), DatabaseError> {
        self.pool.close().await;
        DatabaseManager::drop_database(&self.admin_pool, &self.name).await?;
        self.admin_pool.close().await;
        Ok(())
    }

    fn generate_name() -> String {
        format!("test_db_{}", Uuid::new_v4().simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_unique_and_valid() {
        let a = TestDatabase::generate_name();
        let b = TestDatabase::generate_name();

        assert_ne!(a, b);
        assert!(a.starts_with("test_db_"));
        assert!(DatabaseManager::is_valid_db_name(&a));
    }

    #[test]
    fn bearer_has_scheme_prefix() {
        let header = bearer("secret", &ClaimSet::all()).unwrap();
        assert!(header.starts_with("Bearer "));
    }
}
