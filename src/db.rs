use anyhow::{Context, Result};
use sqlx::MySqlPool;
use tracing::info;

const MIGRATIONS: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        role VARCHAR(16) NOT NULL CHECK (role IN ('employee', 'manager')),
        paid_leave INT UNSIGNED NOT NULL DEFAULT 30,
        unpaid_leave INT UNSIGNED NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leave_requests (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        user_id BIGINT UNSIGNED NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        days INT UNSIGNED NOT NULL CHECK (days > 0),
        status VARCHAR(16) NOT NULL DEFAULT 'PENDING'
            CHECK (status IN ('PENDING', 'APPROVED', 'REJECTED')),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
];

pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    let pool = MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Creates the schema if missing. Safe to run on every start.
pub async fn run_migrations(pool: &MySqlPool) -> Result<()> {
    for statement in MIGRATIONS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to run schema migration")?;
    }
    info!("Database schema ready");
    Ok(())
}
