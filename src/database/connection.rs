use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DbPool> {
    ensure_sqlite_dir(&config.url)?;

    let mut opts = ConnectOptions::new(config.url.clone());
    opts.max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let pool = Database::connect(opts).await?;
    log::info!("Database connected ({:?})", pool.get_database_backend());
    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> AppResult<()> {
    Migrator::up(pool, None).await?;
    log::info!("Database migrations applied");
    Ok(())
}

/// 健康检查使用
pub async fn ping(pool: &DbPool) -> AppResult<()> {
    pool.ping().await?;
    Ok(())
}

// sqlite 文件库所在目录不存在时先创建
fn ensure_sqlite_dir(url: &str) -> AppResult<()> {
    let Some(rest) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or_default();
    if file.is_empty() || file.starts_with(':') {
        return Ok(());
    }
    if let Some(parent) = Path::new(file).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::ConfigError(format!("cannot create database directory: {e}"))
        })?;
    }
    Ok(())
}
