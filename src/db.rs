//! Connection pool construction and the startup connectivity check.

use crate::config::Config;
use crate::error::StartupError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Sleep after each failed ping; its length is also the attempt count.
pub const PING_BACKOFF: [Duration; 5] = [
    Duration::from_millis(50),
    Duration::from_millis(100),
    Duration::from_millis(200),
    Duration::from_millis(600),
    Duration::from_millis(1200),
];

const PING_TIMEOUT: Duration = Duration::from_secs(3);

/// sqlx has no ceiling on idle connections, so `max_idle_conns` is not applied; idle
/// connections are retired by the pool's `idle_timeout` instead.
pub fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_open_conns)
        .max_lifetime(config.conn_max_lifetime)
}

/// Builds the pool lazily and returns it only once the database answers a ping.
pub async fn connect(config: &Config) -> Result<PgPool, StartupError> {
    let opts = PgConnectOptions::from_str(&config.dsn)
        .map_err(|e| StartupError::Config(format!("invalid dsn: {}", e)))?;
    let pool = pool_options(config).connect_lazy_with(opts);
    wait_for_db(&pool, &PING_BACKOFF).await?;
    tracing::info!(
        max_open_conns = config.max_open_conns,
        idle_timeout = ?pool.options().get_idle_timeout(),
        "db pool ready"
    );
    if config.max_idle_conns < config.max_open_conns {
        tracing::warn!(
            max_idle_conns = config.max_idle_conns,
            "max_idle_conns is not enforced; idle connections are closed by idle_timeout"
        );
    }
    Ok(pool)
}

/// Pings once per backoff step; the last error is returned when every attempt fails.
pub async fn wait_for_db(pool: &PgPool, backoff: &[Duration]) -> Result<(), sqlx::Error> {
    let mut last = None;
    for (attempt, delay) in backoff.iter().enumerate() {
        match ping(pool).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::warn!(attempt = attempt + 1, error = %e, "db ping failed");
                last = Some(e);
                tokio::time::sleep(*delay).await;
            }
        }
    }
    Err(last.unwrap_or(sqlx::Error::PoolTimedOut))
}

async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    let attempt = async {
        let mut conn = pool.acquire().await?;
        conn.ping().await
    };
    tokio::time::timeout(PING_TIMEOUT, attempt)
        .await
        .map_err(|_| sqlx::Error::PoolTimedOut)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn idle_conns_are_not_kept_warm() {
        let config = Config::try_parse_from([
            "todod",
            "--max-open-conns",
            "3",
            "--max-idle-conns",
            "8",
            "--conn-max-lifetime",
            "9m",
        ])
        .unwrap();
        let opts = pool_options(&config);
        assert_eq!(opts.get_max_connections(), 3);
        assert_eq!(opts.get_min_connections(), 0);
        assert!(opts.get_idle_timeout().is_some());
        assert_eq!(opts.get_max_lifetime(), Some(Duration::from_secs(540)));
    }

    #[tokio::test]
    async fn invalid_dsn_is_config_error() {
        let config = Config::try_parse_from(["todod", "--dsn", "not a url"]).unwrap();
        assert!(matches!(connect(&config).await, Err(StartupError::Config(_))));
    }

    #[tokio::test]
    async fn unreachable_db_fails_after_all_attempts() {
        // Port 1 on loopback refuses connections immediately.
        let opts = PgConnectOptions::from_str("postgres://u:p@127.0.0.1:1/todo").unwrap();
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy_with(opts);
        let backoff = [Duration::from_millis(1), Duration::from_millis(1)];
        assert!(wait_for_db(&pool, &backoff).await.is_err());
    }
}
