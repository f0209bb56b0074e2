//! High-level Redis client with a guarded lazily-created connection

use tokio::sync::Mutex;

use crate::config::RedisConfig;

use super::connection::{RedisConnection, RespValue};

/// Result of an increment attempt against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncrOutcome {
    /// The store returned the new counter value
    Incremented(i64),
    /// No store configured, or no connection could be established.
    /// This is the normal degraded path, not an error.
    Unavailable,
    /// The command failed after a connection existed
    Failed(String),
}

/// Client for the optional Redis hit-counter store
///
/// Holds at most one live connection. The connection is created lazily on
/// first use and dropped on any transport failure, so the next call
/// re-attempts from configuration. The mutex serializes check-and-create as
/// well as command execution: concurrent first use cannot race to open
/// multiple physical connections, and replies cannot interleave.
pub struct RedisClient {
    config: Option<RedisConfig>,
    conn: Mutex<Option<RedisConnection>>,
}

impl RedisClient {
    #[must_use]
    pub fn new(config: Option<RedisConfig>) -> Self {
        Self {
            config,
            conn: Mutex::new(None),
        }
    }

    /// Whether a store host is configured at all
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Liveness probe for the health endpoint
    ///
    /// Returns `false` when unconfigured or on any failure; never propagates
    /// errors. A failed probe drops the cached connection.
    pub async fn ping(&self) -> bool {
        let Some(config) = &self.config else {
            return false;
        };

        let mut guard = self.conn.lock().await;
        let Some(conn) = Self::ensure_connection(&mut guard, config).await else {
            return false;
        };

        match conn.command(&["PING"]).await {
            Ok(RespValue::Simple(s)) if s == "PONG" => true,
            Ok(reply) => {
                tracing::warn!("Unexpected PING reply: {:?}", reply);
                *guard = None;
                false
            }
            Err(e) => {
                tracing::debug!("Store ping failed: {}", e);
                *guard = None;
                false
            }
        }
    }

    /// Atomically increments `key` in the store
    pub async fn incr(&self, key: &str) -> IncrOutcome {
        let Some(config) = &self.config else {
            return IncrOutcome::Unavailable;
        };

        let mut guard = self.conn.lock().await;
        let Some(conn) = Self::ensure_connection(&mut guard, config).await else {
            return IncrOutcome::Unavailable;
        };

        match conn.command(&["INCR", key]).await {
            Ok(RespValue::Integer(n)) => IncrOutcome::Incremented(n),
            Ok(RespValue::Error(msg)) => {
                tracing::warn!("Store rejected INCR {}: {}", key, msg);
                IncrOutcome::Failed(msg)
            }
            Ok(reply) => {
                *guard = None;
                IncrOutcome::Failed(format!("Unexpected INCR reply: {reply:?}"))
            }
            Err(e) => {
                tracing::warn!("Store INCR {} failed: {}", key, e);
                *guard = None;
                IncrOutcome::Failed(e.to_string())
            }
        }
    }

    /// Returns the cached connection, creating one on first use
    ///
    /// A freshly created connection is verified with an initial PING and,
    /// for a nonzero database index, switched with SELECT. Any failure
    /// leaves the cache empty; no failure state is retained.
    async fn ensure_connection<'a>(
        guard: &'a mut Option<RedisConnection>,
        config: &RedisConfig,
    ) -> Option<&'a mut RedisConnection> {
        if guard.is_none() {
            let addr = config.addr();
            tracing::debug!("Creating new store connection to {}", addr);
            match Self::open(config).await {
                Ok(conn) => {
                    *guard = Some(conn);
                }
                Err(e) => {
                    tracing::debug!("Store connection to {} failed: {}", addr, e);
                    return None;
                }
            }
        }
        guard.as_mut()
    }

    async fn open(
        config: &RedisConfig,
    ) -> Result<RedisConnection, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = RedisConnection::connect(&config.addr()).await?;
        match conn.command(&["PING"]).await? {
            RespValue::Simple(s) if s == "PONG" => {}
            reply => return Err(format!("Unexpected PING reply: {reply:?}").into()),
        }
        if config.db != 0 {
            match conn.command(&["SELECT", &config.db.to_string()]).await? {
                RespValue::Simple(s) if s == "OK" => {}
                reply => return Err(format!("SELECT {} failed: {reply:?}", config.db).into()),
            }
        }
        Ok(conn)
    }
}
