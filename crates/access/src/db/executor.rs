//! The scoped transaction executor.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use deadpool_postgres::{Client, Config, Pool, Runtime, SslMode as PoolSslMode};
use tokio_postgres::NoTls;

use crate::context::AccessContext;
use crate::error::{AccessResult, ConnectionError};

use super::config::{DatabaseConfig, SslMode};
use super::transaction::ScopedTransaction;

/// Boxed future returned by a unit-of-work closure.
///
/// Callers write `|tx: &ScopedTransaction| Box::pin(async move { ... })`.
pub type UnitOfWork<'t, T> = Pin<Box<dyn Future<Output = AccessResult<T>> + Send + 't>>;

/// A snapshot of pool occupancy.
#[derive(Debug, Clone, Copy)]
pub struct PoolStatus {
    /// Connections currently managed by the pool (in use or idle).
    pub size: usize,
    /// Idle connections ready for checkout.
    pub available: usize,
    /// Callers waiting for a connection.
    pub waiting: usize,
}

/// Options for one scoped transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopedOptions {
    /// Begin the transaction `READ ONLY`.
    pub read_only: bool,
}

impl ScopedOptions {
    /// Creates new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the transaction read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Executes units of work inside identity-scoped transactions.
///
/// This is the only path by which code runs a database operation under a
/// specific identity. Each [`run_scoped`](Self::run_scoped) call owns one
/// connection and one transaction from acquisition to release; there is no
/// shared mutable state, so concurrent calls interleave freely on
/// independent connections.
///
/// Construction builds the pool without connecting; call
/// [`ping`](Self::ping) at process start to verify connectivity.
pub struct ScopedExecutor {
    pool: Pool,
    config: DatabaseConfig,
}

impl std::fmt::Debug for ScopedExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScopedExecutor {
    /// Creates an executor from the given configuration.
    pub fn new(config: DatabaseConfig) -> AccessResult<Self> {
        let pool = Self::create_pool(&config)?;
        Ok(Self { pool, config })
    }

    /// Creates an executor from a `postgres://` connection string.
    pub fn from_connection_string(url: &str) -> AccessResult<Self> {
        Self::new(DatabaseConfig::from_connection_string(url)?)
    }

    /// Creates an executor from the `TROVIA_DATABASE_URL` environment
    /// variable, resolved once at process start.
    pub fn from_env() -> AccessResult<Self> {
        Self::new(DatabaseConfig::from_env()?)
    }

    fn create_pool(config: &DatabaseConfig) -> Result<Pool, ConnectionError> {
        let mut cfg = Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.dbname = Some(config.dbname.clone());
        cfg.user = Some(config.user.clone());
        cfg.password = config.password.clone();
        cfg.ssl_mode = Some(match config.ssl_mode {
            SslMode::Disable => PoolSslMode::Disable,
            SslMode::Prefer => PoolSslMode::Prefer,
            SslMode::Require => PoolSslMode::Require,
        });

        cfg.builder(NoTls)
            .map_err(|e| ConnectionError::InvalidConfig {
                message: format!("failed to create pool builder: {}", e),
            })?
            .max_size(config.max_connections)
            .create_timeout(Some(Duration::from_secs(config.connect_timeout_secs)))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| ConnectionError::InvalidConfig {
                message: e.to_string(),
            })
    }

    /// Verifies connectivity by round-tripping one statement.
    pub async fn ping(&self) -> AccessResult<()> {
        let client = self.pool.get().await.map_err(ConnectionError::from)?;
        client.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    /// Returns the pool status (size, available, waiting).
    pub fn status(&self) -> PoolStatus {
        let status = self.pool.status();
        PoolStatus {
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Returns the configuration this executor was built from.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Runs a unit of work inside a transaction scoped to `context`.
    ///
    /// The steps are strictly sequential: acquire a dedicated connection,
    /// `BEGIN`, apply the context as transaction-local session state,
    /// invoke the unit of work against the transaction handle, then commit
    /// on `Ok` or roll back on `Err`; the unit-of-work error is returned
    /// unchanged. The connection is released on every exit path; if the
    /// future is cancelled mid-work, the [`ScopedTransaction`] drop guard
    /// closes the connection instead of pooling it.
    ///
    /// The context is consumed: it cannot be replayed onto a second
    /// transaction.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use trovia_access::{AccessContext, DatabaseConfig, ScopedExecutor, ScopedTransaction};
    /// # async fn example() -> trovia_access::AccessResult<()> {
    /// let executor = ScopedExecutor::new(DatabaseConfig::default())?;
    /// let titles = executor
    ///     .run_scoped(AccessContext::anonymous(), |tx: &ScopedTransaction| {
    ///         Box::pin(async move {
    ///             let rows = tx.query("SELECT title FROM listings", &[]).await?;
    ///             Ok(rows.iter().map(|r| r.get::<_, String>(0)).collect::<Vec<_>>())
    ///         })
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_scoped<T, F>(&self, context: AccessContext, work: F) -> AccessResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t ScopedTransaction) -> UnitOfWork<'t, T> + Send,
    {
        self.run_scoped_with(context, ScopedOptions::default(), work)
            .await
    }

    /// [`run_scoped`](Self::run_scoped) with explicit transaction options.
    pub async fn run_scoped_with<T, F>(
        &self,
        context: AccessContext,
        options: ScopedOptions,
        work: F,
    ) -> AccessResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t ScopedTransaction) -> UnitOfWork<'t, T> + Send,
    {
        let client = self.pool.get().await.map_err(ConnectionError::from)?;
        let tx =
            ScopedTransaction::begin(client, context, options, self.config.statement_timeout_ms)
                .await?;

        match work(&tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                tx.rollback().await;
                Err(err)
            }
        }
    }

    /// Runs a unit of work on a raw pooled connection: no transaction, no
    /// access context, no row-security identity.
    ///
    /// This is the audited escape hatch for operations that are provably
    /// exempt from row security (fully public reference data, migrations
    /// run by the owner role). Every use is logged. Anything touching
    /// tenant- or role-scoped tables belongs in
    /// [`run_scoped`](Self::run_scoped) instead.
    pub async fn run_unrestricted<T, F>(&self, work: F) -> AccessResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c Client) -> UnitOfWork<'c, T> + Send,
    {
        tracing::warn!("unrestricted database access: no transaction, no access context");
        let client = self.pool.get().await.map_err(ConnectionError::from)?;
        work(&client).await
    }
}
