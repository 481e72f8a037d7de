//! The scoped transaction handle.

use deadpool_postgres::Client;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

use crate::context::AccessContext;
use crate::error::{AccessResult, TransactionError};

use super::executor::ScopedOptions;

/// One statement writes all three session keys with transaction-local
/// scope (`is_local = true`), so they auto-revert at COMMIT or ROLLBACK.
/// Absent fields arrive as empty strings; policies treat empty and unset
/// identically.
const APPLY_CONTEXT: &str = "SELECT set_config('app.subject_id', $1, true), \
     set_config('app.role', $2, true), \
     set_config('app.acting_business_id', $3, true)";

/// An open transaction carrying an applied [`AccessContext`].
///
/// Wraps a pooled client with an active transaction whose session state
/// has been populated from the context. All statements issued by a unit of
/// work go through this handle; there is no way to reach the connection
/// without it.
///
/// The executor owns the lifecycle: it commits on success and rolls back
/// on error. If the handle is dropped while still active (a cancelled
/// future, a timeout), the connection is detached from the pool and
/// closed rather than returned, so the open transaction (and with it the
/// session state) can never be observed by a later checkout.
pub struct ScopedTransaction {
    /// The client with the active transaction.
    /// Option so it can be taken during commit/rollback/discard.
    client: Option<Client>,
    /// Whether the transaction is still active.
    active: bool,
    /// The consumed context this transaction runs under.
    context: AccessContext,
}

impl std::fmt::Debug for ScopedTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedTransaction")
            .field("active", &self.active)
            .field("context", &self.context)
            .finish()
    }
}

impl ScopedTransaction {
    /// Begins a transaction and applies the context before returning.
    ///
    /// No caller statement can run ahead of the context: the handle does
    /// not exist until `set_config` has succeeded.
    pub(crate) async fn begin(
        client: Client,
        context: AccessContext,
        options: ScopedOptions,
        statement_timeout_ms: u64,
    ) -> AccessResult<Self> {
        let begin_sql = if options.read_only {
            "BEGIN READ ONLY"
        } else {
            "BEGIN"
        };
        client.batch_execute(begin_sql).await.map_err(|e| {
            TransactionError::BeginFailed {
                message: e.to_string(),
            }
        })?;

        let mut tx = Self {
            client: Some(client),
            active: true,
            context,
        };

        if let Err(err) = tx.apply_context(statement_timeout_ms).await {
            // The connection holds a transaction we could not initialize;
            // it must not go back to the pool.
            tx.discard();
            return Err(err);
        }

        tracing::debug!(
            "scoped transaction began as role {}",
            tx.context.role()
        );
        Ok(tx)
    }

    async fn apply_context(&self, statement_timeout_ms: u64) -> AccessResult<()> {
        let client = self.client()?;
        let (subject, role, business) = self.context.session_values();
        client
            .execute(APPLY_CONTEXT, &[&subject, &role, &business])
            .await
            .map_err(|e| TransactionError::ContextNotApplied {
                message: e.to_string(),
            })?;

        if statement_timeout_ms > 0 {
            client
                .batch_execute(&format!(
                    "SET LOCAL statement_timeout = {}",
                    statement_timeout_ms
                ))
                .await
                .map_err(|e| TransactionError::ContextNotApplied {
                    message: e.to_string(),
                })?;
        }

        Ok(())
    }

    fn client(&self) -> AccessResult<&Client> {
        if !self.active {
            return Err(TransactionError::NotActive.into());
        }
        self.client
            .as_ref()
            .ok_or_else(|| TransactionError::NotActive.into())
    }

    /// Executes a statement, returning the number of rows affected.
    pub async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> AccessResult<u64> {
        Ok(self.client()?.execute(statement, params).await?)
    }

    /// Executes a query, returning all result rows.
    pub async fn query(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> AccessResult<Vec<Row>> {
        Ok(self.client()?.query(statement, params).await?)
    }

    /// Executes a query expected to return exactly one row.
    pub async fn query_one(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> AccessResult<Row> {
        Ok(self.client()?.query_one(statement, params).await?)
    }

    /// Executes a query returning at most one row.
    pub async fn query_opt(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> AccessResult<Option<Row>> {
        Ok(self.client()?.query_opt(statement, params).await?)
    }

    /// Returns the context this transaction runs under.
    pub fn context(&self) -> &AccessContext {
        &self.context
    }

    /// Returns whether this transaction is still active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Commits and returns the connection to the pool.
    ///
    /// A failed COMMIT discards the connection instead of pooling it.
    pub(crate) async fn commit(mut self) -> AccessResult<()> {
        let client = match self.client.take() {
            Some(client) => client,
            None => return Err(TransactionError::NotActive.into()),
        };
        self.active = false;

        match client.batch_execute("COMMIT").await {
            Ok(()) => Ok(()),
            Err(e) => {
                drop(Client::take(client));
                Err(TransactionError::CommitFailed {
                    message: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Rolls back, best effort. The caller's original error is what
    /// surfaces; a failed ROLLBACK is logged and the connection discarded.
    pub(crate) async fn rollback(mut self) {
        let client = match self.client.take() {
            Some(client) => client,
            None => return,
        };
        self.active = false;

        if let Err(e) = client.batch_execute("ROLLBACK").await {
            tracing::error!("rollback failed, discarding connection: {}", e);
            drop(Client::take(client));
        }
    }

    /// Detaches the connection from the pool and closes it.
    fn discard(&mut self) {
        self.active = false;
        if let Some(client) = self.client.take() {
            drop(Client::take(client));
        }
    }
}

impl Drop for ScopedTransaction {
    fn drop(&mut self) {
        if self.active && self.client.is_some() {
            // Dropped mid-transaction: the caller's future was cancelled or
            // timed out before commit/rollback ran. The connection still
            // carries an open transaction, so close it instead of pooling it.
            tracing::warn!("scoped transaction dropped while active; discarding its connection");
            self.discard();
        }
    }
}
