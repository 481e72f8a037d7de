//! The role-gated entry points.
//!
//! Four named specializations of [`ScopedExecutor::run_scoped`], one per
//! capability level. The wrappers establish *who is asking*; the
//! database's row-security policies decide *what they may see*. Only the
//! admin wrapper performs its own check, because admin must never be
//! reachable through data forgery at a call site.

use crate::context::{AccessContext, BusinessId};
use crate::error::{AccessResult, AuthorizationError};
use crate::identity::Identity;

use super::executor::{ScopedExecutor, UnitOfWork};
use super::transaction::ScopedTransaction;

impl ScopedExecutor {
    /// Runs a unit of work as the anonymous/public caller.
    ///
    /// No validation: there is nothing to forge in an empty identity.
    pub async fn run_as_public<T, F>(&self, work: F) -> AccessResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t ScopedTransaction) -> UnitOfWork<'t, T> + Send,
    {
        self.run_scoped(AccessContext::anonymous(), work).await
    }

    /// Runs a unit of work as a plain authenticated user.
    ///
    /// The context role is fixed to `user` regardless of the identity's
    /// stored role; any authenticated identity may act as a user.
    pub async fn run_as_user<T, F>(&self, identity: &Identity, work: F) -> AccessResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t ScopedTransaction) -> UnitOfWork<'t, T> + Send,
    {
        self.run_scoped(AccessContext::user_of(identity), work).await
    }

    /// Runs a unit of work as `identity` acting on behalf of `business_id`.
    ///
    /// Whether the identity is actually associated with the business is
    /// *not* checked here. The row-security policies own that decision,
    /// per-row. The wrapper only establishes the claimed scope.
    pub async fn run_as_business<T, F>(
        &self,
        identity: &Identity,
        business_id: impl Into<BusinessId>,
        work: F,
    ) -> AccessResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t ScopedTransaction) -> UnitOfWork<'t, T> + Send,
    {
        self.run_scoped(
            AccessContext::business_of(identity, business_id.into()),
            work,
        )
        .await
    }

    /// Runs a unit of work with administrator scope.
    ///
    /// Fails with [`AuthorizationError::AdminRequired`] **before any
    /// connection is acquired** unless the identity's stored role is
    /// literally `admin`.
    pub async fn run_as_admin<T, F>(&self, identity: &Identity, work: F) -> AccessResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t ScopedTransaction) -> UnitOfWork<'t, T> + Send,
    {
        if !identity.role().is_admin() {
            return Err(AuthorizationError::AdminRequired {
                subject_id: identity.id().clone(),
                actual_role: identity.role(),
            }
            .into());
        }
        self.run_scoped(AccessContext::admin_of(identity), work).await
    }
}

#[cfg(test)]
mod tests {
    use crate::context::Role;
    use crate::db::DatabaseConfig;
    use crate::error::AccessError;

    use super::*;

    fn unreachable_executor() -> ScopedExecutor {
        // Bogus host: any attempt to open a connection would fail, and the
        // lazy pool lets us assert that none was attempted.
        ScopedExecutor::new(DatabaseConfig {
            host: "pg.invalid".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_as_admin_rejects_before_any_connection() {
        let executor = unreachable_executor();
        let identity = Identity::new(7, Role::User, "Dana Ito", "dana@example.com");

        let result = executor
            .run_as_admin(&identity, |_tx: &ScopedTransaction| {
                Box::pin(async move { Ok(()) })
            })
            .await;

        match result {
            Err(AccessError::Authorization(AuthorizationError::AdminRequired {
                subject_id,
                actual_role,
            })) => {
                assert_eq!(subject_id.as_str(), "7");
                assert_eq!(actual_role, Role::User);
            }
            other => panic!("expected AdminRequired, got {:?}", other.map(|_| ())),
        }

        assert_eq!(executor.status().size, 0, "no connection may be opened");
    }

    #[tokio::test]
    async fn test_run_as_admin_rejects_business_role() {
        let executor = unreachable_executor();
        let identity = Identity::new(9, Role::Business, "Shop", "shop@example.com");

        let result = executor
            .run_as_admin(&identity, |_tx: &ScopedTransaction| {
                Box::pin(async move { Ok(()) })
            })
            .await;

        assert!(matches!(result, Err(AccessError::Authorization(_))));
        assert_eq!(executor.status().size, 0);
    }
}
