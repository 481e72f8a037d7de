//! End-to-end dispatch for the current caller.
//!
//! [`AccessGateway`] wires the identity-resolution seams to the role-gated
//! wrappers for call sites that do not want to manage identity plumbing
//! themselves. It introduces no behavior of its own: every path through
//! [`run_auto`](AccessGateway::run_auto) lands in one of the explicit
//! wrappers.

use std::sync::Arc;

use crate::context::{BusinessId, Role};
use crate::db::{ScopedExecutor, ScopedTransaction, UnitOfWork};
use crate::error::AccessResult;
use crate::identity::{DirectoryLookup, Identity, IdentityResolver};

/// Options for [`AccessGateway::run_auto`].
#[derive(Debug, Clone, Default)]
pub struct AutoOptions {
    /// The business the caller requests to operate as. Ignored for
    /// anonymous callers and for stored admins (admin precedence).
    pub acting_business_id: Option<BusinessId>,
}

impl AutoOptions {
    /// Creates new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests business scope for the given tenant.
    pub fn acting_business(mut self, business_id: impl Into<BusinessId>) -> Self {
        self.acting_business_id = Some(business_id.into());
        self
    }
}

/// Resolves the current caller and dispatches to the matching wrapper.
pub struct AccessGateway {
    executor: Arc<ScopedExecutor>,
    resolver: Arc<dyn IdentityResolver>,
    directory: Arc<dyn DirectoryLookup>,
}

impl std::fmt::Debug for AccessGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGateway")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl AccessGateway {
    /// Creates a gateway over the given executor and resolution seams.
    pub fn new(
        executor: Arc<ScopedExecutor>,
        resolver: Arc<dyn IdentityResolver>,
        directory: Arc<dyn DirectoryLookup>,
    ) -> Self {
        Self {
            executor,
            resolver,
            directory,
        }
    }

    /// Returns the underlying executor, for explicit wrapper calls.
    pub fn executor(&self) -> &ScopedExecutor {
        &self.executor
    }

    /// Resolves the current caller to an internal identity.
    ///
    /// Returns `None` for unauthenticated requests and for external
    /// subjects with no directory record yet; both run as the public
    /// caller.
    pub async fn resolve_identity(&self) -> AccessResult<Option<Identity>> {
        let external = match self.resolver.resolve_current().await? {
            Some(external) => external,
            None => return Ok(None),
        };
        self.directory.lookup_internal(external.subject()).await
    }

    /// Resolves the current caller and runs the unit of work under the
    /// matching wrapper.
    ///
    /// Decision order: no identity runs as public; a stored admin runs as
    /// admin, winning over a supplied acting business id; an acting
    /// business id selects business scope; anything else runs as user.
    pub async fn run_auto<T, F>(&self, options: AutoOptions, work: F) -> AccessResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t ScopedTransaction) -> UnitOfWork<'t, T> + Send,
    {
        match self.resolve_identity().await? {
            None => self.executor.run_as_public(work).await,
            Some(identity) if identity.role() == Role::Admin => {
                self.executor.run_as_admin(&identity, work).await
            }
            Some(identity) => match options.acting_business_id {
                Some(business_id) => {
                    self.executor
                        .run_as_business(&identity, business_id, work)
                        .await
                }
                None => self.executor.run_as_user(&identity, work).await,
            },
        }
    }
}
