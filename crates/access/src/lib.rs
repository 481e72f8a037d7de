//! Trovia Access Control Layer
//!
//! This crate provides request-scoped, role-aware transactional access
//! control for the Trovia directory platform. Every database operation
//! runs inside a transaction that carries an explicit security identity
//! (anonymous, user, business actor, or administrator), and that identity
//! is visible to the database's own row-level security policies, not
//! re-implemented as application-side filtering.
//!
//! # Why transaction-local
//!
//! The classic failure mode of pooled connections is a security context
//! set on the connection that outlives the request and "bleeds" into an
//! unrelated request reusing the same physical connection. This crate
//! closes that hole structurally: the context is applied with
//! transaction-local scope (`set_config(key, value, is_local => true)`),
//! reverts when the transaction ends, and a transaction abandoned
//! mid-flight has its connection closed rather than pooled.
//!
//! # Architecture
//!
//! - [`context`] - The [`AccessContext`] value, [`Role`] hierarchy, and
//!   identifier types
//! - [`identity`] - Read-only identity records and the resolver/directory
//!   seams to the external identity provider
//! - [`db`] - The [`ScopedExecutor`], its [`ScopedTransaction`] handle,
//!   the role-gated wrappers, and pool configuration
//! - [`dispatch`] - The [`AccessGateway`] that resolves the current
//!   caller end-to-end
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```no_run
//! use trovia_access::{DatabaseConfig, Identity, Role, ScopedExecutor, ScopedTransaction};
//!
//! # async fn example() -> trovia_access::AccessResult<()> {
//! let executor = ScopedExecutor::from_env()?;
//! executor.ping().await?;
//!
//! // Anonymous read: policies show only published rows.
//! let titles = executor
//!     .run_as_public(|tx: &ScopedTransaction| {
//!         Box::pin(async move {
//!             let rows = tx.query("SELECT title FROM listings", &[]).await?;
//!             Ok(rows.iter().map(|r| r.get::<_, String>(0)).collect::<Vec<_>>())
//!         })
//!     })
//!     .await?;
//!
//! // A business actor: policies additionally show business 42's own rows.
//! let identity = Identity::new(7, Role::User, "Dana Ito", "dana@example.com");
//! executor
//!     .run_as_business(&identity, 42, |tx: &ScopedTransaction| {
//!         Box::pin(async move {
//!             tx.execute(
//!                 "UPDATE business_records SET phone = $1 WHERE business_id = 42",
//!                 &[&"+49 30 901820"],
//!             )
//!             .await?;
//!             Ok(())
//!         })
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Separation of concerns
//!
//! The wrappers establish *who is asking*; the schema-owned row-security
//! policies decide *what they may see*. The one exception is
//! [`ScopedExecutor::run_as_admin`], which verifies the identity's stored
//! role itself, before opening any connection: admin capability must not
//! be reachable by forging call-site data.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod context;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod identity;

// Re-export commonly used types at crate root
pub use context::{AccessContext, BusinessId, ContextOptions, Role, SubjectId};
pub use db::{
    DatabaseConfig, PoolStatus, ScopedExecutor, ScopedOptions, ScopedTransaction, SslMode,
    UnitOfWork,
};
pub use dispatch::{AccessGateway, AutoOptions};
pub use error::{AccessError, AccessResult, AuthorizationError};
pub use identity::{DirectoryLookup, ExternalIdentity, Identity, IdentityResolver};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
