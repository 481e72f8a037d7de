//! Error types for the access-control layer.
//!
//! This module defines all error types used throughout the crate, following
//! a hierarchy that separates authorization failures, connection failures,
//! transaction lifecycle failures, and identity-resolution failures.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::context::{Role, SubjectId};

/// Result alias used by all operations in this crate.
pub type AccessResult<T> = Result<T, AccessError>;

/// The primary error type for all access-control operations.
///
/// This enum encompasses all possible errors that can occur while building
/// a context, resolving an identity, or executing a scoped transaction,
/// organized by category.
#[derive(Error, Debug)]
pub enum AccessError {
    /// Authorization failures (raised before any connection is acquired).
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// Connection acquisition and configuration failures.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Transaction lifecycle failures.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Identity provider and directory lookup failures.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Statement failures reported by the database driver.
    ///
    /// The driver error is preserved unchanged so callers can inspect the
    /// original SQLSTATE and message after the rollback has run.
    #[error(transparent)]
    Database(#[from] tokio_postgres::Error),

    /// An error produced by a caller-supplied unit of work.
    ///
    /// The boxed error is carried through rollback untouched; use
    /// [`std::error::Error::source`] or downcasting to recover it.
    #[error("unit of work failed: {0}")]
    UnitOfWork(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AccessError {
    /// Wraps an arbitrary caller error so it can flow through a scoped
    /// transaction without being masked.
    pub fn unit_of_work(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        AccessError::UnitOfWork(Box::new(err))
    }
}

/// Errors raised by role validation in the gated wrappers.
#[derive(Error, Debug)]
pub enum AuthorizationError {
    /// The admin wrapper was invoked with an identity whose stored role is
    /// not `admin`. Raised before any connection is opened.
    #[error("admin access denied for subject {subject_id}: stored role is {actual_role}")]
    AdminRequired {
        subject_id: SubjectId,
        actual_role: Role,
    },
}

/// Errors related to acquiring or configuring database connections.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// A connection could not be acquired from the pool.
    #[error("failed to acquire database connection: {message}")]
    AcquireFailed { message: String },

    /// The database configuration is invalid.
    #[error("invalid database configuration: {message}")]
    InvalidConfig { message: String },
}

impl From<deadpool_postgres::PoolError> for ConnectionError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        ConnectionError::AcquireFailed {
            message: err.to_string(),
        }
    }
}

/// Errors in the scoped transaction lifecycle.
#[derive(Error, Debug)]
pub enum TransactionError {
    /// `BEGIN` failed.
    #[error("failed to begin transaction: {message}")]
    BeginFailed { message: String },

    /// The access context could not be applied as transaction-local
    /// session state. The connection is discarded, never pooled.
    #[error("failed to apply access context: {message}")]
    ContextNotApplied { message: String },

    /// `COMMIT` failed. The connection is discarded, never pooled.
    #[error("commit failed: {message}")]
    CommitFailed { message: String },

    /// The transaction has already been committed, rolled back, or its
    /// connection discarded.
    #[error("transaction is no longer active")]
    NotActive,
}

/// Errors raised while resolving the current caller.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The external identity provider could not be reached.
    #[error("identity provider error: {message}")]
    ProviderUnavailable { message: String },

    /// The directory lookup for a resolved external subject failed.
    #[error("directory lookup failed for external subject {subject}: {message}")]
    LookupFailed { subject: String, message: String },
}
