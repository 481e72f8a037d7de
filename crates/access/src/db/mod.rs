//! PostgreSQL-backed scoped transaction execution.
//!
//! This module owns the load-bearing mechanism of the crate: every
//! database operation runs inside one transaction on one dedicated pooled
//! connection, with the caller's [`AccessContext`](crate::AccessContext)
//! applied as **transaction-local** session state before any caller
//! statement executes. The three keys,
//!
//! - `app.subject_id`
//! - `app.role`
//! - `app.acting_business_id`
//!
//! are written with `set_config(key, value, is_local => true)` and
//! auto-revert when the transaction ends, so a pooled connection can never
//! carry one request's identity into the next.
//!
//! # Policy contract
//!
//! Row-security policies are owned by the schema, not by this crate. The
//! contract is only that the three keys are correctly populated for the
//! duration of every statement issued inside a scoped transaction, and
//! never otherwise. A typical policy reads them like this:
//!
//! ```sql
//! CREATE POLICY listings_select ON listings FOR SELECT USING (
//!     published
//!     OR current_setting('app.role', true) = 'admin'
//!     OR (current_setting('app.role', true) = 'business'
//!         AND business_id::text = current_setting('app.acting_business_id', true))
//! );
//! ```
//!
//! Connect as an unprivileged role: superusers bypass row security
//! entirely, which silently voids the whole design.

mod config;
mod executor;
mod gate;
mod transaction;

pub use config::{DATABASE_URL_VAR, DatabaseConfig, SslMode};
pub use executor::{PoolStatus, ScopedExecutor, ScopedOptions, UnitOfWork};
pub use transaction::ScopedTransaction;
