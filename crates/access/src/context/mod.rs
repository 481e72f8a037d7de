//! The access context model.
//!
//! This module provides the core types describing *who is asking*: the
//! [`Role`] hierarchy, the [`SubjectId`]/[`BusinessId`] identifiers, and
//! the immutable [`AccessContext`] value consumed by every scoped
//! transaction.
//!
//! # Design Philosophy
//!
//! Identity is passed explicitly, never read from ambient state. Every
//! database-touching call either constructs an `AccessContext` or receives
//! one, and the context is consumed by exactly one transaction. There is no
//! way to run a query under an identity without an `AccessContext`, and no
//! way to build an admin context without an identity record whose stored
//! role is admin.
//!
//! # Examples
//!
//! ```
//! use trovia_access::{AccessContext, ContextOptions, Identity, Role};
//!
//! // The public caller.
//! let anon = AccessContext::anonymous();
//! assert!(anon.is_anonymous());
//!
//! // A user operating as business 42.
//! let identity = Identity::new(7, Role::User, "Dana Ito", "dana@example.com");
//! let ctx = AccessContext::for_identity(
//!     &identity,
//!     ContextOptions::new().acting_business(42),
//! );
//! assert_eq!(ctx.role(), Role::Business);
//! ```

mod context;
mod id;
mod role;

pub use context::{AccessContext, ContextOptions};
pub use id::{BusinessId, SubjectId};
pub use role::{ParseRoleError, Role};
