//! Access context for scoped database operations.
//!
//! This module defines [`AccessContext`], the validated security identity
//! carried by every scoped transaction. The executor applies it as
//! transaction-local session state where the database's row-security
//! policies read it.

use super::id::{BusinessId, SubjectId};
use super::role::Role;
use crate::identity::Identity;

/// The security identity under which one scoped transaction runs.
///
/// An `AccessContext` is an immutable value: `{ subject_id, role,
/// acting_business_id }`. It is constructed at the top of a request, passed
/// into exactly one wrapper call, consumed by the executor to populate
/// session state, and discarded when the transaction ends.
///
/// # Single use
///
/// `AccessContext` is deliberately **not `Clone`**. The executor takes it
/// by value, so the "one context, one transaction" rule is enforced by the
/// compiler: a context can never be replayed onto a second connection.
///
/// # Construction
///
/// Contexts are built from an [`Identity`] (or from nothing, for the
/// public caller); there is no constructor that accepts a free-standing
/// role, so an admin context cannot be assembled from loose data:
///
/// ```
/// use trovia_access::{AccessContext, ContextOptions, Identity, Role};
///
/// let anon = AccessContext::anonymous();
/// assert_eq!(anon.role(), Role::Anonymous);
///
/// let identity = Identity::new(7, Role::User, "Dana Ito", "dana@example.com");
/// let ctx = AccessContext::for_identity(&identity, ContextOptions::default());
/// assert_eq!(ctx.role(), Role::User);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct AccessContext {
    /// Internal identity of the caller; absent means anonymous.
    subject_id: Option<SubjectId>,
    /// The claimed capability level.
    role: Role,
    /// The business the caller is operating as, only for business scope.
    acting_business_id: Option<BusinessId>,
}

impl AccessContext {
    /// Returns the fully anonymous/public context.
    pub fn anonymous() -> Self {
        Self {
            subject_id: None,
            role: Role::Anonymous,
            acting_business_id: None,
        }
    }

    /// Builds a context for an authenticated identity.
    ///
    /// Pure function, no side effects. The rules:
    ///
    /// - without an acting business id, the context carries the identity's
    ///   stored role unchanged;
    /// - with an acting business id, the role is forced to
    ///   [`Role::Business`], except for stored admins, which keep admin
    ///   scope and have the acting id discarded (elevation and demotion
    ///   both go through the dedicated wrappers, never through this field).
    pub fn for_identity(identity: &Identity, options: ContextOptions) -> Self {
        match options.acting_business_id {
            Some(business_id) if !identity.role().is_admin() => Self {
                subject_id: Some(identity.id().clone()),
                role: Role::Business,
                acting_business_id: Some(business_id),
            },
            _ => Self {
                subject_id: Some(identity.id().clone()),
                role: identity.role(),
                acting_business_id: None,
            },
        }
    }

    /// Context with the role fixed to `user`, regardless of stored role.
    pub(crate) fn user_of(identity: &Identity) -> Self {
        Self {
            subject_id: Some(identity.id().clone()),
            role: Role::User,
            acting_business_id: None,
        }
    }

    /// Context with the role fixed to `business` for the given tenant.
    pub(crate) fn business_of(identity: &Identity, business_id: BusinessId) -> Self {
        Self {
            subject_id: Some(identity.id().clone()),
            role: Role::Business,
            acting_business_id: Some(business_id),
        }
    }

    /// Admin context. Callers must have already verified the stored role.
    pub(crate) fn admin_of(identity: &Identity) -> Self {
        debug_assert!(identity.role().is_admin());
        Self {
            subject_id: Some(identity.id().clone()),
            role: Role::Admin,
            acting_business_id: None,
        }
    }

    /// Returns the subject ID, if the caller is authenticated.
    pub fn subject_id(&self) -> Option<&SubjectId> {
        self.subject_id.as_ref()
    }

    /// Returns the claimed role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the acting business ID, if this is a business context.
    pub fn acting_business_id(&self) -> Option<&BusinessId> {
        self.acting_business_id.as_ref()
    }

    /// Returns `true` for the anonymous context.
    pub fn is_anonymous(&self) -> bool {
        self.role == Role::Anonymous
    }

    /// The three values written to session state, in key order
    /// (`app.subject_id`, `app.role`, `app.acting_business_id`).
    ///
    /// Absent fields map to the empty string so every key is always
    /// written; policies treat empty and unset identically.
    pub(crate) fn session_values(&self) -> (String, String, String) {
        (
            self.subject_id
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            self.role.as_str().to_string(),
            self.acting_business_id
                .as_ref()
                .map(|b| b.as_str().to_string())
                .unwrap_or_default(),
        )
    }
}

/// Options for [`AccessContext::for_identity`].
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    /// The business the caller requests to operate as.
    pub acting_business_id: Option<BusinessId>,
}

impl ContextOptions {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn user_identity() -> Identity {
        Identity::new(7, Role::User, "Dana Ito", "dana@example.com")
    }

    fn admin_identity() -> Identity {
        Identity::new(1, Role::Admin, "Root", "root@example.com")
    }

    #[test]
    fn test_anonymous_context() {
        let ctx = AccessContext::anonymous();
        assert!(ctx.subject_id().is_none());
        assert_eq!(ctx.role(), Role::Anonymous);
        assert!(ctx.acting_business_id().is_none());
        assert!(ctx.is_anonymous());
    }

    #[test]
    fn test_identity_role_passes_through() {
        let ctx = AccessContext::for_identity(&user_identity(), ContextOptions::default());
        assert_eq!(ctx.subject_id().unwrap().as_str(), "7");
        assert_eq!(ctx.role(), Role::User);
        assert!(ctx.acting_business_id().is_none());
    }

    #[test]
    fn test_acting_business_forces_business_role() {
        let ctx = AccessContext::for_identity(
            &user_identity(),
            ContextOptions::new().acting_business(42),
        );
        assert_eq!(ctx.role(), Role::Business);
        assert_eq!(ctx.acting_business_id().unwrap().as_str(), "42");
    }

    #[test]
    fn test_admin_precedence_discards_acting_business() {
        let ctx = AccessContext::for_identity(
            &admin_identity(),
            ContextOptions::new().acting_business(42),
        );
        assert_eq!(ctx.role(), Role::Admin);
        assert!(ctx.acting_business_id().is_none());
    }

    #[test]
    fn test_session_values_for_business() {
        let ctx = AccessContext::business_of(&user_identity(), BusinessId::from(42));
        let (subject, role, business) = ctx.session_values();
        assert_eq!(subject, "7");
        assert_eq!(role, "business");
        assert_eq!(business, "42");
    }

    #[test]
    fn test_session_values_for_anonymous() {
        let (subject, role, business) = AccessContext::anonymous().session_values();
        assert_eq!(subject, "");
        assert_eq!(role, "none");
        assert_eq!(business, "");
    }

    #[test]
    fn test_user_of_ignores_stored_role() {
        let ctx = AccessContext::user_of(&admin_identity());
        assert_eq!(ctx.role(), Role::User);
        assert!(ctx.acting_business_id().is_none());
    }
}
