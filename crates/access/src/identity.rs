//! Identity records and the resolution seams.
//!
//! The identity provider (session tokens, OIDC, whatever the edge uses)
//! and the directory table that maps its subjects to internal records are
//! both external collaborators. This module defines the read-only shapes
//! this crate consumes and the two async traits it calls through:
//! [`IdentityResolver`] for "who is the current caller" and
//! [`DirectoryLookup`] for the internal record. Tests substitute
//! deterministic in-memory implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::{Role, SubjectId};
use crate::error::AccessResult;

/// An internal directory identity record.
///
/// Owned by the directory; this crate only reads it. The stored [`Role`]
/// is authoritative: the admin wrapper validates against it before
/// opening any connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: SubjectId,
    role: Role,
    display_name: String,
    email: String,
}

impl Identity {
    /// Creates an identity record.
    pub fn new(
        id: impl Into<SubjectId>,
        role: Role,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            display_name: display_name.into(),
            email: email.into(),
        }
    }

    /// Returns the internal subject ID.
    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    /// Returns the stored role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// The opaque identity produced by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    subject: String,
    email: Option<String>,
    /// Raw provider claims, passed through untouched for collaborator
    /// layers. This crate never reads them.
    #[serde(default)]
    claims: serde_json::Value,
}

impl ExternalIdentity {
    /// Creates an external identity from the provider's subject claim.
    pub fn new(subject: impl Into<String>, email: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            email,
            claims: serde_json::Value::Null,
        }
    }

    /// Attaches the raw claims payload from the provider.
    pub fn with_claims(mut self, claims: serde_json::Value) -> Self {
        self.claims = claims;
        self
    }

    /// Returns the provider's stable subject identifier.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the email reported by the provider, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the raw provider claims.
    pub fn claims(&self) -> &serde_json::Value {
        &self.claims
    }
}

/// Resolves the current caller from ambient request state.
///
/// Implemented by the collaborator layer that owns sessions/tokens.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Returns the current caller's external identity, or `None` for an
    /// unauthenticated request.
    async fn resolve_current(&self) -> AccessResult<Option<ExternalIdentity>>;
}

/// Maps an external subject to the internal directory record.
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    /// Returns the internal identity for the given external subject, or
    /// `None` when no directory record exists yet.
    async fn lookup_internal(&self, external_subject: &str) -> AccessResult<Option<Identity>>;
}
