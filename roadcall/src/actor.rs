//! Actor identity types.
//!
//! The identity/auth collaborator authenticates callers and hands the core a
//! tagged [`Actor`] value on every inbound action. The core trusts this
//! identity without re-verifying credentials, and never inspects ambient
//! session state.

use std::fmt;

/// Opaque identity for a requester or provider account.
///
/// Issued by the identity collaborator; the core only compares these for
/// equality and orders them for deterministic tie-breaking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartyId(String);

impl PartyId {
    /// Wrap an identity token.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identity token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PartyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Which side of a request an actor is acting as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    /// The actor seeking service.
    Requester,
    /// The actor offering service.
    Provider,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRole::Requester => f.write_str("requester"),
            ActorRole::Provider => f.write_str("provider"),
        }
    }
}

/// An authenticated caller: identity plus the role it is acting under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Authenticated identity.
    pub id: PartyId,
    /// Role supplied by the auth collaborator.
    pub role: ActorRole,
}

impl Actor {
    /// An actor acting as a requester.
    pub fn requester(id: impl Into<PartyId>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Requester,
        }
    }

    /// An actor acting as a provider.
    pub fn provider(id: impl Into<PartyId>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Provider,
        }
    }
}
