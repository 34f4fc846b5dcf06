//! Auth
//!
//! The admin dashboard gate. Identity itself lives with a third-party
//! provider behind [`AuthProvider`]; this module only decides who may enter:
//! a single allowed account, everyone else signed out on the spot.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::warn;

/// The only account allowed into the dashboard.
pub const ADMIN_UID: &str = "JC6P8EQrLBOc9fzKm3XdXkKGb0i1";

/// An authenticated identity as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Provider-assigned user identifier.
    pub uid: String,

    /// Display name, when the provider shares one.
    pub display_name: Option<String>,
}

/// Errors from the sign-in flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The account is authenticated but not allowed into the dashboard.
    #[error("access denied; this account cannot enter the dashboard")]
    AccessDenied,

    /// The identity provider failed or rejected the operation.
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Boundary toward the hosted identity provider.
#[automock]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Run the interactive sign-in and return the authenticated identity.
    async fn sign_in(&self) -> Result<AuthUser, AuthError>;

    /// Terminate the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Admission control for the admin surface.
#[derive(Debug, Clone)]
pub struct AdminGate {
    allowed_uid: String,
}

impl Default for AdminGate {
    fn default() -> Self {
        AdminGate::new(ADMIN_UID)
    }
}

impl AdminGate {
    /// A gate admitting only the given uid.
    pub fn new(allowed_uid: impl Into<String>) -> Self {
        AdminGate {
            allowed_uid: allowed_uid.into(),
        }
    }

    /// Sign in through the provider and admit the user if allowed.
    ///
    /// Any other authenticated identity is signed out immediately and
    /// rejected; there is no partial access.
    ///
    /// # Errors
    ///
    /// [`AuthError::AccessDenied`] for a disallowed account,
    /// [`AuthError::Provider`] when the provider itself fails.
    pub async fn authorize(&self, provider: &dyn AuthProvider) -> Result<AuthUser, AuthError> {
        let user = provider.sign_in().await?;

        if user.uid != self.allowed_uid {
            warn!(uid = %user.uid, "rejected dashboard sign-in from unauthorized account");

            if let Err(error) = provider.sign_out().await {
                warn!("failed to sign out rejected account: {error}");
            }

            return Err(AuthError::AccessDenied);
        }

        Ok(user)
    }
}
