//! Auth provider contract.

use crate::errors::Result;
use crate::types::UserProfile;
use async_trait::async_trait;

/// Read-only view onto the authenticated session.
///
/// Components never reach for an ambient current-user global; whoever wires
/// them up asks the provider once and passes the profile (or just the uid)
/// down explicitly. Credentials and session lifecycle stay behind this trait.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The signed-in user's display attributes.
    async fn current_user(&self) -> Result<UserProfile>;
}

#[async_trait]
impl<T: AuthProvider + ?Sized> AuthProvider for std::sync::Arc<T> {
    async fn current_user(&self) -> Result<UserProfile> {
        (**self).current_user().await
    }
}
