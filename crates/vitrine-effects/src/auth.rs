//! Auth handler.

use async_trait::async_trait;
use vitrine_core::effects::AuthProvider;
use vitrine_core::types::UserProfile;
use vitrine_core::Result;

/// Auth provider with a fixed signed-in user.
///
/// Used for local development and tests; a production handler would wrap the
/// hosting shell's session.
#[derive(Debug, Clone)]
pub struct StaticAuthProvider {
    profile: UserProfile,
}

impl StaticAuthProvider {
    /// Sign in as the given profile.
    pub fn new(profile: UserProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn current_user(&self) -> Result<UserProfile> {
        Ok(self.profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_resolves_the_fixed_profile_through_the_trait() {
        let auth: Arc<dyn AuthProvider> =
            Arc::new(StaticAuthProvider::new(UserProfile::new("u-1", "Dana")));
        let profile = auth.current_user().await.unwrap();
        assert_eq!(profile.uid.as_str(), "u-1");
        assert_eq!(profile.display_name, "Dana");
    }
}
