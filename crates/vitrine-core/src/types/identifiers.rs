//! Core identifier types used across the Vitrine workspace
//!
//! All upstream services key their records with opaque strings (document ids,
//! channel keys, auth uids), so the newtypes here wrap `String` rather than a
//! structured id. Wrapping keeps the signatures honest: a `ChannelId` cannot
//! silently be passed where a `UserId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an upstream key
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// View the raw key
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// Stable identifier of an authenticated user (auth provider uid)
    UserId
}

string_id! {
    /// Key of a chat channel in the realtime store
    ChannelId
}

string_id! {
    /// Key of a single chat message within its channel
    MessageId
}

string_id! {
    /// Document id of a stored system notification
    NotificationId
}

/// Display attributes of the current user, as supplied by the auth provider.
///
/// The core only ever reads these three fields; credentials and session
/// management stay entirely inside the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable user identifier
    pub uid: UserId,
    /// Human-readable display name
    pub display_name: String,
    /// Avatar URL, if the user has one
    pub photo_url: Option<String>,
}

impl UserProfile {
    /// Create a profile with a display name and no avatar
    pub fn new(uid: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
            photo_url: None,
        }
    }

    /// Attach an avatar URL
    pub fn with_photo(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }
}

/// A BCP-47-ish locale code ("en", "de", "fr", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Wrap a locale code
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// View the raw code
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The default authoring locale of the content drafts
    pub fn english() -> Self {
        Self("en".to_owned())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = ChannelId::new("ch-42");
        assert_eq!(id.as_str(), "ch-42");
        assert_eq!(id.to_string(), "ch-42");
        assert_eq!(ChannelId::from("ch-42"), id);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = UserId::new("u1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"u1\"");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_profile_builder() {
        let profile = UserProfile::new("u1", "Dana").with_photo("https://cdn/p.png");
        assert_eq!(profile.uid.as_str(), "u1");
        assert_eq!(profile.photo_url.as_deref(), Some("https://cdn/p.png"));
    }
}
