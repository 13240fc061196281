//! Session domain model.
//!
//! A [`Session`] is the client's belief about its standing with the auth
//! service. The profile only exists on the authenticated variant, so "profile
//! present iff authenticated" cannot be violated.

use serde::{Deserialize, Serialize};

/// Profile returned by the auth service for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub given_name: String,
    pub family_name: String,
    pub email: String,
}

/// Wire body of `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthMeResponse {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

/// Wire body of `POST /auth/refresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub success: bool,
}

/// The authenticated user's standing with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// No valid session (never checked, logged out, or expired).
    #[default]
    Anonymous,
    /// Signed in, with the profile reported by the auth service.
    Authenticated(UserProfile),
}

impl Session {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Authenticated(profile) => Some(profile),
            Self::Anonymous => None,
        }
    }

    /// "Given Family", or an empty string when anonymous.
    ///
    /// # Examples
    ///
    /// ```
    /// use shoplist::domain::{Session, UserProfile};
    ///
    /// let session = Session::Authenticated(UserProfile {
    ///     given_name: "Ada".into(),
    ///     family_name: "Lovelace".into(),
    ///     email: "ada@example.com".into(),
    /// });
    /// assert_eq!(session.full_name(), "Ada Lovelace");
    /// assert_eq!(Session::Anonymous.full_name(), "");
    /// ```
    #[must_use]
    pub fn full_name(&self) -> String {
        self.profile()
            .map(|p| format!("{} {}", p.given_name, p.family_name))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn email(&self) -> &str {
        self.profile().map_or("", |p| p.email.as_str())
    }
}

impl From<AuthMeResponse> for Session {
    /// An `authenticated: true` body without a profile is treated as anonymous.
    fn from(response: AuthMeResponse) -> Self {
        match (response.authenticated, response.profile) {
            (true, Some(profile)) => Self::Authenticated(profile),
            _ => Self::Anonymous,
        }
    }
}
