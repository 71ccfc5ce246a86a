#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session, role, and credential types for the road safety client.
//!
//! A [`Session`] is the locally held record asserting who is using the
//! client and with what [`Role`]. It is serialized as camelCase JSON so the
//! stored record stays compatible with the browser client's format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Access level of a signed-in user.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Regular analyst. Every signed-in user qualifies.
    #[default]
    User,
    /// Administrator with access to system statistics.
    Admin,
}

/// The client's record of the signed-in user.
///
/// Every field carries a serde default so that partially written records
/// still deserialize; [`Session::is_valid`] decides whether the result
/// counts as a session at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque user identifier.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Access level.
    #[serde(default)]
    pub role: Role,
    /// Opaque bearer token issued at login.
    #[serde(default)]
    pub token: String,
    /// When the session was issued.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// When the profile was last edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Optional contact details from the profile page.
    #[serde(default, flatten)]
    pub contact: ContactDetails,
}

/// Contact details a user may add on the profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Session {
    /// A session counts only when both token and email are non-empty.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty() && !self.email.is_empty()
    }

    /// Whether this session satisfies `required`.
    ///
    /// [`Role::User`] is satisfied by every session.
    #[must_use]
    pub fn has_role(&self, required: Role) -> bool {
        required == Role::User || self.role == required
    }
}

/// Credentials submitted to the login operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// Fields submitted to the signup operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

impl SignupRequest {
    /// Whether email and password are both present.
    #[must_use]
    pub fn has_required_fields(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

/// Raw contents of the signup form before submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_terms: bool,
}

impl SignupForm {
    /// Checks the client-side form rules and produces the request to submit.
    ///
    /// # Errors
    ///
    /// Returns [`SignupFormError`] if the passwords differ or the terms were
    /// not accepted.
    pub fn validate(self) -> Result<SignupRequest, SignupFormError> {
        if self.password != self.confirm_password {
            return Err(SignupFormError::PasswordMismatch);
        }
        if !self.agree_terms {
            return Err(SignupFormError::TermsNotAccepted);
        }
        Ok(SignupRequest {
            name: self.name,
            email: self.email,
            password: self.password,
        })
    }
}

/// Client-side signup form rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupFormError {
    /// Password and confirmation differ.
    PasswordMismatch,
    /// The terms and conditions box was left unchecked.
    TermsNotAccepted,
}

impl std::fmt::Display for SignupFormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PasswordMismatch => write!(f, "Passwords do not match"),
            Self::TermsNotAccepted => write!(f, "You must agree to the terms and conditions"),
        }
    }
}

impl std::error::Error for SignupFormError {}

/// Profile edits applied to the current session.
///
/// `None` leaves a field unchanged. An empty contact field removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}
