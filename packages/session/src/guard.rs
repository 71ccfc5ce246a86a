//! Page access decisions.

use road_safety_session_models::{Role, Session};

/// Outcome of checking a session against a page's required role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the page.
    Render,
    /// No valid session; send the user to the login page.
    RedirectToLogin,
    /// Signed in but under-privileged; send the user to the landing page.
    RedirectToLanding,
}

/// Decides whether a page requiring `required` may be shown to `session`.
///
/// A session that fails [`Session::is_valid`] is treated as absent.
#[must_use]
pub fn guard(session: Option<&Session>, required: Role) -> GuardDecision {
    match session {
        Some(session) if session.is_valid() => {
            if session.has_role(required) {
                GuardDecision::Render
            } else {
                GuardDecision::RedirectToLanding
            }
        }
        _ => GuardDecision::RedirectToLogin,
    }
}
