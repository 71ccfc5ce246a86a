//! Route table and navigation menu.
//!
//! Every page of the dashboard is a [`Route`]. Protected routes go through
//! the [`guard`](crate::guard::guard); the auth routes (login, signup) send
//! an already signed-in user to the landing page instead.

use road_safety_session_models::{Role, Session};

use crate::guard::{GuardDecision, guard};

/// A page of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Predict,
    Analysis,
    Profile,
    Admin,
    Login,
    Signup,
}

impl Route {
    /// Order in which protected pages appear in the navigation menu.
    const MENU: &[Self] = &[
        Self::Home,
        Self::Predict,
        Self::Analysis,
        Self::Profile,
        Self::Admin,
    ];

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Home,
            Self::Predict,
            Self::Analysis,
            Self::Profile,
            Self::Admin,
            Self::Login,
            Self::Signup,
        ]
    }

    /// URL path of this page.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Predict => "/predict",
            Self::Analysis => "/analysis",
            Self::Profile => "/profile",
            Self::Admin => "/admin",
            Self::Login => "/login",
            Self::Signup => "/signup",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Dashboard",
            Self::Predict => "Predict",
            Self::Analysis => "Analysis",
            Self::Profile => "Profile",
            Self::Admin => "Admin",
            Self::Login => "Login",
            Self::Signup => "Sign up",
        }
    }

    /// Role needed to view this page, or `None` for the public auth pages.
    #[must_use]
    pub const fn required_role(self) -> Option<Role> {
        match self {
            Self::Home | Self::Predict | Self::Analysis | Self::Profile => Some(Role::User),
            Self::Admin => Some(Role::Admin),
            Self::Login | Self::Signup => None,
        }
    }

    /// Looks up the route for `path`. A single trailing slash is ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };
        Self::all().iter().copied().find(|r| r.path() == trimmed)
    }
}

/// Result of navigating to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Show this page.
    Render(Route),
    /// Navigate to this page instead.
    Redirect(Route),
    /// No page matches the path.
    NotFound,
}

/// Resolves a navigation request for `path` given the current session.
#[must_use]
pub fn resolve(path: &str, session: Option<&Session>) -> RouteOutcome {
    let Some(route) = Route::from_path(path) else {
        return RouteOutcome::NotFound;
    };

    let Some(required) = route.required_role() else {
        return if session.is_some_and(Session::is_valid) {
            RouteOutcome::Redirect(Route::Home)
        } else {
            RouteOutcome::Render(route)
        };
    };

    match guard(session, required) {
        GuardDecision::Render => RouteOutcome::Render(route),
        GuardDecision::RedirectToLogin => RouteOutcome::Redirect(Route::Login),
        GuardDecision::RedirectToLanding => RouteOutcome::Redirect(Route::Home),
    }
}

/// Menu entries visible to `session`. Empty when signed out, since the
/// header is hidden.
#[must_use]
pub fn navigation_items(session: Option<&Session>) -> Vec<Route> {
    let Some(session) = session.filter(|s| s.is_valid()) else {
        return Vec::new();
    };

    Route::MENU
        .iter()
        .copied()
        .filter(|r| r.required_role().is_some_and(|role| session.has_role(role)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use road_safety_session_models::ContactDetails;

    use super::*;

    fn session(role: Role) -> Session {
        Session {
            id: "1".to_string(),
            name: "a".to_string(),
            email: "a@b.com".to_string(),
            role,
            token: "t".to_string(),
            created_at: Utc::now(),
            updated_at: None,
            contact: ContactDetails::default(),
        }
    }

    #[test]
    fn paths_are_unique_and_resolvable() {
        for route in Route::all() {
            assert_eq!(Route::from_path(route.path()), Some(*route));
        }
        assert_eq!(Route::from_path("/predict/"), Some(Route::Predict));
        assert_eq!(Route::from_path("/history"), None);
    }

    #[test]
    fn signed_out_user_is_sent_to_login() {
        assert_eq!(resolve("/", None), RouteOutcome::Redirect(Route::Login));
        assert_eq!(resolve("/admin", None), RouteOutcome::Redirect(Route::Login));
        assert_eq!(resolve("/login", None), RouteOutcome::Render(Route::Login));
        assert_eq!(resolve("/signup", None), RouteOutcome::Render(Route::Signup));
    }

    #[test]
    fn signed_in_user_skips_auth_pages() {
        let user = session(Role::User);
        assert_eq!(
            resolve("/login", Some(&user)),
            RouteOutcome::Redirect(Route::Home)
        );
        assert_eq!(
            resolve("/analysis", Some(&user)),
            RouteOutcome::Render(Route::Analysis)
        );
        assert_eq!(
            resolve("/admin", Some(&user)),
            RouteOutcome::Redirect(Route::Home)
        );
        assert_eq!(resolve("/nope", Some(&user)), RouteOutcome::NotFound);
    }

    #[test]
    fn admin_sees_admin_page() {
        let admin = session(Role::Admin);
        assert_eq!(
            resolve("/admin", Some(&admin)),
            RouteOutcome::Render(Route::Admin)
        );
    }

    #[test]
    fn navigation_filters_by_role() {
        assert!(navigation_items(None).is_empty());

        let user_items = navigation_items(Some(&session(Role::User)));
        assert_eq!(
            user_items,
            vec![Route::Home, Route::Predict, Route::Analysis, Route::Profile]
        );

        let admin_items = navigation_items(Some(&session(Role::Admin)));
        assert_eq!(admin_items.last(), Some(&Route::Admin));
        assert_eq!(admin_items.len(), 5);
    }
}
