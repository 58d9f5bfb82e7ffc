//! Role-based route guard.

use serde::Serialize;

use crate::session::Session;

/// Login entry point.
pub const LOGIN_PATH: &str = "/login";

/// Entry point shown when the session lacks the required role.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Outcome of guarding one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardDecision {
    /// Render the protected content unchanged
    Render,
    /// Not authenticated
    RedirectToLogin,
    /// Authenticated with the wrong role
    RedirectToUnauthorized,
}

impl GuardDecision {
    /// Redirect target, or `None` when the content renders.
    pub fn location(&self) -> Option<&'static str> {
        match self {
            GuardDecision::Render => None,
            GuardDecision::RedirectToLogin => Some(LOGIN_PATH),
            GuardDecision::RedirectToUnauthorized => Some(UNAUTHORIZED_PATH),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }
}

/// Gate for a protected subtree, optionally restricted to one role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGuard {
    required_role: Option<String>,
}

impl RouteGuard {
    /// Guard that only requires authentication.
    pub fn authenticated() -> Self {
        Self { required_role: None }
    }

    /// Guard that requires authentication and exactly `role`.
    pub fn role(role: impl Into<String>) -> Self {
        Self {
            required_role: Some(role.into()),
        }
    }

    pub fn required_role(&self) -> Option<&str> {
        self.required_role.as_deref()
    }

    /// Decide for `session`. First matching rule wins:
    /// unauthenticated sessions go to login, then a role mismatch goes to
    /// unauthorized, otherwise the content renders.
    pub fn evaluate(&self, session: &Session) -> GuardDecision {
        if !session.is_authenticated {
            return GuardDecision::RedirectToLogin;
        }
        match self.required_role.as_deref() {
            Some(required) if session.role.as_deref() != Some(required) => {
                GuardDecision::RedirectToUnauthorized
            }
            _ => GuardDecision::Render,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ROLE_ADMIN, ROLE_USER};

    fn session(role: &str) -> Session {
        Session {
            is_authenticated: true,
            role: Some(role.to_string()),
        }
    }

    #[test]
    fn test_unauthenticated_always_goes_to_login() {
        let anonymous = Session::anonymous();
        for guard in [
            RouteGuard::authenticated(),
            RouteGuard::role(ROLE_USER),
            RouteGuard::role(ROLE_ADMIN),
        ] {
            let decision = guard.evaluate(&anonymous);
            assert_eq!(decision, GuardDecision::RedirectToLogin);
            assert_eq!(decision.location(), Some("/login"));
            assert!(!decision.is_allowed());
        }
    }

    #[test]
    fn test_matching_role_renders() {
        let decision = RouteGuard::role(ROLE_USER).evaluate(&session(ROLE_USER));
        assert_eq!(decision, GuardDecision::Render);
        assert_eq!(decision.location(), None);
    }

    #[test]
    fn test_wrong_role_goes_to_unauthorized() {
        let decision = RouteGuard::role(ROLE_ADMIN).evaluate(&session(ROLE_USER));
        assert_eq!(decision, GuardDecision::RedirectToUnauthorized);
        assert_eq!(decision.location(), Some("/unauthorized"));
    }

    #[test]
    fn test_admin_is_not_a_superset_of_user() {
        let decision = RouteGuard::role(ROLE_USER).evaluate(&session(ROLE_ADMIN));
        assert_eq!(decision, GuardDecision::RedirectToUnauthorized);
    }

    #[test]
    fn test_no_required_role_skips_role_check() {
        let decision = RouteGuard::authenticated().evaluate(&session(ROLE_ADMIN));
        assert_eq!(decision, GuardDecision::Render);
        assert_eq!(RouteGuard::default(), RouteGuard::authenticated());
    }

    #[test]
    fn test_role_comparison_is_exact() {
        let decision = RouteGuard::role(ROLE_USER).evaluate(&session("user"));
        assert_eq!(decision, GuardDecision::RedirectToUnauthorized);
    }
}
