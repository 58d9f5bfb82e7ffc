//! Application route table and guarded navigation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::guard::{GuardDecision, RouteGuard, LOGIN_PATH, UNAUTHORIZED_PATH};
use crate::session::{Session, ROLE_ADMIN, ROLE_USER};

/// One navigable route. `guard == None` marks a public route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub name: String,
    /// Path pattern, `:param` segments capture one path segment
    pub pattern: String,
    pub guard: Option<RouteGuard>,
}

impl RouteDef {
    pub fn public(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            guard: None,
        }
    }

    pub fn protected(name: &str, pattern: &str, guard: RouteGuard) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            guard: Some(guard),
        }
    }

    pub fn is_public(&self) -> bool {
        self.guard.is_none()
    }

    fn matches(&self, segments: &[&str]) -> Option<BTreeMap<String, String>> {
        let pattern: Vec<&str> = split_segments(&self.pattern);
        if pattern.len() != segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (expected, actual) in pattern.iter().zip(segments) {
            if let Some(name) = expected.strip_prefix(':') {
                params.insert(name.to_string(), actual.to_string());
            } else if expected != actual {
                return None;
            }
        }
        Some(params)
    }
}

/// A resolved route and its captured parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub name: String,
    pub pattern: String,
    pub params: BTreeMap<String, String>,
}

/// Where a navigation ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(RouteMatch),
    Redirect(&'static str),
    NotFound,
}

/// Ordered route list; the first matching pattern wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDef>) -> Self {
        Self { routes }
    }

    /// The tournament manager's navigation map.
    pub fn standard() -> Self {
        let user = || RouteGuard::role(ROLE_USER);
        let admin = || RouteGuard::role(ROLE_ADMIN);

        Self::new(vec![
            RouteDef::public("login", LOGIN_PATH),
            RouteDef::public("unauthorized", UNAUTHORIZED_PATH),
            RouteDef::protected("home", "/", user()),
            RouteDef::protected("dashboard", "/dashboard", user()),
            RouteDef::protected("tournaments", "/tournaments", user()),
            RouteDef::protected("tournament", "/tournaments/:id", user()),
            RouteDef::protected("standings", "/tournaments/:id/standings", user()),
            RouteDef::protected("tournament_teams", "/tournaments/:id/teams", user()),
            RouteDef::protected("team", "/teams/:id", user()),
            RouteDef::protected("team_players", "/teams/:id/players", user()),
            RouteDef::protected("match", "/matches/:id", user()),
            RouteDef::protected("calendar", "/calendar", user()),
            RouteDef::protected("admin", "/admin", admin()),
            RouteDef::protected("organizers", "/admin/organizers", admin()),
        ])
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    /// Find the route for `path`. Query string, fragment and trailing slash
    /// are ignored.
    pub fn resolve(&self, path: &str) -> Option<(&RouteDef, RouteMatch)> {
        let segments = split_segments(strip_query(path));
        self.routes.iter().find_map(|route| {
            route.matches(&segments).map(|params| {
                (
                    route,
                    RouteMatch {
                        name: route.name.clone(),
                        pattern: route.pattern.clone(),
                        params,
                    },
                )
            })
        })
    }

    /// Resolve `path` and run its guard against `session`.
    pub fn navigate(&self, path: &str, session: &Session) -> Navigation {
        let Some((route, matched)) = self.resolve(path) else {
            return Navigation::NotFound;
        };

        let decision = route
            .guard
            .as_ref()
            .map_or(GuardDecision::Render, |guard| guard.evaluate(session));

        match decision.location() {
            None => Navigation::Render(matched),
            Some(location) => {
                tracing::debug!(route = %route.name, ?decision, "Navigation redirected");
                Navigation::Redirect(location)
            }
        }
    }
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Option<&str>) -> Session {
        match role {
            Some(role) => Session {
                is_authenticated: true,
                role: Some(role.to_string()),
            },
            None => Session::anonymous(),
        }
    }

    #[test]
    fn test_resolve_static_and_param_routes() {
        let table = RouteTable::standard();

        let (route, matched) = table.resolve("/dashboard").unwrap();
        assert_eq!(route.name, "dashboard");
        assert!(matched.params.is_empty());

        let (_, matched) = table.resolve("/tournaments/42/standings").unwrap();
        assert_eq!(matched.name, "standings");
        assert_eq!(matched.params.get("id").map(String::as_str), Some("42"));

        let (_, matched) = table.resolve("/").unwrap();
        assert_eq!(matched.name, "home");
    }

    #[test]
    fn test_resolve_ignores_query_and_trailing_slash() {
        let table = RouteTable::standard();
        let (_, matched) = table.resolve("/teams/7/?tab=roster#top").unwrap();
        assert_eq!(matched.name, "team");
        assert_eq!(matched.params.get("id").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_resolve_unknown_path() {
        let table = RouteTable::standard();
        assert!(table.resolve("/nowhere").is_none());
        assert!(table.resolve("/tournaments/1/fixtures").is_none());
        assert_eq!(table.navigate("/nowhere", &session(Some(ROLE_USER))), Navigation::NotFound);
    }

    #[test]
    fn test_public_routes_render_without_session() {
        let table = RouteTable::standard();
        for path in ["/login", "/unauthorized"] {
            assert!(matches!(table.navigate(path, &Session::anonymous()), Navigation::Render(_)));
        }
    }

    #[test]
    fn test_protected_route_without_session_redirects_to_login() {
        let table = RouteTable::standard();
        assert_eq!(table.navigate("/admin", &session(None)), Navigation::Redirect("/login"));
        assert_eq!(table.navigate("/calendar", &session(None)), Navigation::Redirect("/login"));
    }

    #[test]
    fn test_user_session_navigation() {
        let table = RouteTable::standard();
        let user = session(Some(ROLE_USER));

        match table.navigate("/matches/9", &user) {
            Navigation::Render(matched) => {
                assert_eq!(matched.name, "match");
                assert_eq!(matched.params.get("id").map(String::as_str), Some("9"));
            }
            other => panic!("expected render, got {:?}", other),
        }
        assert_eq!(table.navigate("/admin/organizers", &user), Navigation::Redirect("/unauthorized"));
    }

    #[test]
    fn test_admin_session_navigation() {
        let table = RouteTable::standard();
        let admin = session(Some(ROLE_ADMIN));

        assert!(matches!(table.navigate("/admin", &admin), Navigation::Render(_)));
        assert_eq!(table.navigate("/dashboard", &admin), Navigation::Redirect("/unauthorized"));
    }

    #[test]
    fn test_custom_table_first_match_wins() {
        let table = RouteTable::new(vec![
            RouteDef::public("new_team", "/teams/new"),
            RouteDef::protected("team", "/teams/:id", RouteGuard::authenticated()),
        ]);
        let (_, matched) = table.resolve("/teams/new").unwrap();
        assert_eq!(matched.name, "new_team");
        assert!(matches!(table.navigate("/teams/3", &session(Some("ANY"))), Navigation::Render(_)));
    }
}
