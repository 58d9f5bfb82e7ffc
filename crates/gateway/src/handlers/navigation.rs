//! Guarded navigation over the application route table.
//!
//! Every `GET` that is not an API route lands here. The path is resolved
//! against the route table and the route's guard decides between serving the
//! application shell and redirecting to `/login` or `/unauthorized`.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use pitchside_session::{Navigation, RouteMatch, Session};

use crate::state::AppState;

pub async fn navigate(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let path = uri.path();
    match state.routes.navigate(path, &session) {
        Navigation::Render(matched) => {
            tracing::debug!(path, route = %matched.name, "Rendering route");
            Html(render_shell(&state, Some(&matched))).into_response()
        }
        Navigation::Redirect(location) => {
            tracing::info!(path, location, "Redirecting navigation");
            Redirect::to(location).into_response()
        }
        Navigation::NotFound => {
            tracing::debug!(path, "No route matched");
            (StatusCode::NOT_FOUND, Html(render_shell(&state, None))).into_response()
        }
    }
}

fn render_shell(state: &AppState, matched: Option<&RouteMatch>) -> String {
    match state.shell.as_deref() {
        Some(html) => html.to_string(),
        None => builtin_shell(matched),
    }
}

fn builtin_shell(matched: Option<&RouteMatch>) -> String {
    let (route, params) = match matched {
        Some(m) => (
            m.name.clone(),
            serde_json::to_string(&m.params).unwrap_or_else(|_| "{}".to_string()),
        ),
        None => ("not_found".to_string(), "{}".to_string()),
    };

    format!(
        concat!(
            "<!doctype html>\n",
            "<html lang=\"en\">\n",
            "<head><meta charset=\"utf-8\"><title>Pitchside</title></head>\n",
            "<body><div id=\"root\" data-route=\"{}\" data-params=\"{}\"></div></body>\n",
            "</html>\n"
        ),
        html_escape::encode_double_quoted_attribute(&route),
        html_escape::encode_double_quoted_attribute(&params)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_builtin_shell_names_route() {
        let matched = RouteMatch {
            name: "team".to_string(),
            pattern: "/teams/:id".to_string(),
            params: BTreeMap::from([("id".to_string(), "7".to_string())]),
        };
        let html = builtin_shell(Some(&matched));
        assert!(html.contains("data-route=\"team\""));
        assert!(html.contains("data-params=\"{&quot;id&quot;:&quot;7&quot;}\""));
    }

    #[test]
    fn test_builtin_shell_escapes_params() {
        let matched = RouteMatch {
            name: "team".to_string(),
            pattern: "/teams/:id".to_string(),
            params: BTreeMap::from([("id".to_string(), "<script>".to_string())]),
        };
        let html = builtin_shell(Some(&matched));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_builtin_shell_escapes_quotes_and_ampersands() {
        let matched = RouteMatch {
            name: "team".to_string(),
            pattern: "/teams/:id".to_string(),
            params: BTreeMap::from([("id".to_string(), "a\"b&c".to_string())]),
        };
        let html = builtin_shell(Some(&matched));
        // serde_json escapes the quote, the attribute encoder escapes both quotes and `&`
        assert!(html.contains("data-params=\"{&quot;id&quot;:&quot;a\\&quot;b&amp;c&quot;}\""));
    }

    #[test]
    fn test_builtin_shell_not_found() {
        assert!(builtin_shell(None).contains("data-route=\"not_found\""));
    }
}
