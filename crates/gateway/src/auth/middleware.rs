use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use pitchside_session::{derive_session, MemoryStore, TOKEN_KEY};

/// Derive the caller's session and inject it into request extensions.
///
/// The session is recomputed for every request from the credential the
/// request carries; nothing is cached between requests. Requests are never
/// rejected here, guarding happens per route.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let store = request_store(request.headers());
    let session = derive_session(&store);

    tracing::debug!(
        path = %request.uri().path(),
        authenticated = session.is_authenticated,
        role = ?session.role,
        "Derived session"
    );

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Per-request credential store loaded from the request headers.
pub fn request_store(headers: &HeaderMap) -> MemoryStore {
    match extract_token(headers) {
        Some(token) => MemoryStore::with_token(token),
        None => MemoryStore::new(),
    }
}

/// Extract the bearer token from request headers or cookies
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    // Try Authorization header first: "Bearer <token>"
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let token = token.trim();
                if !token.is_empty() {
                    return Some(token);
                }
            }
        }
    }

    // Try Cookie header: "token=<token>"
    for cookie_header in headers.get_all(header::COOKIE) {
        let Ok(cookie_str) = cookie_header.to_str() else {
            continue;
        };
        for cookie in cookie_str.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=') {
                if name == TOKEN_KEY && !value.is_empty() {
                    return Some(value);
                }
            }
        }
    }

    None
}
