//! Session derivation.
//!
//! A [`Session`] is never stored. It is recomputed from the persisted token on
//! every read, so login and logout take effect on the next derivation.

use serde::{Deserialize, Serialize};

use crate::claims::decode_claims;
use crate::store::SessionStore;

/// Organizer role.
pub const ROLE_USER: &str = "USER";

/// Administrator role, manages organizer accounts.
pub const ROLE_ADMIN: &str = "ADMIN";

/// Authentication state derived from the bearer token.
///
/// `role` is `None` whenever `is_authenticated` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_authenticated: bool,
    pub role: Option<String>,
}

impl Session {
    /// The unauthenticated session.
    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            role: None,
        }
    }

    /// Derive a session from an optional raw token.
    ///
    /// Absent and undecodable tokens both yield [`Session::anonymous`].
    pub fn from_token(token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Self::anonymous();
        };

        match decode_claims(token) {
            Ok(claims) => Self {
                is_authenticated: true,
                role: Some(claims.role),
            },
            Err(e) => {
                tracing::debug!(error = %e, "Token rejected, treating session as anonymous");
                Self::anonymous()
            }
        }
    }

    /// True when authenticated with exactly `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.is_authenticated && self.role.as_deref() == Some(role)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Read the persisted token and derive the current session.
pub fn derive_session<S: SessionStore + ?Sized>(store: &S) -> Session {
    Session::from_token(store.get().as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::test_tokens::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_absent_token_is_anonymous() {
        let store = MemoryStore::new();
        assert_eq!(derive_session(&store), Session::anonymous());
        assert_eq!(Session::from_token(None), Session::anonymous());
    }

    #[test]
    fn test_malformed_tokens_are_anonymous() {
        let cases = [
            "".to_string(),
            "garbage".to_string(),
            "a.b".to_string(),
            "a.b.c.d".to_string(),
            "a.%%%.c".to_string(),
            token_with_payload("[1,2,3]"),
            token_with_payload(r#"{"sub":"no-role"}"#),
            token_with_payload(r#"{"role":7}"#),
        ];
        for token in cases {
            let session = Session::from_token(Some(&token));
            assert!(!session.is_authenticated, "token {:?}", token);
            assert_eq!(session.role, None, "token {:?}", token);
        }
    }

    #[test]
    fn test_well_formed_token_carries_role() {
        for role in [ROLE_USER, ROLE_ADMIN, "REFEREE"] {
            let store = MemoryStore::with_token(token_with_role(role));
            let session = derive_session(&store);
            assert!(session.is_authenticated);
            assert_eq!(session.role.as_deref(), Some(role));
        }
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let store = MemoryStore::with_token(token_with_role(ROLE_USER));
        assert_eq!(derive_session(&store), derive_session(&store));

        let store = MemoryStore::with_token("broken");
        assert_eq!(derive_session(&store), derive_session(&store));
    }

    #[test]
    fn test_rederived_after_login_and_logout() {
        let store = MemoryStore::new();
        assert!(!derive_session(&store).is_authenticated);

        store.set(&token_with_role(ROLE_ADMIN)).unwrap();
        assert!(derive_session(&store).has_role(ROLE_ADMIN));

        store.clear().unwrap();
        assert_eq!(derive_session(&store), Session::anonymous());
    }

    #[test]
    fn test_derive_through_trait_object() {
        let store: Box<dyn SessionStore> = Box::new(MemoryStore::with_token(token_with_role(ROLE_USER)));
        assert!(derive_session(store.as_ref()).has_role(ROLE_USER));
    }

    #[test]
    fn test_session_json_shape() {
        let session = Session {
            is_authenticated: true,
            role: Some(ROLE_USER.to_string()),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json, serde_json::json!({"isAuthenticated": true, "role": "USER"}));

        let anonymous = serde_json::to_value(Session::anonymous()).unwrap();
        assert_eq!(anonymous, serde_json::json!({"isAuthenticated": false, "role": null}));
    }
}
