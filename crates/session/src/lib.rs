//! Pitchside Session Library
//!
//! Client-side authorization core for the Pitchside tournament manager:
//!
//! - **Session derivation**: turn the persisted bearer token into a
//!   [`Session`] (authenticated or not, and which role)
//! - **Credential storage**: the [`SessionStore`] abstraction over the single
//!   `"token"` entry, with in-memory and file-backed implementations
//! - **Route guarding**: [`RouteGuard`] decides between rendering a protected
//!   page and redirecting to `/login` or `/unauthorized`
//! - **Navigation**: the application [`RouteTable`] resolves paths and runs the
//!   guard for each protected route
//!
//! ## Trust boundary
//!
//! Token claims are decoded but never verified here. The guard only keeps
//! users away from pages they cannot use; the backend re-authorizes every API
//! call and remains the enforcement point.
//!
//! ## Example
//!
//! ```
//! use pitchside_session::{derive_session, MemoryStore, Navigation, RouteTable};
//!
//! let store = MemoryStore::new();
//! let session = derive_session(&store);
//! assert!(!session.is_authenticated);
//!
//! let routes = RouteTable::standard();
//! assert_eq!(
//!     routes.navigate("/dashboard", &session),
//!     Navigation::Redirect("/login"),
//! );
//! ```

pub mod claims;
pub mod error;
pub mod guard;
pub mod routes;
pub mod session;
pub mod store;

pub use claims::{decode_claims, TokenClaims};
pub use error::{DecodeError, StoreError};
pub use guard::{GuardDecision, RouteGuard, LOGIN_PATH, UNAUTHORIZED_PATH};
pub use routes::{Navigation, RouteDef, RouteMatch, RouteTable};
pub use session::{derive_session, Session, ROLE_ADMIN, ROLE_USER};
pub use store::{FileStore, MemoryStore, SessionStore, TOKEN_KEY};
