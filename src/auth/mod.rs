//! Single-credential admin authentication: a peppered password check plus a
//! signed session cookie carrying the `logged_in` flag.

pub mod password;
pub mod session;

pub use password::{hash_password, PasswordChecker};
pub use session::{
    clear_session_cookie, session_cookie, session_token, SessionClaims, SessionError,
    SessionSigner, SESSION_COOKIE,
};
