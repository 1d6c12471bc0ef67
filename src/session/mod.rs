//! Client-side session persistence in a signed cookie.

mod cookie;
mod session_state;
mod session_store;

pub use cookie::{SESSION_COOKIE_NAME, SESSION_MAX_AGE, SetCookie, find_cookie};
pub use session_state::SessionState;
pub use session_store::{
    SessionDecodeError, SessionEncodeError, SessionStore, SessionStoreCreationError,
};
