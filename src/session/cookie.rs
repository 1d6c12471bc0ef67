use std::fmt::{self, Display};

pub const SESSION_COOKIE_NAME: &str = "__session";

/// One year, in seconds.
pub const SESSION_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// Finds a cookie value in a `Cookie` request header.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
}

/// A `Set-Cookie` header value scoped to the whole site and hidden from
/// scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub max_age: u64,
}

impl SetCookie {
    pub fn session(value: String) -> Self {
        Self {
            name: SESSION_COOKIE_NAME.to_string(),
            value,
            max_age: SESSION_MAX_AGE,
        }
    }
}

impl Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
            self.name, self.value, self.max_age
        )
    }
}
