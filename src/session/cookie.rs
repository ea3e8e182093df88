//! The `token` cookie: reading it off requests, clearing it, and picking it
//! out of `Set-Cookie` answers on the client side.

use axum::http::{header, HeaderMap, HeaderValue};

/// Name of the cookie holding the session credential.
pub const TOKEN_COOKIE: &str = "token";

/// Value of the `token` cookie sent with a request, if any.
pub fn read_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn expired_token_cookie(secure: bool) -> HeaderValue {
    let mut cookie = format!("{}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax", TOKEN_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    // Built from constant ASCII only.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static("token=; Max-Age=0; Path=/"))
}

/// What a response did to the `token` cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenUpdate {
    Issued(String),
    Cleared,
}

/// Scans `Set-Cookie` headers for the `token` cookie.
pub fn token_from_set_cookie(headers: &HeaderMap) -> Option<TokenUpdate> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| {
            let value = value.trim_matches('"');
            if value.is_empty() {
                TokenUpdate::Cleared
            } else {
                TokenUpdate::Issued(value.to_string())
            }
        })
}
