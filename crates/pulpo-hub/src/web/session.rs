//! Cookie session for the shared staff password.
//!
//! The cookie carries an HS256 token signed with the hub's session secret,
//! so a client cannot forge a session by setting the cookie by hand.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

pub const SESSION_COOKIE: &str = "session";
pub const SESSION_TTL_SECS: u64 = 24 * 60 * 60;

const SUBJECT: &str = "staff";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

pub fn issue_token(secret: &[u8], now: u64) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = SessionClaims {
        sub: SUBJECT.into(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn verify_token(secret: &[u8], token: &str) -> Option<SessionClaims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .ok()
        .map(|data| data.claims)
}

/// Compare a submitted password with the configured one in constant time.
/// Always false when no password is configured.
pub fn password_matches(expected: Option<&str>, given: &str) -> bool {
    match expected {
        Some(expected) => expected.as_bytes().ct_eq(given.as_bytes()).into(),
        None => false,
    }
}

pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; Max-Age={SESSION_TTL_SECS}; HttpOnly; SameSite=Strict"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Strict");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Value of cookie `name` across every `Cookie` header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

pub fn has_valid_session(secret: &[u8], headers: &HeaderMap) -> bool {
    cookie_value(headers, SESSION_COOKIE)
        .filter(|token| !token.is_empty())
        .and_then(|token| verify_token(secret, token))
        .is_some()
}
