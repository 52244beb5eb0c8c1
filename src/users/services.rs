use axum::http::{header, HeaderMap};
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::config::SessionConfig;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// `Set-Cookie` value carrying the session identifier.
pub(crate) fn session_cookie(cfg: &SessionConfig, user_id: Uuid) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        cfg.cookie_name, user_id, cfg.max_age_secs
    );
    if cfg.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Raw value of the named cookie, looking through every `Cookie` header.
pub(crate) fn session_id_from_headers<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"'))
        .filter(|v| !v.is_empty())
}
