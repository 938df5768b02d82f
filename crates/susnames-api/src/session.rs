//! Cookie-backed session identity and player-name persistence.
//!
//! The session cookie is an opaque random id per browser; the room never
//! inspects it beyond using it as the player's key.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::config::CookiePolicy;

/// Cookie holding the opaque session id.
pub const SESSION_COOKIE: &str = "SN-SessionID";
/// Cookie holding the player's chosen display name.
pub const PLAYER_NAME_COOKIE: &str = "SN-Player-Name";

/// The caller's session id, if the request carried one.
#[must_use]
pub fn session_id(jar: &CookieJar) -> Option<String> {
    non_empty(jar, SESSION_COOKIE)
}

/// The caller's session id, issuing a fresh one when absent.
#[must_use]
pub fn ensure_session_id(jar: CookieJar, policy: CookiePolicy) -> (CookieJar, String) {
    if let Some(id) = session_id(&jar) {
        return (jar, id);
    }
    let id = Uuid::new_v4().to_string();
    let jar = jar.add(cookie(SESSION_COOKIE, id.clone(), policy));
    (jar, id)
}

/// The display name stored for this browser, if any.
#[must_use]
pub fn player_name(jar: &CookieJar) -> Option<String> {
    non_empty(jar, PLAYER_NAME_COOKIE)
}

/// Stores `name` as this browser's display name.
#[must_use]
pub fn remember_player_name(jar: CookieJar, name: &str, policy: CookiePolicy) -> CookieJar {
    jar.add(cookie(PLAYER_NAME_COOKIE, name.to_string(), policy))
}

fn non_empty(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn cookie(name: &'static str, value: String, policy: CookiePolicy) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .secure(policy.secure)
        .http_only(policy.http_only)
        .same_site(SameSite::Lax)
        .build()
}
