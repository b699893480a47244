//! Session and flash cookies.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

/// Value of cookie `name` from the request's `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// One `Set-Cookie` header.
#[derive(Debug, Clone)]
pub struct SetCookie(String);

impl SetCookie {
    pub fn session(token: &str, max_age: chrono::Duration) -> Self {
        Self(format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            max_age.num_seconds().max(0)
        ))
    }

    pub fn clear_session() -> Self {
        Self::expire(SESSION_COOKIE)
    }

    /// One-shot message shown by the next page render.
    pub fn flash(message: &str) -> Self {
        let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
        Self(format!("{FLASH_COOKIE}={encoded}; Path=/; HttpOnly; SameSite=Lax"))
    }

    pub fn clear_flash() -> Self {
        Self::expire(FLASH_COOKIE)
    }

    fn expire(name: &str) -> Self {
        Self(format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl IntoResponseParts for SetCookie {
    type Error = std::convert::Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        match HeaderValue::from_str(&self.0) {
            Ok(value) => {
                res.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!("unencodable cookie dropped: {e}"),
        }
        Ok(res)
    }
}

/// Pending flash message, if the request carries one.
pub fn read_flash(headers: &HeaderMap) -> Option<String> {
    let raw = cookie_value(headers, FLASH_COOKIE)?;
    let decoded: String = url::form_urlencoded::parse(format!("m={raw}").as_bytes())
        .map(|(_, value)| value.into_owned())
        .next()?;
    Some(decoded).filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn finds_named_cookie_among_others() {
        let h = headers("theme=dark; session=abc.def.ghi ; other=1");
        assert_eq!(cookie_value(&h, "session"), Some("abc.def.ghi"));
        assert_eq!(cookie_value(&h, "missing"), None);
        assert_eq!(cookie_value(&headers("session="), "session"), None);
    }

    #[test]
    fn flash_message_survives_encoding() {
        let message = "You've already signed up with that email, log in instead";
        let set = SetCookie::flash(message);
        let pair = set.as_str().split(';').next().unwrap();
        assert_eq!(read_flash(&headers(pair)).as_deref(), Some(message));
    }

    #[test]
    fn session_cookie_attributes() {
        let set = SetCookie::session("tok", chrono::Duration::minutes(2));
        assert_eq!(set.as_str(), "session=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=120");
        assert!(SetCookie::clear_session().as_str().ends_with("Max-Age=0"));
    }
}
