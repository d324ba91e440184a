//! Cross-origin headers for the browser client

use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, VARY,
};
use hyper::StatusCode;
use lazy_regex::regex_is_match;

use crate::response::{empty, Reply};

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Authorization, Content-Type";

/// Configured origins plus any `http://localhost:<port>`
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new(origins: Vec<String>) -> Self {
        Self { origins }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin) || is_localhost(origin)
    }

    /// Answer an `OPTIONS` preflight
    pub fn preflight(&self, origin: Option<&str>) -> Reply {
        let mut reply = empty(StatusCode::NO_CONTENT);
        if origin.is_some_and(|o| self.allows(o)) {
            let headers = reply.headers_mut();
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
            headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("600"));
        }
        reply
    }

    /// Add the allow-origin headers when `origin` is allowed
    ///
    /// Disallowed origins get no headers at all and the browser blocks them.
    pub fn apply(&self, origin: Option<&str>, reply: &mut Reply) {
        let Some(origin) = origin.filter(|o| self.allows(o)) else {
            return;
        };
        let Ok(value) = HeaderValue::from_str(origin) else {
            return;
        };
        let headers = reply.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        headers.append(VARY, HeaderValue::from_static("Origin"));
    }
}

fn is_localhost(origin: &str) -> bool {
    regex_is_match!(r"^http://localhost:\d+$", origin)
}
