use log::debug;
use reqwest::RequestBuilder;

use crate::cookie::get_cookie;

pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
pub const DEFAULT_CSRF_HEADER: &str = "X-CSRFToken";

/// Attaches whatever the backend needs to accept a state-changing request.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Copies the anti-forgery token from the session cookie into a header.
#[derive(Debug, Clone)]
pub struct CsrfSigner {
    header_name: String,
    token: Option<String>,
}

impl CsrfSigner {
    pub fn new(header_name: impl Into<String>, token: Option<String>) -> Self {
        Self {
            header_name: header_name.into(),
            token,
        }
    }

    pub fn from_cookies(cookies: &str, cookie_name: &str, header_name: &str) -> Self {
        let token = get_cookie(cookies, cookie_name);
        if token.is_none() {
            debug!("cookie {cookie_name} not found, requests will not be signed");
        }
        Self::new(header_name, token)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl RequestSigner for CsrfSigner {
    fn sign(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(self.header_name.as_str(), token.as_str()),
            None => {
                debug!("no anti-forgery token, sending {} unset", self.header_name);
                request
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSigner;

impl RequestSigner for NoopSigner {
    fn sign(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}
