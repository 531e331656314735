use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, header};

use crate::signer::{CsrfSigner, DEFAULT_CSRF_COOKIE, DEFAULT_CSRF_HEADER, RequestSigner};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub base_url: String,
    /// Raw cookie string of an already authenticated browser session.
    pub cookies: String,
    pub csrf_cookie: String,
    pub csrf_header: String,
    pub timeout: Duration,
}

impl SessionConfig {
    pub fn new(base_url: impl Into<String>, cookies: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            cookies: cookies.into(),
            csrf_cookie: DEFAULT_CSRF_COOKIE.to_string(),
            csrf_header: DEFAULT_CSRF_HEADER.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Every request a client makes goes through here so that the cookie and the
/// signer are applied the same way everywhere.
#[derive(Clone)]
pub struct Session {
    client: Client,
    base_url: String,
    cookies: Option<header::HeaderValue>,
    signer: Arc<dyn RequestSigner>,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build http client")?;

        Self::with_client(client, config)
    }

    /// Uses `client` as built by the caller; `config.timeout` is not applied.
    pub fn with_client(client: Client, config: &SessionConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            anyhow::bail!("no server url configured");
        }

        let signer = CsrfSigner::from_cookies(&config.cookies, &config.csrf_cookie, &config.csrf_header);

        let mut session = Self::with_signer(client, &config.base_url, Arc::new(signer));

        if !config.cookies.is_empty() {
            session.cookies = Some(
                header::HeaderValue::from_str(&config.cookies).context("Invalid cookie string")?,
            );
        }

        Ok(session)
    }

    pub fn with_signer(client: Client, base_url: &str, signer: Arc<dyn RequestSigner>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookies: None,
            signer,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{method} {url}");

        let request = self.client.request(method, url);
        match &self.cookies {
            Some(cookies) => request.header(header::COOKIE, cookies.clone()),
            None => request,
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::PUT, path)
    }

    pub fn signed(&self, request: RequestBuilder) -> RequestBuilder {
        self.signer.sign(request)
    }
}

/// Turns a non-2xx response into an error carrying the status and body text.
pub async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!(
            "cannot {} with status {}: {}",
            action,
            status,
            error_text
        ));
    }

    Ok(response)
}
