//! Blocking client for the chat backend (auth, contacts, broadcast lookup).

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure. Only the path is kept; query strings carry
    /// passwords and session tokens.
    #[error("request to {path} failed")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} responded with status {status}")]
    Status { path: String, status: u16, body: String },
    #[error("could not decode {path} response")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the broker lives and which channel carries the chat.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BroadcastEndpoint {
    pub host: String,
    pub port: u16,
    pub channel_name: String,
}

/// The backend endpoints the client consumes.
pub trait BackendApi: Send + Sync {
    fn signup(&self, login: &str, password: &str) -> Result<(), BackendError>;

    /// Returns the session token.
    fn login(&self, login: &str, password: &str) -> Result<String, BackendError>;

    fn broadcast_url(&self, token: &str) -> Result<BroadcastEndpoint, BackendError>;

    fn contacts(&self, token: &str) -> Result<Vec<String>, BackendError>;

    fn search(&self, token: &str, term: &str) -> Result<Vec<String>, BackendError>;

    fn add_contact(&self, token: &str, login: &str) -> Result<(), BackendError>;

    /// `Ok(false)` when the backend rejects the token.
    fn validate_token(&self, token: &str) -> Result<bool, BackendError>;
}

/// Build a request URL by plain concatenation.
///
/// Values are not URL-encoded; the backend expects them verbatim.
pub fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> String {
    let mut url = format!("{base}{path}");
    if !params.is_empty() {
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        url.push('?');
        url.push_str(&query.join("&"));
    }
    url
}

fn transport_error(path: &str, source: reqwest::Error) -> BackendError {
    BackendError::Http {
        path: path.to_string(),
        source: source.without_url(),
    }
}

pub struct BackendClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl BackendClient {
    pub fn new(host: &str, port: u16) -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            base_url: format!("http://{host}:{port}"),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET and fail on anything other than 200.
    pub fn request(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<reqwest::blocking::Response, BackendError> {
        let url = build_url(&self.base_url, path, params);
        debug!(path, "backend request");
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|source| transport_error(path, source))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().unwrap_or_default();
            warn!(path, status, body = %body, "backend rejected request");
            return Err(BackendError::Status {
                path: path.to_string(),
                status,
                body,
            });
        }
        Ok(response)
    }

    fn request_text(&self, path: &str, params: &[(&str, &str)]) -> Result<String, BackendError> {
        let response = self.request(path, params)?;
        response.text().map_err(|source| transport_error(path, source))
    }

    fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, BackendError> {
        let body = self.request_text(path, params)?;
        serde_json::from_str(&body).map_err(|source| BackendError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

impl BackendApi for BackendClient {
    fn signup(&self, login: &str, password: &str) -> Result<(), BackendError> {
        self.request(
            "/signup",
            &[("login", login), ("password1", password), ("password2", password)],
        )?;
        Ok(())
    }

    fn login(&self, login: &str, password: &str) -> Result<String, BackendError> {
        self.request_text("/login", &[("login", login), ("password", password)])
    }

    fn broadcast_url(&self, token: &str) -> Result<BroadcastEndpoint, BackendError> {
        self.request_json("/broadcast_url", &[("session_id", token)])
    }

    fn contacts(&self, token: &str) -> Result<Vec<String>, BackendError> {
        self.request_json("/contacts", &[("session_id", token)])
    }

    fn search(&self, token: &str, term: &str) -> Result<Vec<String>, BackendError> {
        self.request_json("/search", &[("session_id", token), ("login", term)])
    }

    fn add_contact(&self, token: &str, login: &str) -> Result<(), BackendError> {
        self.request("/add_contact", &[("login", login), ("session_id", token)])?;
        Ok(())
    }

    fn validate_token(&self, token: &str) -> Result<bool, BackendError> {
        match self.request("/token/validate", &[("token", token)]) {
            Ok(_) => Ok(true),
            Err(BackendError::Status { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
