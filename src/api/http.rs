//! Shared HTTP plumbing: base URL, authentication scheme, status handling.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{error_message, ApiError};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How requests to one service are authenticated.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Auth {
    #[default]
    None,
    /// `Authorization: Basic base64(username:password)`
    Basic { username: String, password: String },
    /// `Authorization: Bearer <jwt>`
    Bearer(String),
}

impl Auth {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Auth::None => request,
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
            Auth::Bearer(token) => request.bearer_auth(token),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Auth::None)
    }
}

// Secrets stay out of logs
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Basic { username, .. } => write!(f, "Basic({}:***)", username),
            Auth::Bearer(_) => f.write_str("Bearer(***)"),
        }
    }
}

/// A JSON-over-HTTP connection to one backend origin.
#[derive(Debug, Clone)]
pub struct HttpService {
    client: Client,
    endpoint: String,
    auth: Auth,
}

impl HttpService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            auth: Auth::None,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn set_auth(&mut self, auth: Auth) {
        self.auth = auth;
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Start a request to `path` with this service's authentication applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        self.auth.apply(request)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call_json(Method::GET, path).await
    }

    /// Bodiless request with a JSON response.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(self.request(method, path), path).await?;
        response.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(method, path).json(body), path).await?;
        response.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Send a request whose response body is ignored (DELETE and friends).
    pub async fn send_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        self.send(self.request(method, path), path).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        tracing::debug!(endpoint = %self.endpoint, path, "sending request");
        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(endpoint = %self.endpoint, path, error = %e, "request failed");
        })?;
        check_status(response).await
    }
}

/// Map non-success statuses to [`ApiError`].
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::warn!(%status, url = %response.url(), "credentials rejected");
        return Err(ApiError::Auth(format!("status {}", status)));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, "backend returned an error");
        return Err(ApiError::Http(error_message(&body)));
    }

    Ok(response)
}
