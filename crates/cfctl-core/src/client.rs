//! HTTP transport for the platform API
//!
//! Thin wrapper over `reqwest` that adds bearer auth, resolves relative
//! paths against the API endpoint, follows pagination and maps the
//! platform's error envelope onto [`CoreError`].

use reqwest::header::LOCATION;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::{CoreError, Result};
use crate::resources::{ApiErrorEnvelope, Job, Page};

/// User agent string for cf HTTP requests
const USER_AGENT: &str = concat!("cfctl/", env!("CARGO_PKG_VERSION"));

/// How the platform answered a mutating request
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResponse {
    /// Applied synchronously (200/201/204), with the body if there was one
    Done(Option<Value>),
    /// Accepted for background processing; poll the job at `job_url`
    Accepted { job_url: String },
}

/// Authenticated client for one platform API endpoint
#[derive(Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[redacted]")
            .finish()
    }
}

impl PlatformClient {
    pub fn new(api_url: &str, token: &str, skip_ssl_validation: bool) -> Result<Self> {
        let base_url = Url::parse(api_url)
            .map_err(|e| CoreError::Config(format!("Invalid API URL '{}': {}", api_url, e)))?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(skip_ssl_validation)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Resolve a path (`/v3/...`) or an absolute URL returned by the platform
    fn url(&self, path_or_url: &str) -> Result<Url> {
        self.base_url
            .join(path_or_url)
            .map_err(|e| CoreError::Validation(format!("Invalid URL '{}': {}", path_or_url, e)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        trace!("{} {}", method, url);
        Ok(self.http.request(method, url).bearer_auth(&self.token))
    }

    /// GET a single JSON document
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self.execute(self.request(Method::GET, path)?.query(query)).await?;
        Ok(response.json::<T>().await?)
    }

    /// GET every resource of a list endpoint, following `pagination.next`
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let mut page: Page<T> = self.get(path, query).await?;
        let mut resources = std::mem::take(&mut page.resources);

        while let Some(next) = page.pagination.and_then(|p| p.next) {
            debug!("Following pagination link {}", next.href);
            page = self.get(&next.href, &[]).await?;
            resources.append(&mut page.resources);
        }

        Ok(resources)
    }

    /// First resource of a filtered list, if any
    pub async fn find_one<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let page: Page<T> = self.get(path, query).await?;
        Ok(page.resources.into_iter().next())
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<MutationResponse> {
        self.mutate(self.request(Method::POST, path)?.json(body))
            .await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<MutationResponse> {
        self.mutate(self.request(Method::PATCH, path)?.json(body))
            .await
    }

    pub async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<MutationResponse> {
        self.mutate(self.request(Method::DELETE, path)?.query(query))
            .await
    }

    /// Fetch the job behind an accepted mutation
    pub async fn get_job(&self, job_url: &str) -> Result<Job> {
        self.get(job_url, &[]).await
    }

    async fn mutate(&self, request: RequestBuilder) -> Result<MutationResponse> {
        let response = self.execute(request).await?;

        if response.status() == StatusCode::ACCEPTED {
            let job_url = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| CoreError::Api {
                    status: 202,
                    title: "MissingLocation".to_string(),
                    detail: "Platform accepted the request but returned no job location"
                        .to_string(),
                })?;
            debug!("Request accepted, job at {}", job_url);
            return Ok(MutationResponse::Accepted { job_url });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            Ok(MutationResponse::Done(None))
        } else {
            Ok(MutationResponse::Done(Some(serde_json::from_str(&body).map_err(
                |e| CoreError::Validation(format!("Invalid JSON from platform: {}", e)),
            )?)))
        }
    }

    /// Send the request and turn non-2xx responses into errors
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        trace!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &body))
    }
}

/// Map a failed response onto the error taxonomy
fn error_from_response(status: StatusCode, body: &str) -> CoreError {
    let first = serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.errors.into_iter().next());

    let (title, detail) = match first {
        Some(e) if !e.detail.is_empty() => (e.title, e.detail),
        Some(e) => (e.title.clone(), e.title),
        None => (
            status.canonical_reason().unwrap_or("Unknown").to_string(),
            format!(
                "Unexpected response from platform: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            ),
        ),
    };

    match status {
        StatusCode::NOT_FOUND => CoreError::NotFound { message: detail },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CoreError::Unauthorized { message: detail }
        }
        _ => CoreError::Api {
            status: status.as_u16(),
            title,
            detail,
        },
    }
}
