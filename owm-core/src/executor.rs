use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::{Config, DEFAULT_BASE_URL},
    error::ApiError,
    request::ApiRequest,
};

/// Observable outcome of the most recent request on one executor handle.
#[derive(Debug, Clone, Default)]
pub struct RequestState {
    /// True strictly between request start and settle.
    pub is_loading: bool,

    /// Body of the last successful response. Kept while a new request is in
    /// flight (last good value shows until the new result lands); forced to
    /// `None` when a request fails.
    pub data: Option<Value>,

    /// Last recorded failure. Cleared at the start of every request.
    pub error: Option<ApiError>,
}

/// A settled successful response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Issues requests against one OpenWeatherMap host and mirrors each outcome
/// into a shared [`RequestState`].
///
/// Cloning the handle is cheap; clones share the same HTTP client and the
/// same state cells. Overlapping `execute` calls on one handle are not
/// serialized: each state field is last-write-wins independently, so
/// concurrent callers should rely on the `Result` returned by their own call
/// rather than on the shared cells.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    base_url: String,
    api_key: String,
    state: RwLock<RequestState>,
}

impl RequestExecutor {
    /// Executor against the default host, `https://api.openweathermap.org`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Executor against a custom host, e.g. a test backend.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: Client::new(),
                base_url: base_url.into(),
                api_key: api_key.into(),
                state: RwLock::new(RequestState::default()),
            }),
        }
    }

    /// Executor using the credential and host from the loaded configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::with_base_url(api_key, config.resolved_base_url()))
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Perform one request and settle the shared state.
    ///
    /// Transition order within one call: `is_loading` raised and `error`
    /// cleared before any I/O, then the request, then `data`/`error`
    /// assignment, then `is_loading` lowered. The credential is merged into a
    /// fresh parameter list; `request` itself is never mutated. Failures are
    /// both recorded in the state and returned, never panicked.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.begin();
        debug!(method = %request.method, path = %request.path, "executing api request");

        let result = self.perform(request).await;
        self.settle(&result);
        result
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().is_loading
    }

    pub fn data(&self) -> Option<Value> {
        self.read_state().data.clone()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.read_state().error.clone()
    }

    /// Cloned snapshot of all three cells.
    pub fn state(&self) -> RequestState {
        self.read_state().clone()
    }

    fn begin(&self) {
        let mut state = self.write_state();
        state.is_loading = true;
        state.error = None;
    }

    fn settle(&self, result: &Result<ApiResponse, ApiError>) {
        let mut state = self.write_state();

        match result {
            Ok(response) => {
                debug!(status = %response.status, "api request succeeded");
                state.data = Some(response.body.clone());
            }
            Err(err) => {
                warn!(error = %err, "api request failed");
                state.error = Some(err.clone());
                state.data = None;
            }
        }

        state.is_loading = false;
    }

    async fn perform(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.inner.base_url, request.path);
        let params = request.merged_params(&self.inner.api_key);

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), &url)
            .query(&params);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let res = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(&url, &e))?;

        let status = res.status();
        let text = res.text().await.map_err(|e| ApiError::decode(&e))?;

        if !status.is_success() {
            return Err(ApiError::status(status, &text));
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| ApiError::decode(&e))?;

        Ok(ApiResponse { status, body })
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RequestState> {
        self.inner.state.read().expect("request state lock poisoned")
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RequestState> {
        self.inner.state.write().expect("request state lock poisoned")
    }
}
