use reqwest::Method;
use serde_json::Value;

/// Description of one API request, relative to the executor's base URL.
///
/// The executor never mutates a request it is given; the credential parameter
/// is merged into a fresh list at execution time (see
/// [`crate::RequestExecutor::execute`]).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append one query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Query parameters with the credential injected.
    ///
    /// The fixed `appid` pair comes first; caller parameters follow and win on
    /// a key conflict (a caller-supplied `appid` replaces the injected one).
    pub(crate) fn merged_params(&self, api_key: &str) -> Vec<(String, String)> {
        let mut merged = vec![("appid".to_string(), api_key.to_string())];

        for (key, value) in &self.params {
            if let Some(existing) = merged.iter_mut().find(|(k, _)| k == key) {
                existing.1 = value.clone();
            } else {
                merged.push((key.clone(), value.clone()));
            }
        }

        merged
    }
}
