//! Request dispatcher: path templating, retries and error mapping.

use log::debug;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::retry::{RetryPolicy, classify_status};
use crate::error::{Error, Result};

/// A request parameter: substituted into the path when the template names
/// it, sent as a query parameter otherwise.
pub type Param = (&'static str, String);

/// Path segments and leftover query parameters produced by [`render_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPath {
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
}

/// Fills `{name}` placeholders in `template` from `params`.
///
/// A placeholder must span a whole segment. Parameters that no placeholder
/// consumes are kept, in order, as query parameters.
pub fn render_path(template: &str, params: &[Param]) -> Result<RenderedPath> {
    let mut used = vec![false; params.len()];
    let mut segments = Vec::new();

    for segment in template.split('/').filter(|s| !s.is_empty()) {
        let Some(name) = segment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        else {
            segments.push(segment.to_string());
            continue;
        };

        let position = params.iter().position(|(key, _)| *key == name);
        match position {
            Some(index) => {
                used[index] = true;
                segments.push(params[index].1.clone());
            }
            None => {
                return Err(Error::validation(format!(
                    "missing value for path parameter '{}'",
                    name
                )));
            }
        }
    }

    let query = params
        .iter()
        .zip(used)
        .filter(|(_, used)| !used)
        .map(|((key, value), _)| (key.to_string(), value.clone()))
        .collect();

    Ok(RenderedPath { segments, query })
}

/// HTTP client bound to one API root, with retry and error normalization.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(client: Client, base_url: &str, retry: RetryPolicy) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| Error::config(format!("invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "base URL '{}' cannot carry a path",
                base_url
            )));
        }
        Ok(Self {
            client,
            base_url,
            retry,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Builds the absolute URL for a rendered path, percent-encoding segments.
    pub fn url_for(&self, path: &RenderedPath) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(path.segments.iter());
        Ok(url)
    }

    /// Sends one logical request and decodes the JSON response into `T`.
    /// Transient failures are retried according to the policy.
    #[tracing::instrument(skip(self, params, body))]
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        template: &str,
        params: &[Param],
        body: Option<&Value>,
    ) -> Result<T> {
        let path = render_path(template, params)?;
        let url = self.url_for(&path)?;

        debug!("{} {} with query {:?}...", method, url, path.query);

        let operation = format!("{} {}", method, template);
        self.retry
            .run(&operation, || {
                self.send_once(method.clone(), url.clone(), &path.query, body)
            })
            .await
    }

    /// Single attempt without retry.
    async fn send_once<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<T> {
        let mut request = self.client.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(Error::from_transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(Error::from_transport)?;

        if !status.is_success() {
            return Err(classify_status(status, &String::from_utf8_lossy(&bytes)));
        }

        serde_json::from_slice(&bytes).map_err(Error::from_json)
    }

    /// GET pass-through returning raw JSON.
    pub async fn get(&self, template: &str, params: &[Param]) -> Result<Value> {
        self.request_json(Method::GET, template, params, None).await
    }

    /// POST pass-through returning raw JSON.
    pub async fn post(&self, template: &str, body: &Value) -> Result<Value> {
        self.request_json(Method::POST, template, &[], Some(body))
            .await
    }

    /// PUT pass-through returning raw JSON.
    pub async fn put(&self, template: &str, body: &Value) -> Result<Value> {
        self.request_json(Method::PUT, template, &[], Some(body)).await
    }

    /// DELETE pass-through returning raw JSON.
    pub async fn delete(&self, template: &str) -> Result<Value> {
        self.request_json(Method::DELETE, template, &[], None).await
    }
}
