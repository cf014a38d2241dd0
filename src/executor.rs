use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value as JsonValue;
use url::Url;

use crate::{
    backoff,
    classify::{classify_response, classify_transport, Outcome},
    version::{self, API_VERSION_HEADER, CLIENT_VERSION_HEADER},
    ClientOptions, Result, WaveError,
};

/// One logical API call: method, path relative to the base URL, optional
/// JSON body. The descriptor never changes while the call is retried.
#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    /// Path relative to the base URL, query string included.
    pub path: String,
    pub body: Option<JsonValue>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: JsonValue) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: JsonValue) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
        }
    }
}

/// Dispatches requests with bounded retries.
#[derive(Clone)]
pub(crate) struct Executor {
    http: reqwest::Client,
    pub(crate) base_url: String,
    credential: String,
    pub(crate) client_version: String,
    pub(crate) options: ClientOptions,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("base_url", &self.base_url)
            .field("credential", &"<redacted>")
            .field("client_version", &self.client_version)
            .field("options", &self.options)
            .finish()
    }
}

impl Executor {
    pub(crate) fn new(base_url: String, credential: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            credential,
            client_version: version::CLIENT_VERSION.to_owned(),
            options: ClientOptions::default(),
        }
    }

    /// Runs one logical call to completion.
    ///
    /// Transient failures are retried up to `max_retries` times after the
    /// initial attempt; terminal failures and success return immediately.
    pub(crate) async fn execute(&self, request: Request) -> Result<JsonValue> {
        let url = self.endpoint_url(&request.path)?;
        let mut attempt: u32 = 1;
        loop {
            let (error, hint) = match self.dispatch_once(&request, &url).await {
                Outcome::Success(body) => return Ok(body),
                Outcome::Fatal(error) => return Err(error),
                Outcome::Retry { error, hint } => (error, hint),
            };

            if attempt > self.options.max_retries {
                return Err(error);
            }

            let delay = backoff::delay_before_retry(attempt, hint, &self.options);
            tracing::warn!(
                attempt,
                max_retries = self.options.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "request failed, retrying"
            );
            backoff::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn dispatch_once(&self, request: &Request, url: &Url) -> Outcome {
        // The `.timeout()` call works on both targets; on WASM reqwest maps
        // it onto an AbortController.
        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.credential))
            .header(CLIENT_VERSION_HEADER, &self.client_version)
            .timeout(self.options.timeout);
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .json(body);
        }

        match builder.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let headers = response.headers().clone();
                self.note_api_version(&headers);
                match response.text().await {
                    Ok(body) => {
                        classify_response(status, &headers, &body, backoff::wall_clock_now())
                    }
                    Err(err) => Outcome::Retry {
                        error: classify_transport(&err),
                        hint: None,
                    },
                }
            }
            Err(err) => Outcome::Retry {
                error: classify_transport(&err),
                hint: None,
            },
        }
    }

    fn note_api_version(&self, headers: &HeaderMap) {
        if let Some(api_version) = headers
            .get(API_VERSION_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            version::note_api_version(&self.client_version, api_version);
        }
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        let absolute = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&absolute).map_err(|err| WaveError::Validation {
            message: format!("invalid request URL '{absolute}': {err}"),
            detail: None,
        })
    }
}
