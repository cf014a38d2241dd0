use std::fmt;

use serde_json::Value as JsonValue;

#[cfg(target_arch = "wasm32")]
use crate::credentials::BrowserLocation;
use crate::credentials::{resolve_credential, LocationSource, NoLocation, API_KEY_ENV};
use crate::executor::{Executor, Request};
use crate::models::{HealthStatus, VersionInfo};
use crate::resources::{self, ExperimentData, ExperimentTypes, Experiments, Search, Tags};
use crate::{version, ClientOptions, Result, WaveError};

/// Environment variable naming the backend base URL.
#[cfg(not(target_arch = "wasm32"))]
pub const API_URL_ENV: &str = "WAVE_API_URL";

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Clone)]
/// HTTP client for a WAVE experiment-data backend.
///
/// The client is cheap to clone; clones share the underlying connection
/// pool. All I/O goes through one retrying executor, so every resource
/// facade obtained from this client inherits the same credential, timeout
/// and retry behavior.
pub struct WaveClient {
    executor: Executor,
}

impl fmt::Debug for WaveClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaveClient")
            .field("base_url", &self.executor.base_url)
            .field("api_key", &"<redacted>")
            .field("options", &self.executor.options)
            .finish()
    }
}

impl WaveClient {
    /// Creates a client with an explicit API key.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use wave_http::WaveClient;
    ///
    /// let client = WaveClient::new("https://wave.example.org", "my-api-key")?;
    /// # Ok::<(), wave_http::WaveError>(())
    /// ```
    pub fn new(base_url: impl Into<String>, api_key: impl AsRef<str>) -> Result<Self> {
        Self::with_source(base_url, Some(api_key.as_ref()), &NoLocation)
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `WAVE_API_URL` — backend base URL, defaulting to
    ///   `http://localhost:8000` when unset
    /// - `WAVE_API_KEY` — the API key
    ///
    /// **Not available on `wasm32` targets** — environment variables do not
    /// exist in browser runtimes. Use [`WaveClient::from_page`] there, or
    /// [`WaveClient::new`] with a key handed over from JavaScript.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        Self::with_source(base_url, None, &NoLocation)
    }

    /// Creates a client inside a browser, reading the API key from the
    /// page URL.
    ///
    /// Experiment hosts hand participants links like
    /// `https://study.example.org/run?key=abc123`; the key is picked up
    /// from the `key` query parameter, or from the URL fragment when the
    /// host keeps credentials out of server logs.
    #[cfg(target_arch = "wasm32")]
    pub fn from_page(base_url: impl Into<String>) -> Result<Self> {
        Self::with_source(base_url, None, &BrowserLocation)
    }

    /// Creates a client with a caller-supplied credential location.
    ///
    /// This is the seam the other constructors go through: the explicit
    /// key wins when present and non-blank, then the location's URL is
    /// searched, then the environment. Construction fails up front when
    /// no credential can be found, before anything touches the network.
    pub fn with_source(
        base_url: impl Into<String>,
        explicit_key: Option<&str>,
        location: &dyn LocationSource,
    ) -> Result<Self> {
        let api_key = resolve_credential(explicit_key, location).ok_or_else(|| {
            WaveError::Authentication {
                message: format!(
                    "no API key found: pass one explicitly, embed a `key` parameter \
                     in the page URL, or set {API_KEY_ENV}"
                ),
                detail: None,
            }
        })?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self {
            executor: Executor::new(base_url, api_key),
        })
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.executor.options = options;
        self
    }

    /// Overrides the client version advertised to the backend.
    ///
    /// Defaults to this crate's version; embedding applications can report
    /// their own release instead.
    pub fn with_client_version(mut self, version: impl Into<String>) -> Self {
        self.executor.client_version = version.into();
        self
    }

    /// Base URL requests are issued against, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.executor.base_url
    }

    /// Version string sent in the `X-WAVE-Client-Version` header.
    pub fn client_version(&self) -> &str {
        &self.executor.client_version
    }

    pub fn options(&self) -> &ClientOptions {
        &self.executor.options
    }

    /// Experiment management: `/api/v1/experiments`.
    pub fn experiments(&self) -> Experiments {
        Experiments::new(self.executor.clone())
    }

    /// Experiment type management: `/api/v1/experiment-types`.
    pub fn experiment_types(&self) -> ExperimentTypes {
        ExperimentTypes::new(self.executor.clone())
    }

    /// Per-experiment data rows: `/api/v1/experiment-data`.
    pub fn data(&self) -> ExperimentData {
        ExperimentData::new(self.executor.clone())
    }

    /// Tag management: `/api/v1/tags`.
    pub fn tags(&self) -> Tags {
        Tags::new(self.executor.clone())
    }

    /// Cross-resource search: `/api/v1/search`.
    pub fn search(&self) -> Search {
        Search::new(self.executor.clone())
    }

    /// Checks backend liveness.
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self.executor.execute(Request::get("/health")).await?;
        resources::decode(response)
    }

    /// Fetches the backend's version report and logs a warning when the
    /// API's major version differs from this client's.
    pub async fn version(&self) -> Result<VersionInfo> {
        let response = self.executor.execute(Request::get("/version")).await?;
        let info: VersionInfo = resources::decode(response)?;
        version::note_api_version(&self.executor.client_version, &info.api_version);
        Ok(info)
    }

    /// Sends a raw request through the retrying executor.
    ///
    /// Escape hatch for endpoints that have no typed facade yet; the
    /// standard headers, retry loop and error taxonomy all still apply.
    pub async fn execute(&self, request: Request) -> Result<JsonValue> {
        self.executor.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::WaveClient;
    use crate::ClientOptions;

    #[test]
    fn trailing_slashes_are_trimmed_from_the_base_url() {
        let client =
            WaveClient::new("http://localhost:8000///", "test-key").expect("must construct");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn debug_redacts_the_api_key() {
        let client = WaveClient::new("http://localhost:8000", "secret-key-value")
            .expect("must construct");
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-key-value"));
    }

    #[test]
    fn builders_flow_into_the_executor() {
        let client = WaveClient::new("http://localhost:8000", "test-key")
            .expect("must construct")
            .with_options(ClientOptions::collection())
            .with_client_version("9.9.9");
        assert_eq!(client.options().max_retries, 5);
        assert_eq!(client.client_version(), "9.9.9");
    }
}
