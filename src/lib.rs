//! `wave-http` is an async HTTP client for the WAVE experiment-data API.
//!
//! The crate wraps the REST surface with typed resource facades reached
//! from one entry point:
//! - [`WaveClient::experiments`]
//! - [`WaveClient::data`]
//! - [`WaveClient::search`]
//!
//! Every call goes through a shared executor that classifies failures into
//! [`WaveError`], retries the transient ones with exponential backoff and
//! honors server `Retry-After` hints. The crate runs on native targets and
//! on `wasm32-unknown-unknown`, where browser-hosted experiments record
//! participant data as it is produced.

mod backoff;
mod classify;
mod client;
mod credentials;
mod error;
mod executor;
mod options;
mod table;
mod version;

pub mod models;
pub mod resources;

#[cfg(not(target_arch = "wasm32"))]
pub use client::API_URL_ENV;
pub use client::WaveClient;
#[cfg(target_arch = "wasm32")]
pub use credentials::BrowserLocation;
pub use credentials::{resolve_credential, LocationSource, NoLocation, API_KEY_ENV};
pub use error::WaveError;
pub use executor::Request;
pub use options::ClientOptions;
pub use table::{DataTable, TableRow};
pub use version::CLIENT_VERSION;

pub type Result<T> = std::result::Result<T, WaveError>;
