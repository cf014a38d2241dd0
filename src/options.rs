use std::time::Duration;

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay of the exponential backoff schedule.
    pub base_backoff: Duration,
    /// Upper bound on any single retry delay, server hints included.
    pub max_backoff: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl ClientOptions {
    /// Profile for in-browser data collection: a longer timeout and more
    /// retries, so trial rows survive flaky participant connections.
    pub fn collection() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 5,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
        }
    }
}
