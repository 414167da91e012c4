// HTTP client utilities
use crate::domain::error::LingoError;
use reqwest::Client;

/// Create the shared HTTP client.
///
/// The 30 s request timeout bounds every backend call; the dispatcher adds
/// no per-call timeout of its own.
pub fn create_client() -> Result<Client, LingoError> {
    Ok(Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .timeout(std::time::Duration::from_secs(30))
        .user_agent("lingo/0.1.0")
        .build()?)
}
