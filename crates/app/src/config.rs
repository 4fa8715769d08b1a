/// Client configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for talking to the public
/// API. Override via environment variables (a `.env` file is honored).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote API.
    pub api_base_url: String,
    /// HTTP request timeout in seconds (default: `30`). The transport
    /// timeout is the only deadline the client enforces.
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                        |
    /// |------------------------|--------------------------------|
    /// | `ABITUS_API_URL`       | `https://abitus-api.geia.vip`  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                           |
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("ABITUS_API_URL")
            .unwrap_or_else(|_| "https://abitus-api.geia.vip".into());

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            api_base_url,
            request_timeout_secs,
        }
    }
}
