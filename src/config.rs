//! Environment-based configuration for the gateway binary.

const DEFAULT_GATEWAY_PORT: u16 = 8080;

/// Configuration for the gateway binary.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Unkey API base URL.
    pub base_url: String,
    /// Root key identifying this service to the Unkey API.
    pub root_key: String,
    /// TCP port the gateway listens on. Default: `8080`.
    pub port: u16,
}

impl GatewayConfig {
    /// Reads configuration from the environment.
    ///
    /// - `UNKEY_API_URL` — API base URL (required)
    /// - `UNKEY_API_KEY` — root key (required)
    /// - `GATEWAY_PORT` — listen port (default `8080`)
    ///
    /// Returns an error if a required variable is missing or empty.
    pub fn from_env() -> Result<Self, String> {
        let base_url = required("UNKEY_API_URL")?;
        let root_key = required("UNKEY_API_KEY")?;
        let port = std::env::var("GATEWAY_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_GATEWAY_PORT);

        Ok(Self {
            base_url,
            root_key,
            port,
        })
    }
}

fn required(name: &str) -> Result<String, String> {
    let value =
        std::env::var(name).map_err(|_| format!("missing {name} environment variable"))?;
    if value.trim().is_empty() {
        return Err(format!("{name} is set but empty"));
    }
    Ok(value)
}
