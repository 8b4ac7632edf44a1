use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    request::{ApiRequest, Method},
    telemetry::SystemEnv,
    ClientOptions, Result, Telemetry, UnkeyError,
};

const TELEMETRY_SDK: HeaderName = HeaderName::from_static("unkey-telemetry-sdk");
const TELEMETRY_PLATFORM: HeaderName = HeaderName::from_static("unkey-telemetry-platform");
const TELEMETRY_RUNTIME: HeaderName = HeaderName::from_static("unkey-telemetry-runtime");

#[derive(Clone)]
/// HTTP client for the Unkey key-management API.
///
/// Every operation is a pass-through to a fixed `v1/<resource>.<action>`
/// endpoint, executed with bounded retries. Configuration is immutable after
/// construction; cloning shares the underlying connection pool.
pub struct UnkeyClient {
    http: reqwest::Client,
    base_url: String,
    root_key: String,
    options: ClientOptions,
    telemetry: Option<Telemetry>,
}

impl fmt::Debug for UnkeyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnkeyClient")
            .field("base_url", &self.base_url)
            .field("root_key", &"<redacted>")
            .field("options", &self.options)
            .field("telemetry", &self.telemetry)
            .finish()
    }
}

impl UnkeyClient {
    /// Creates a client from a base URL and a root key.
    ///
    /// The `Bearer ` prefix on the root key is optional. Telemetry is
    /// detected from the process environment once, here; use
    /// [`UnkeyClient::without_telemetry`] to opt out.
    pub fn new(base_url: impl Into<String>, root_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            root_key: root_key.into(),
            options: ClientOptions::default(),
            telemetry: Some(Telemetry::detect(&SystemEnv)),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `UNKEY_API_URL` — API base URL (e.g. `https://api.unkey.dev`)
    /// - `UNKEY_API_KEY` — root key (Bearer prefix optional)
    ///
    /// Returns an error if either variable is missing or empty.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use unkey_http::UnkeyClient;
    ///
    /// let unkey = UnkeyClient::from_env().expect("missing UNKEY_* env vars");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        let url = std::env::var("UNKEY_API_URL")
            .map_err(|_| "missing UNKEY_API_URL environment variable".to_owned())?;
        let root_key = std::env::var("UNKEY_API_KEY")
            .map_err(|_| "missing UNKEY_API_KEY environment variable".to_owned())?;
        if url.trim().is_empty() {
            return Err("UNKEY_API_URL is set but empty".to_owned());
        }
        if root_key.trim().is_empty() {
            return Err("UNKEY_API_KEY is set but empty".to_owned());
        }
        Ok(Self::new(url, root_key))
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Replaces the detected telemetry block, e.g. to report additional SDK
    /// versions from a wrapping library.
    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Disables the `Unkey-Telemetry-*` headers entirely.
    pub fn without_telemetry(mut self) -> Self {
        self.telemetry = None;
        self
    }

    // Keys API

    /// Creates a new API key. Body: at least `apiId`; see the Unkey docs for
    /// the full set of accepted fields.
    pub async fn create_key(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "keys.createKey"], body))
            .await
    }

    /// Updates an existing key in place.
    pub async fn update_key(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "keys.updateKey"], body))
            .await
    }

    /// Verifies a key. The response payload carries a `valid` flag along with
    /// rate-limit and ownership metadata.
    pub async fn verify_key(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "keys.verifyKey"], body))
            .await
    }

    /// Deletes a key.
    pub async fn delete_key(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "keys.deleteKey"], body))
            .await
    }

    /// Updates the remaining-uses counter of a key.
    pub async fn update_remaining(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "keys.updateRemaining"], body))
            .await
    }

    /// Fetches a key by `keyId`.
    pub async fn get_key(&self, query: Value) -> Result<Value> {
        self.fetch(ApiRequest::get(&["v1", "keys.getKey"], query))
            .await
    }

    /// Fetches verification statistics for a key.
    pub async fn get_verifications(&self, query: Value) -> Result<Value> {
        self.fetch(ApiRequest::get(&["v1", "keys.getVerifications"], query))
            .await
    }

    // APIs API

    /// Creates a new API namespace.
    pub async fn create_api(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "apis.createApi"], body))
            .await
    }

    /// Deletes an API namespace.
    pub async fn delete_api(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "apis.deleteApi"], body))
            .await
    }

    /// Fetches an API namespace by `apiId`.
    pub async fn get_api(&self, query: Value) -> Result<Value> {
        self.fetch(ApiRequest::get(&["v1", "apis.getApi"], query))
            .await
    }

    /// Lists keys belonging to an API namespace.
    pub async fn list_keys(&self, query: Value) -> Result<Value> {
        self.fetch(ApiRequest::get(&["v1", "apis.listKeys"], query))
            .await
    }

    // Rate limits API

    /// Checks and consumes a remote rate limit.
    pub async fn limit_rate(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "ratelimits.limit"], body))
            .await
    }

    // Identities API

    /// Creates an identity.
    pub async fn create_identity(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "identities.createIdentity"], body))
            .await
    }

    /// Fetches an identity.
    pub async fn get_identity(&self, query: Value) -> Result<Value> {
        self.fetch(ApiRequest::get(&["v1", "identities.getIdentity"], query))
            .await
    }

    /// Lists identities.
    pub async fn list_identities(&self, query: Value) -> Result<Value> {
        self.fetch(ApiRequest::get(&["v1", "identities.listIdentities"], query))
            .await
    }

    /// Deletes an identity.
    pub async fn delete_identity(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "identities.deleteIdentity"], body))
            .await
    }

    /// Updates an identity.
    pub async fn update_identity(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "identities.updateIdentity"], body))
            .await
    }

    // Migrations API

    /// Bulk-creates keys as part of a migration.
    pub async fn create_keys_migration(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "migrations.createKeys"], body))
            .await
    }

    /// Enqueues an asynchronous keys migration.
    pub async fn enqueue_keys_migration(&self, body: Value) -> Result<Value> {
        self.fetch(ApiRequest::post(&["v1", "migrations.enqueueKeys"], body))
            .await
    }

    /// Executes one outbound call with bounded retries.
    ///
    /// Non-2xx responses retry up to `max_retries` times with the configured
    /// backoff. Transport-level failures are treated as non-transient and
    /// return immediately without retrying.
    pub(crate) async fn fetch(&self, req: ApiRequest) -> Result<Value> {
        let url = self.endpoint_url(req.path);
        let mut last_err: Option<String> = None;

        for attempt in 0..=self.options.max_retries {
            let mut builder = match req.method {
                Method::Get => self.http.get(&url),
                Method::Post => self.http.post(&url),
            }
            .headers(self.headers())
            .timeout(Duration::from_millis(self.options.timeout_ms));

            if let Some(query) = &req.query {
                builder = builder.query(query);
            }
            if let Some(body) = &req.body {
                builder = builder.json(body);
            }

            match builder.send().await {
                Err(err) => {
                    // Transport failures are non-transient: no retry.
                    return Err(UnkeyError::fetch(err.to_string()));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = match response.text().await {
                        Ok(body) => body,
                        Err(err) => return Err(UnkeyError::fetch(err.to_string())),
                    };

                    if status.is_success() {
                        return serde_json::from_str(&body).map_err(|err| {
                            UnkeyError::fetch(format!("invalid response JSON: {err}"))
                        });
                    }

                    let delay_ms = self.options.backoff.delay_ms(attempt as u32);
                    tracing::debug!(
                        attempt,
                        delay_ms,
                        status = status.as_u16(),
                        url = %url,
                        "request failed, backing off"
                    );
                    last_err = Some(body);
                    sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }

        Err(UnkeyError::fetch(
            last_err.unwrap_or_else(|| "No response".to_owned()),
        ))
    }

    fn endpoint_url(&self, path: &[&str]) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.join("/"))
    }

    /// Synthesizes outbound headers from the immutable client state.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        if let Ok(mut value) = HeaderValue::from_str(&bearer_authorization(&self.root_key)) {
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        if let Some(telemetry) = &self.telemetry {
            if !telemetry.sdk_versions.is_empty() {
                if let Ok(value) = HeaderValue::from_str(&telemetry.sdk_versions.join(",")) {
                    headers.insert(TELEMETRY_SDK, value);
                }
            }
            if let Some(platform) = &telemetry.platform {
                if let Ok(value) = HeaderValue::from_str(platform) {
                    headers.insert(TELEMETRY_PLATFORM, value);
                }
            }
            if let Ok(value) = HeaderValue::from_str(&telemetry.runtime) {
                headers.insert(TELEMETRY_RUNTIME, value);
            }
        }

        headers
    }
}

/// Prepends `Bearer ` unless the root key already carries the prefix.
fn bearer_authorization(root_key: &str) -> String {
    let trimmed = root_key.trim();
    if trimmed
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer "))
    {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use crate::Telemetry;

    use super::{bearer_authorization, UnkeyClient};

    fn bare_telemetry() -> Telemetry {
        Telemetry {
            platform: None,
            runtime: "rust@1.75".to_owned(),
            sdk_versions: Vec::new(),
        }
    }

    #[test]
    fn bearer_prefix_added_when_missing() {
        assert_eq!(
            bearer_authorization("unkey_root"),
            "Bearer unkey_root".to_owned()
        );
    }

    #[test]
    fn bearer_prefix_kept_when_present() {
        assert_eq!(
            bearer_authorization("bEaReR unkey_root"),
            "bEaReR unkey_root".to_owned()
        );
    }

    #[test]
    fn debug_redacts_root_key() {
        let client = UnkeyClient::new("https://api.unkey.dev", "unkey_secret");
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("unkey_secret"));
    }

    #[test]
    fn endpoint_url_joins_segments() {
        let client = UnkeyClient::new("https://api.unkey.dev/", "root");
        assert_eq!(
            client.endpoint_url(&["v1", "keys.getKey"]),
            "https://api.unkey.dev/v1/keys.getKey"
        );
    }

    #[test]
    fn headers_always_carry_auth_and_content_type() {
        let client = UnkeyClient::new("https://api.unkey.dev", "root").without_telemetry();
        let headers = client.headers();
        assert_eq!(
            headers.get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(headers.get("authorization").unwrap(), "Bearer root");
    }

    #[test]
    fn telemetry_headers_absent_when_disabled() {
        let client = UnkeyClient::new("https://api.unkey.dev", "root").without_telemetry();
        let headers = client.headers();
        assert!(headers.get("unkey-telemetry-runtime").is_none());
        assert!(headers.get("unkey-telemetry-platform").is_none());
        assert!(headers.get("unkey-telemetry-sdk").is_none());
    }

    #[test]
    fn runtime_header_present_whenever_telemetry_enabled() {
        let client =
            UnkeyClient::new("https://api.unkey.dev", "root").with_telemetry(bare_telemetry());
        let headers = client.headers();
        assert_eq!(headers.get("unkey-telemetry-runtime").unwrap(), "rust@1.75");
        // Empty sdk_versions and absent platform suppress their headers.
        assert!(headers.get("unkey-telemetry-sdk").is_none());
        assert!(headers.get("unkey-telemetry-platform").is_none());
    }

    #[test]
    fn sdk_versions_join_with_commas() {
        let telemetry = Telemetry {
            platform: Some("vercel".to_owned()),
            runtime: "edge-light".to_owned(),
            sdk_versions: vec!["unkey-http@0.1.0".to_owned(), "acme-sdk@2.0".to_owned()],
        };
        let client = UnkeyClient::new("https://api.unkey.dev", "root").with_telemetry(telemetry);
        let headers = client.headers();
        assert_eq!(
            headers.get("unkey-telemetry-sdk").unwrap(),
            "unkey-http@0.1.0,acme-sdk@2.0"
        );
        assert_eq!(headers.get("unkey-telemetry-platform").unwrap(), "vercel");
    }
}
