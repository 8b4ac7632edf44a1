//! Host-environment probe and telemetry metadata.
//!
//! The Unkey API accepts optional `Unkey-Telemetry-*` headers describing the
//! calling platform and runtime. Detection happens once, at client
//! construction, through the [`HostEnv`] trait — the client itself never
//! touches ambient globals after that.

/// Read-only view of the process environment.
///
/// Environment variables that are set but empty count as unset.
pub trait HostEnv {
    fn var(&self, name: &str) -> Option<String>;
}

/// Zero-sized type — delegates to `std::env`.
pub struct SystemEnv;

impl HostEnv for SystemEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }
}

/// Telemetry metadata sent to the Unkey API, immutable for the lifetime of
/// the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Telemetry {
    /// Detected hosting platform, if any.
    pub platform: Option<String>,
    /// Runtime identifier, always present.
    pub runtime: String,
    /// SDK identifiers, comma-joined into one header. Empty suppresses the
    /// header entirely.
    pub sdk_versions: Vec<String>,
}

impl Telemetry {
    /// Probes the environment once and caches the result.
    ///
    /// Platform is `vercel` when the Vercel marker is set, `aws` when an AWS
    /// region is set, absent otherwise. Runtime is `edge-light` under an edge
    /// execution marker, else the toolchain baseline identifier.
    pub fn detect(env: &impl HostEnv) -> Self {
        let platform = if env.var("VERCEL").is_some() {
            Some("vercel".to_owned())
        } else if env.var("AWS_REGION").is_some() {
            Some("aws".to_owned())
        } else {
            None
        };

        let runtime = if env.var("EDGE_RUNTIME").is_some() {
            "edge-light".to_owned()
        } else {
            concat!("rust@", env!("CARGO_PKG_RUST_VERSION")).to_owned()
        };

        Self {
            platform,
            runtime,
            sdk_versions: vec![concat!("unkey-http@", env!("CARGO_PKG_VERSION")).to_owned()],
        }
    }
}
