use std::fmt;
use std::sync::Arc;

/// Delay strategy between failed attempts.
///
/// Maps a zero-based attempt index to a delay in milliseconds. The strategy
/// is configuration data, not a hardcoded formula; callers can inject any
/// closure via [`Backoff::new`].
#[derive(Clone)]
pub struct Backoff(Arc<dyn Fn(u32) -> u64 + Send + Sync>);

impl Backoff {
    /// Builds a backoff from an arbitrary delay function.
    pub fn new(delay_fn: impl Fn(u32) -> u64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(delay_fn))
    }

    /// Unbounded exponential backoff: `round(e^n * 10)` milliseconds.
    ///
    /// Attempt 0 waits 10ms, attempt 5 waits 1484ms.
    pub fn exponential() -> Self {
        Self::new(|attempt| (f64::exp(f64::from(attempt)) * 10.0).round() as u64)
    }

    /// Delay before the retry that follows attempt `attempt`.
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        (self.0)(attempt)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::exponential()
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Backoff").field(&"<fn>").finish()
    }
}

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Delay strategy between failed attempts.
    pub backoff: Backoff,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_retries: 5,
            backoff: Backoff::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Backoff, ClientOptions};

    #[test]
    fn exponential_defaults() {
        let backoff = Backoff::default();
        let delays: Vec<u64> = (0..6).map(|n| backoff.delay_ms(n)).collect();
        assert_eq!(delays, vec![10, 27, 74, 201, 546, 1484]);
    }

    #[test]
    fn custom_strategy_is_injectable() {
        let backoff = Backoff::new(|attempt| u64::from(attempt) * 100);
        assert_eq!(backoff.delay_ms(0), 0);
        assert_eq!(backoff.delay_ms(3), 300);
    }

    #[test]
    fn default_options() {
        let opts = ClientOptions::default();
        assert_eq!(opts.timeout_ms, 10_000);
        assert_eq!(opts.max_retries, 5);
    }
}
