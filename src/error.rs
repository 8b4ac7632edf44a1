/// Error type returned by this crate.
///
/// Expected failures never panic and never surface as distinct kinds: the
/// upstream SDK family collapses transport errors and exhausted-retry HTTP
/// failures into a single `FETCH_ERROR` code, and this crate keeps that
/// contract.
#[derive(Debug, thiserror::Error)]
pub enum UnkeyError {
    /// Transport failure, non-2xx response after all retries, or an
    /// undecodable success body. `message` carries the transport error text
    /// or the raw body of the last failed response.
    #[error("fetch error: {message}")]
    Fetch { message: String },
}

impl UnkeyError {
    pub(crate) fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Stable machine-readable code, matching the upstream SDKs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "FETCH_ERROR",
        }
    }

    /// Human-readable message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Fetch { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UnkeyError;

    #[test]
    fn fetch_error_code_is_stable() {
        let err = UnkeyError::fetch("connection refused");
        assert_eq!(err.code(), "FETCH_ERROR");
        assert_eq!(err.message(), "connection refused");
        assert_eq!(err.to_string(), "fetch error: connection refused");
    }
}
