//! Static bearer-token gate

use hyper::header::AUTHORIZATION;
use hyper::HeaderMap;

use crate::response::ApiError;

/// Accepts requests carrying one of a fixed set of bearer tokens
///
/// Real token verification happens outside this service; the gate only keeps
/// the ledger from being reachable without a shared secret. With no tokens
/// configured every request passes.
#[derive(Debug, Clone, Default)]
pub struct TokenGate {
    tokens: Vec<String>,
}

impl TokenGate {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check the `Authorization` header
    pub fn check(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        if self.is_open() {
            return Ok(());
        }
        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        match presented {
            Some(token) if self.tokens.iter().any(|t| t == token) => Ok(()),
            _ => Err(ApiError::Unauthorized),
        }
    }
}
