//! Exchange Error Taxonomy
//!
//! Every adapter and strategy call returns `Result<_, ExchangeError>`.
//! Variants map onto three kinds the driver reports on:
//! - `Transport`: RPC node or backend unreachable, timed out
//! - `Application`: contract revert, non-2xx status, malformed body
//! - `Logic`: local failure (bad state, signer error, unwired capability)

use thiserror::Error;

/// Coarse classification used for logging and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// Network or RPC failure before a response was obtained.
  Transport,
  /// The remote side answered, but with an error or an unusable payload.
  Application,
  /// Local invariant violated or capability missing.
  Logic,
}

impl ErrorKind {
  /// Stable lowercase label for metrics and log fields.
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Transport => "transport",
      Self::Application => "application",
      Self::Logic => "logic",
    }
  }
}

impl std::fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
pub enum ExchangeError {
  /// Could not reach the RPC node or HTTP backend.
  #[error("transport error: {0}")]
  Transport(String),

  /// The remote side rejected the call (revert, RPC error, non-2xx).
  #[error("application error: {0}")]
  Application(String),

  /// The response body did not match the expected schema.
  #[error("failed to decode {context}: {reason}")]
  Decode {
    /// What was being decoded.
    context: String,
    /// Decoder message.
    reason: String,
  },

  /// Local state made the requested operation impossible.
  #[error("logic error: {0}")]
  Logic(String),

  /// The operation has no backing implementation in this deployment.
  #[error("not implemented: {0}")]
  NotImplemented(&'static str),
}

impl ExchangeError {
  /// Classify this error.
  pub const fn kind(&self) -> ErrorKind {
    match self {
      Self::Transport(_) => ErrorKind::Transport,
      Self::Application(_) | Self::Decode { .. } => ErrorKind::Application,
      Self::Logic(_) | Self::NotImplemented(_) => ErrorKind::Logic,
    }
  }

  pub fn decode(context: impl Into<String>, reason: impl std::fmt::Display) -> Self {
    Self::Decode {
      context: context.into(),
      reason: reason.to_string(),
    }
  }
}

impl From<reqwest::Error> for ExchangeError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_decode() {
      Self::decode("response body", e)
    } else if e.is_status() {
      Self::Application(e.to_string())
    } else {
      Self::Transport(e.to_string())
    }
  }
}

impl From<alloy::transports::TransportError> for ExchangeError {
  fn from(e: alloy::transports::TransportError) -> Self {
    use alloy::transports::RpcError;

    match e {
      // The node answered with a JSON-RPC error object: reverts, nonce
      // too low, insufficient funds all land here.
      RpcError::ErrorResp(payload) => Self::Application(payload.to_string()),
      RpcError::DeserError { err, text } => {
        Self::decode("rpc response", format!("{err}: {text}"))
      }
      RpcError::NullResp => Self::Application("null rpc response".to_string()),
      // Signer or filler failed before anything left the process.
      RpcError::LocalUsageError(err) => Self::Logic(format!("local rpc usage: {err}")),
      other => Self::Transport(other.to_string()),
    }
  }
}

impl From<alloy::sol_types::Error> for ExchangeError {
  fn from(e: alloy::sol_types::Error) -> Self {
    Self::decode("contract return data", e)
  }
}

/// Convenience alias for adapter results.
pub type ExchangeResult<T> = Result<T, ExchangeError>;
