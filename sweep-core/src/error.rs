use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure of a single scanner invocation. Always host-local: the batch skips
/// the host and carries on.
#[derive(Debug, Error)]
pub enum ScanError {
  #[error("failed to start `{binary}`: {source}")]
  Spawn {
    binary: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed waiting for scanner: {0}")]
  Wait(#[source] std::io::Error),

  #[error("scanner exited with {status}: {stderr}")]
  Exit { status: String, stderr: String },

  #[error("scan timed out after {}s", .after.as_secs())]
  Timeout { after: Duration },

  #[error("scan cancelled")]
  Cancelled,
}

/// Why a host produced no report row.
#[derive(Debug, Error)]
pub enum SkipReason {
  #[error(transparent)]
  Scan(#[from] ScanError),

  #[error("scanner returned no output")]
  EmptyOutput,

  #[error("no ciphers found")]
  NoCiphers,
}

impl SkipReason {
  pub fn is_cancelled(&self) -> bool {
    matches!(self, SkipReason::Scan(ScanError::Cancelled))
  }
}

#[derive(Debug, Error)]
pub enum RulesError {
  #[error("cannot read cipher list {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid cipher list {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("cannot read config {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid config {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}
