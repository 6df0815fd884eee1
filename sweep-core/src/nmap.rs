use std::process::{Output, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;

use crate::cancel::CancelToken;
use crate::error::ScanError;

pub const DEFAULT_BINARY: &str = "nmap";
pub const SCRIPT: &str = "ssl-enum-ciphers";

/// Anything that can produce an nmap-style cipher listing for `host:port`.
#[async_trait]
pub trait Scanner: Send + Sync {
  async fn scan(&self, host: &str, port: u16) -> Result<String, ScanError>;
}

#[derive(Debug, Clone)]
pub struct NmapScanner {
  binary: String,
  timeout: Option<Duration>,
  cancel: CancelToken,
}

impl Default for NmapScanner {
  fn default() -> Self {
    Self::new(DEFAULT_BINARY)
  }
}

impl NmapScanner {
  pub fn new(binary: impl Into<String>) -> Self {
    Self {
      binary: binary.into(),
      timeout: None,
      cancel: CancelToken::never(),
    }
  }

  /// `None` lets a scan run for as long as nmap takes.
  pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
    self.cancel = cancel;
    self
  }

  pub fn binary(&self) -> &str {
    &self.binary
  }

  pub fn command_args(host: &str, port: u16) -> Vec<String> {
    vec![
      "-p".to_string(),
      port.to_string(),
      "--script".to_string(),
      SCRIPT.to_string(),
      host.to_string(),
    ]
  }

  pub async fn is_available(&self) -> bool {
    Command::new(&self.binary)
      .arg("--version")
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .kill_on_drop(true)
      .status()
      .await
      .map(|s| s.success())
      .unwrap_or(false)
  }

  // Dropping the returned future kills the child.
  async fn run(&self, host: &str, port: u16) -> Result<Output, ScanError> {
    let child = Command::new(&self.binary)
      .args(Self::command_args(host, port))
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()
      .map_err(|source| ScanError::Spawn {
        binary: self.binary.clone(),
        source,
      })?;

    match self.timeout {
      Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
        Ok(output) => output.map_err(ScanError::Wait),
        Err(_) => {
          tracing::info!(host = %host, port, timeout_s = limit.as_secs(), "scan timed out");
          Err(ScanError::Timeout { after: limit })
        }
      },
      None => child.wait_with_output().await.map_err(ScanError::Wait),
    }
  }
}

#[async_trait]
impl Scanner for NmapScanner {
  async fn scan(&self, host: &str, port: u16) -> Result<String, ScanError> {
    if self.cancel.is_cancelled() {
      return Err(ScanError::Cancelled);
    }

    tracing::debug!(binary = %self.binary, host = %host, port, "spawning scanner");
    let started = Instant::now();
    let output = tokio::select! {
      output = self.run(host, port) => output,
      _ = self.cancel.cancelled() => {
        tracing::info!(host = %host, port, "scan cancelled");
        return Err(ScanError::Cancelled);
      }
    };

    // Ctrl-C in a terminal reaches nmap too, and it often exits before the
    // flag is observed. Whatever it reported, the run was cancelled.
    if self.cancel.is_cancelled() {
      tracing::info!(host = %host, port, "scan cancelled");
      return Err(ScanError::Cancelled);
    }

    let output = output?;
    if !output.status.success() {
      return Err(ScanError::Exit {
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    tracing::debug!(
      host = %host,
      port,
      bytes = stdout.len(),
      elapsed_ms = started.elapsed().as_millis() as u64,
      "scanner finished"
    );
    Ok(stdout)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builds_ssl_enum_ciphers_invocation() {
    assert_eq!(
      NmapScanner::command_args("example.com", 8443),
      vec!["-p", "8443", "--script", "ssl-enum-ciphers", "example.com"]
    );
  }

  #[tokio::test]
  async fn missing_binary_is_a_spawn_error() {
    let scanner = NmapScanner::new("/nonexistent/ciphersweep-nmap");
    let err = scanner.scan("example.com", 443).await.unwrap_err();
    assert!(matches!(err, ScanError::Spawn { .. }));
    assert!(!scanner.is_available().await);
  }

  #[tokio::test]
  async fn pre_cancelled_scan_never_spawns() {
    let (handle, token) = CancelToken::new();
    handle.cancel();
    let scanner = NmapScanner::new("/nonexistent/ciphersweep-nmap").with_cancel(token);
    assert!(matches!(
      scanner.scan("example.com", 443).await,
      Err(ScanError::Cancelled)
    ));
  }

  // Script-backed cases share one test so their writes and spawns stay sequential.
  #[cfg(unix)]
  #[tokio::test]
  async fn scripted_scanner_outcomes() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = |name: &str, body: &str| {
      let path = dir.path().join(name);
      std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
      std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
      path.to_string_lossy().into_owned()
    };

    let ok = script("ok.sh", "echo \"target=$5 port=$2\"; echo TLS_AES_128_GCM_SHA256");
    let out = NmapScanner::new(ok).scan("example.com", 443).await.unwrap();
    assert!(out.contains("target=example.com port=443"));
    assert!(out.contains("TLS_AES_128_GCM_SHA256"));

    let failing = script("fail.sh", "echo boom >&2; exit 3");
    match NmapScanner::new(failing).scan("example.com", 443).await {
      Err(ScanError::Exit { stderr, .. }) => assert_eq!(stderr, "boom"),
      other => panic!("expected exit error, got {other:?}"),
    }

    let slow = script("slow.sh", "sleep 5");
    let started = Instant::now();
    let err = NmapScanner::new(slow.clone())
      .with_timeout(Some(Duration::from_millis(200)))
      .scan("example.com", 443)
      .await
      .unwrap_err();
    assert!(matches!(err, ScanError::Timeout { .. }));
    assert!(started.elapsed() < Duration::from_secs(4));

    // Flag tripped while the child is still running.
    let (handle, token) = CancelToken::new();
    let scanner = NmapScanner::new(slow).with_cancel(token);
    let started = Instant::now();
    let trip = async {
      tokio::time::sleep(Duration::from_millis(200)).await;
      handle.cancel();
    };
    let (result, ()) = tokio::join!(scanner.scan("example.com", 443), trip);
    assert!(matches!(result, Err(ScanError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(4));
  }
}
