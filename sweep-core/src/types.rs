use serde::{Deserialize, Serialize};

use crate::error::SkipReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
  Strong,
  Weak,
  Unknown,
}

/// Deprecated protocol versions advertised in the scan output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyProtocolFlags {
  pub tls1_0: bool,
  pub tls1_1: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedCiphers {
  pub strong: Vec<String>,
  pub weak: Vec<String>,
  pub unknown: Vec<String>,
}

impl ClassifiedCiphers {
  pub fn push(&mut self, verdict: Verdict, cipher: String) {
    match verdict {
      Verdict::Strong => self.strong.push(cipher),
      Verdict::Weak => self.weak.push(cipher),
      Verdict::Unknown => self.unknown.push(cipher),
    }
  }

  pub fn len(&self) -> usize {
    self.strong.len() + self.weak.len() + self.unknown.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostReport {
  pub host: String,
  pub legacy: LegacyProtocolFlags,
  pub ciphers: ClassifiedCiphers,
}

#[derive(Debug)]
pub struct SkippedHost {
  pub host: String,
  pub reason: SkipReason,
}

/// Outcome of one run over a host list. `rows` and `skipped` both keep the
/// input order.
#[derive(Debug)]
pub struct ScanReport {
  pub scan_id: String,
  pub port: u16,
  pub rows: Vec<HostReport>,
  pub skipped: Vec<SkippedHost>,
  pub started_at_unix_ms: u64,
  pub finished_at_unix_ms: u64,
}

impl ScanReport {
  pub fn new(port: u16) -> Self {
    Self {
      scan_id: uuid::Uuid::new_v4().to_string(),
      port,
      rows: Vec::new(),
      skipped: Vec::new(),
      started_at_unix_ms: now_unix_ms(),
      finished_at_unix_ms: 0,
    }
  }

  pub fn was_cancelled(&self) -> bool {
    self.skipped.iter().any(|s| s.reason.is_cancelled())
  }

  pub fn elapsed_ms(&self) -> u64 {
    self
      .finished_at_unix_ms
      .saturating_sub(self.started_at_unix_ms)
  }
}

pub fn now_unix_ms() -> u64 {
  use std::time::{SystemTime, UNIX_EPOCH};
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or_default()
    .as_millis() as u64
}
