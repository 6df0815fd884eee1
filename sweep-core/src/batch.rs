use std::fs;
use std::path::Path;

use futures::stream::{self, StreamExt};

use crate::cancel::CancelToken;
use crate::error::{ScanError, SkipReason};
use crate::nmap::Scanner;
use crate::parser::{extract_ciphers, extract_legacy_protocol_flags};
use crate::report::build_row;
use crate::rules_engine::{classify, CipherRules};
use crate::types::{now_unix_ms, HostReport, ScanReport, SkippedHost};

#[derive(Debug, Clone)]
pub struct BatchOptions {
  pub workers: usize,
  pub cancel: CancelToken,
}

impl Default for BatchOptions {
  fn default() -> Self {
    Self {
      workers: 1,
      cancel: CancelToken::never(),
    }
  }
}

/// Progress notifications, in completion order.
#[derive(Debug)]
pub enum BatchEvent<'a> {
  Started { host: &'a str, port: u16 },
  Finished { report: &'a HostReport },
  Skipped { host: &'a str, reason: &'a SkipReason },
}

pub async fn scan_host<S>(
  scanner: &S,
  rules: &CipherRules,
  host: &str,
  port: u16,
) -> Result<HostReport, SkipReason>
where
  S: Scanner + ?Sized,
{
  let raw = scanner.scan(host, port).await?;
  if raw.trim().is_empty() {
    return Err(SkipReason::EmptyOutput);
  }

  let ciphers = extract_ciphers(&raw);
  let legacy = extract_legacy_protocol_flags(&raw);
  if ciphers.is_empty() {
    return Err(SkipReason::NoCiphers);
  }

  let classified = classify(rules, &ciphers);
  tracing::info!(
    host = %host,
    port,
    strong = classified.strong.len(),
    weak = classified.weak.len(),
    unknown = classified.unknown.len(),
    tls1_0 = legacy.tls1_0,
    tls1_1 = legacy.tls1_1,
    "host classified"
  );
  Ok(build_row(host, legacy, classified))
}

pub fn read_host_list(path: &Path) -> std::io::Result<Vec<String>> {
  let raw = fs::read_to_string(path)?;
  Ok(parse_host_list(&raw))
}

/// One host per line. Surrounding whitespace is trimmed; blank lines and
/// `#` comments are ignored.
pub fn parse_host_list(raw: &str) -> Vec<String> {
  raw
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty() && !l.starts_with('#'))
    .map(str::to_string)
    .collect()
}

/// Scans every host, at most `opts.workers` at a time. A host that fails is
/// recorded in `skipped`; it never stops the others. Rows keep input order.
pub async fn scan_hosts<S>(
  scanner: &S,
  rules: &CipherRules,
  hosts: &[String],
  port: u16,
  opts: &BatchOptions,
  on_event: &(dyn Fn(&BatchEvent<'_>) + Sync),
) -> ScanReport
where
  S: Scanner + ?Sized,
{
  let mut report = ScanReport::new(port);
  let workers = opts.workers.clamp(1, hosts.len().max(1));
  tracing::info!(
    scan_id = %report.scan_id,
    hosts = hosts.len(),
    port,
    workers,
    "batch started"
  );

  let outcomes: Vec<(&String, Result<HostReport, SkipReason>)> = stream::iter(hosts)
    .map(move |host| async move {
      let outcome = if opts.cancel.is_cancelled() {
        Err(SkipReason::Scan(ScanError::Cancelled))
      } else {
        on_event(&BatchEvent::Started { host, port });
        match scan_host(scanner, rules, host, port).await {
          // A failure while the run is being torn down is the cancellation itself.
          Err(_) if opts.cancel.is_cancelled() => Err(SkipReason::Scan(ScanError::Cancelled)),
          other => other,
        }
      };
      match &outcome {
        Ok(row) => on_event(&BatchEvent::Finished { report: row }),
        Err(reason) => {
          if !reason.is_cancelled() {
            tracing::info!(host = %host, port, reason = %reason, "host skipped");
          }
          on_event(&BatchEvent::Skipped { host, reason });
        }
      }
      (host, outcome)
    })
    .buffered(workers)
    .collect()
    .await;

  for (host, outcome) in outcomes {
    match outcome {
      Ok(row) => report.rows.push(row),
      Err(reason) => report.skipped.push(SkippedHost {
        host: host.clone(),
        reason,
      }),
    }
  }

  report.finished_at_unix_ms = now_unix_ms();
  tracing::info!(
    scan_id = %report.scan_id,
    rows = report.rows.len(),
    skipped = report.skipped.len(),
    elapsed_ms = report.elapsed_ms(),
    "batch finished"
  );
  report
}
