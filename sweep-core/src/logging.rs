use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "ciphersweep.log";

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn init_stderr(level: &str) -> anyhow::Result<()> {
  tracing_subscriber::registry()
    .with(filter(level))
    .with(stderr_layer())
    .try_init()?;
  Ok(())
}

pub fn init_file_and_stderr(
  log_dir: &Path,
  level: &str,
  retention_days: u64,
) -> anyhow::Result<()> {
  fs::create_dir_all(log_dir)?;
  cleanup_old_logs(log_dir, retention_days)?;

  let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
  let _ = FILE_GUARD.set(guard);

  let file_layer = tracing_subscriber::fmt::layer()
    .with_ansi(false)
    .with_writer(file_writer)
    .with_target(true);

  tracing_subscriber::registry()
    .with(filter(level))
    .with(file_layer)
    .with(stderr_layer())
    .try_init()?;
  Ok(())
}

// RUST_LOG, when set, wins over the configured level.
fn filter(level: &str) -> EnvFilter {
  EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(level))
    .unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
  S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
  tracing_subscriber::fmt::layer::<S>()
    .with_ansi(false)
    .with_writer(std::io::stderr)
    .with_target(false)
}

fn cleanup_old_logs(log_dir: &Path, retention_days: u64) -> anyhow::Result<()> {
  if retention_days == 0 {
    return Ok(());
  }

  let cutoff = SystemTime::now()
    .checked_sub(Duration::from_secs(retention_days.saturating_mul(24 * 60 * 60)))
    .unwrap_or(SystemTime::UNIX_EPOCH);

  let entries = match fs::read_dir(log_dir) {
    Ok(e) => e,
    Err(_) => return Ok(()),
  };

  for entry in entries.flatten() {
    let path: PathBuf = entry.path();
    if !is_log_file(&path) {
      continue;
    }

    let modified = match entry.metadata().and_then(|m| m.modified()) {
      Ok(t) => t,
      Err(_) => continue,
    };

    if modified < cutoff {
      let _ = fs::remove_file(&path);
    }
  }

  Ok(())
}

fn is_log_file(path: &Path) -> bool {
  let name = match path.file_name().and_then(|n| n.to_str()) {
    Some(n) => n,
    None => return false,
  };

  name == LOG_FILE_NAME || name.starts_with(&format!("{LOG_FILE_NAME}."))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recognizes_rolled_log_files() {
    assert!(is_log_file(Path::new("/var/log/ciphersweep.log")));
    assert!(is_log_file(Path::new("logs/ciphersweep.log.2024-05-01")));
    assert!(!is_log_file(Path::new("logs/other.log")));
    assert!(!is_log_file(Path::new("logs/ciphersweep.logger")));
  }

  #[test]
  fn cleanup_keeps_fresh_logs_and_foreign_files() {
    let dir = tempfile::tempdir().unwrap();
    let fresh = dir.path().join("ciphersweep.log.2099-01-01");
    let foreign = dir.path().join("notes.txt");
    fs::write(&fresh, "x").unwrap();
    fs::write(&foreign, "x").unwrap();

    cleanup_old_logs(dir.path(), 14).unwrap();
    assert!(fresh.exists());
    assert!(foreign.exists());
  }
}
