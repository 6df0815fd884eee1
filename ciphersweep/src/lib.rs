pub mod cli;
pub mod output;

use anyhow::Context;
use std::path::Path;
use std::time::Duration;

use sweep_core::batch::read_host_list;
use sweep_core::config::{self, Config};
use sweep_core::{logging, paths};
use sweep_core::{
  scan_hosts, BatchOptions, CancelToken, CipherRules, ConfigError, NmapScanner, RulesError,
};

pub use cli::Cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Success,
  NoResults,
  Cancelled,
  ConfigPrinted,
}

impl Outcome {
  pub fn code(self) -> u8 {
    match self {
      Outcome::Success | Outcome::ConfigPrinted => 0,
      Outcome::NoResults => 4,
      Outcome::Cancelled => 130,
    }
  }
}

/// Exit code for a run that failed outright: configuration problems get their
/// own code so scripts can tell them from I/O trouble.
pub fn error_code(err: &anyhow::Error) -> u8 {
  if err.downcast_ref::<RulesError>().is_some() || err.downcast_ref::<ConfigError>().is_some() {
    3
  } else {
    1
  }
}

pub async fn run(cli: Cli) -> anyhow::Result<Outcome> {
  if cli.no_color {
    console::set_colors_enabled(false);
    console::set_colors_enabled_stderr(false);
  }

  let base = paths::base_dir().context("resolve base directory")?;
  let config_path = cli
    .config
    .clone()
    .unwrap_or_else(|| paths::config_path(&base));
  let mut cfg = config::load_or_default(&config_path)?;
  cli.apply(&mut cfg);
  for reason in cfg.sanitize() {
    output::print_warning(&reason);
  }

  if cli.print_config {
    print!("{}", cfg.to_toml()?);
    return Ok(Outcome::ConfigPrinted);
  }

  init_logging(&cfg, &base)?;
  tracing::debug!(config = %config_path.display(), "configuration loaded");

  if !cli.no_banner {
    output::print_banner();
  }

  let rules = load_rules(&cfg, &base, cli.strict_rules)?;

  let (handle, cancel) = CancelToken::new();
  ctrlc::set_handler(move || handle.cancel()).context("install Ctrl-C handler")?;

  let timeout = match cfg.scan.timeout_seconds {
    0 => None,
    secs => Some(Duration::from_secs(secs)),
  };
  let scanner = NmapScanner::new(cfg.scan.nmap_path.clone())
    .with_timeout(timeout)
    .with_cancel(cancel.clone());
  if !scanner.is_available().await {
    anyhow::bail!(
      "`{}` is not installed or not runnable; install nmap or pass --nmap <PATH>",
      scanner.binary()
    );
  }

  let input = cli.input.as_deref().unwrap_or_default();
  let hosts = if cli.file {
    let path = Path::new(input);
    read_host_list(path).with_context(|| format!("read host list {}", path.display()))?
  } else {
    vec![input.trim().to_string()]
  };

  let opts = BatchOptions {
    workers: cfg.scan.workers,
    cancel,
  };
  let report = scan_hosts(
    &scanner,
    &rules,
    &hosts,
    cfg.scan.port,
    &opts,
    &output::print_event,
  )
  .await;

  if report.rows.is_empty() {
    println!("No results to display.");
    return Ok(if report.was_cancelled() {
      Outcome::Cancelled
    } else {
      Outcome::NoResults
    });
  }

  output::print_table(&report.rows, cfg.output.wrap_width);

  if let Some(path) = &cli.output {
    output::write_csv(path, &report.rows, cfg.output.wrap_width)
      .with_context(|| format!("write CSV {}", path.display()))?;
    println!("Results saved to {}", path.display());
  }

  if report.was_cancelled() {
    Ok(Outcome::Cancelled)
  } else {
    Ok(Outcome::Success)
  }
}

fn init_logging(cfg: &Config, base: &Path) -> anyhow::Result<()> {
  match &cfg.logging.dir {
    Some(dir) => {
      let dir = paths::resolve(base, dir);
      logging::init_file_and_stderr(&dir, &cfg.logging.level, cfg.logging.retention_days)
        .with_context(|| format!("initialize logging in {}", dir.display()))
    }
    None => logging::init_stderr(&cfg.logging.level).context("initialize logging"),
  }
}

pub fn load_rules(cfg: &Config, base: &Path, strict: bool) -> anyhow::Result<CipherRules> {
  let (strong, weak) = cfg.rule_paths(base);
  let (strong, weak) = (strong.as_deref(), weak.as_deref());
  if strict {
    return Ok(CipherRules::load(strong, weak)?);
  }

  let (rules, errors) = CipherRules::load_lenient(strong, weak);
  for e in &errors {
    output::print_warning(&e.to_string());
  }
  if rules.is_empty() {
    output::print_warning("no cipher rules loaded; every cipher except TLS 1.3 suites will be listed as unknown");
  }
  Ok(rules)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rule_errors_map_to_config_exit_code() {
    let err = anyhow::Error::new(RulesError::Read {
      path: "strong.json".into(),
      source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    })
    .context("load rules");
    assert_eq!(error_code(&err), 3);
    assert_eq!(error_code(&anyhow::anyhow!("disk full")), 1);
  }

  #[test]
  fn strict_rules_fail_and_lenient_rules_degrade() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.rules.strong_file = Some("missing-strong.json".into());
    cfg.rules.weak_file = Some("missing-weak.json".into());

    assert!(load_rules(&cfg, dir.path(), true).is_err());
    let rules = load_rules(&cfg, dir.path(), false).unwrap();
    assert!(rules.is_empty());
  }

  #[test]
  fn default_rules_do_not_depend_on_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    let rules = load_rules(&Config::default(), dir.path(), true).unwrap();
    assert!(rules.is_weak("TLS_RSA_WITH_RC4_128_SHA"));
    assert!(rules.is_strong("TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"));
  }
}
