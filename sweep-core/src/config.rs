use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::nmap;
use crate::report::DEFAULT_WRAP_WIDTH;

#[derive(Debug, Clone, Default)]
pub struct Config {
  pub scan: ScanConfig,
  pub rules: RulesConfig,
  pub output: OutputConfig,
  pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
  #[serde(default = "default_nmap_path")]
  pub nmap_path: String,

  #[serde(default = "default_port")]
  pub port: u16,

  /// `0` disables the per-scan timeout.
  #[serde(default = "default_timeout_seconds")]
  pub timeout_seconds: u64,

  #[serde(default = "default_workers")]
  pub workers: usize,
}

impl Default for ScanConfig {
  fn default() -> Self {
    Self {
      nmap_path: default_nmap_path(),
      port: default_port(),
      timeout_seconds: default_timeout_seconds(),
      workers: default_workers(),
    }
  }
}

/// Unset lists use the ones shipped with the tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub strong_file: Option<PathBuf>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub weak_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
  #[serde(default = "default_wrap_width")]
  pub wrap_width: usize,
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      wrap_width: default_wrap_width(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
  #[serde(default = "default_log_level")]
  pub level: String,

  #[serde(default = "default_retention_days")]
  pub retention_days: u64,

  #[serde(default)]
  pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      retention_days: default_retention_days(),
      dir: None,
    }
  }
}

fn default_nmap_path() -> String {
  nmap::DEFAULT_BINARY.to_string()
}

fn default_port() -> u16 {
  443
}

fn default_timeout_seconds() -> u64 {
  300
}

fn default_workers() -> usize {
  1
}

fn default_wrap_width() -> usize {
  DEFAULT_WRAP_WIDTH
}

fn default_log_level() -> String {
  "warn".to_string()
}

fn default_retention_days() -> u64 {
  14
}

const MIN_WRAP_WIDTH: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
  #[serde(default)]
  scan: Option<ScanConfig>,

  #[serde(default)]
  rules: Option<RulesConfig>,

  #[serde(default)]
  output: Option<OutputConfig>,

  #[serde(default)]
  logging: Option<LoggingConfig>,
}

impl ConfigFile {
  fn normalize(self) -> Config {
    let mut cfg = Config::default();
    if let Some(s) = self.scan {
      cfg.scan = s;
    }
    if let Some(r) = self.rules {
      cfg.rules = r;
    }
    if let Some(o) = self.output {
      cfg.output = o;
    }
    if let Some(l) = self.logging {
      cfg.logging = l;
    }
    cfg
  }
}

impl Config {
  /// Resets out-of-range values to their defaults and says what was reset.
  pub fn sanitize(&mut self) -> Vec<String> {
    let mut reasons = Vec::new();
    if self.scan.workers == 0 {
      self.scan.workers = default_workers();
      reasons.push("scan.workers must be >= 1; using 1".to_string());
    }
    if self.output.wrap_width < MIN_WRAP_WIDTH {
      reasons.push(format!(
        "output.wrap_width must be >= {MIN_WRAP_WIDTH}; using {}",
        default_wrap_width()
      ));
      self.output.wrap_width = default_wrap_width();
    }
    if self.scan.nmap_path.trim().is_empty() {
      self.scan.nmap_path = default_nmap_path();
      reasons.push("scan.nmap_path is empty; using `nmap`".to_string());
    }
    reasons
  }

  /// Configured rule files, relative entries resolved against `base`.
  pub fn rule_paths(&self, base: &Path) -> (Option<PathBuf>, Option<PathBuf>) {
    let resolve = |p: &Option<PathBuf>| p.as_deref().map(|p| crate::paths::resolve(base, p));
    (resolve(&self.rules.strong_file), resolve(&self.rules.weak_file))
  }

  pub fn to_toml(&self) -> anyhow::Result<String> {
    let file = ConfigFile {
      scan: Some(self.scan.clone()),
      rules: Some(self.rules.clone()),
      output: Some(self.output.clone()),
      logging: Some(self.logging.clone()),
    };
    Ok(toml::to_string_pretty(&file)?)
  }
}

/// A missing file means defaults. A file that exists but cannot be read or
/// parsed is an error. Values are not range-checked here; see
/// [`Config::sanitize`].
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
  if !path.exists() {
    return Ok(Config::default());
  }

  let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  parse(&raw).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

fn parse(raw: &str) -> Result<Config, toml::de::Error> {
  Ok(toml::from_str::<ConfigFile>(raw)?.normalize())
}
