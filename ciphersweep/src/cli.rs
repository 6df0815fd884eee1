use clap::Parser;
use std::path::PathBuf;

use sweep_core::config::Config;

#[derive(Parser, Debug, Clone)]
#[command(name = "ciphersweep")]
#[command(version)]
#[command(about = "CipherSweep: TLS cipher strength scanner using nmap", long_about = None)]
pub struct Cli {
  /// Hostname to scan, or a file of hostnames when --file is given
  #[arg(value_name = "INPUT", required_unless_present = "print_config")]
  pub input: Option<String>,

  /// Port to scan [default: 443]
  #[arg(long)]
  pub port: Option<u16>,

  /// Treat INPUT as a file with one hostname per line
  #[arg(long)]
  pub file: bool,

  /// Write the results to this CSV file
  #[arg(long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Config file [default: $CIPHERSWEEP_HOME/ciphersweep.toml]
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// JSON list of strong cipher fragments [default: built-in list]
  #[arg(long, value_name = "FILE")]
  pub strong_rules: Option<PathBuf>,

  /// JSON list of weak cipher fragments [default: built-in list]
  #[arg(long, value_name = "FILE")]
  pub weak_rules: Option<PathBuf>,

  /// Abort when a cipher list cannot be loaded instead of treating it as empty
  #[arg(long)]
  pub strict_rules: bool,

  /// Per-host scan timeout in seconds, 0 for none [default: 300]
  #[arg(long, value_name = "SECS")]
  pub timeout: Option<u64>,

  /// Hosts scanned in parallel [default: 1]
  #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
  pub workers: Option<u16>,

  /// nmap binary to run [default: nmap]
  #[arg(long, value_name = "PATH")]
  pub nmap: Option<String>,

  /// Directory for rolling log files
  #[arg(long, value_name = "DIR")]
  pub log_dir: Option<PathBuf>,

  /// Disable colored output
  #[arg(long)]
  pub no_color: bool,

  /// Skip the startup banner
  #[arg(long)]
  pub no_banner: bool,

  /// Debug logging on stderr
  #[arg(short, long)]
  pub verbose: bool,

  /// Print the effective configuration as TOML and exit
  #[arg(long)]
  pub print_config: bool,
}

impl Cli {
  /// Command-line flags take precedence over the config file.
  pub fn apply(&self, cfg: &mut Config) {
    if let Some(port) = self.port {
      cfg.scan.port = port;
    }
    if let Some(timeout) = self.timeout {
      cfg.scan.timeout_seconds = timeout;
    }
    if let Some(workers) = self.workers {
      cfg.scan.workers = workers as usize;
    }
    if let Some(nmap) = &self.nmap {
      cfg.scan.nmap_path = nmap.clone();
    }
    if let Some(p) = &self.strong_rules {
      cfg.rules.strong_file = Some(p.clone());
    }
    if let Some(p) = &self.weak_rules {
      cfg.rules.weak_file = Some(p.clone());
    }
    if let Some(dir) = &self.log_dir {
      cfg.logging.dir = Some(dir.clone());
    }
    if self.verbose {
      cfg.logging.level = "debug".to_string();
    }
  }
}
