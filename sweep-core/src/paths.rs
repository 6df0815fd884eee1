use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "CIPHERSWEEP_HOME";

/// `$CIPHERSWEEP_HOME` when set, otherwise the working directory.
pub fn base_dir() -> anyhow::Result<PathBuf> {
  match std::env::var(HOME_ENV) {
    Ok(home) if !home.trim().is_empty() => Ok(PathBuf::from(home)),
    _ => Ok(std::env::current_dir()?),
  }
}

pub fn config_path(base: &Path) -> PathBuf {
  base.join("ciphersweep.toml")
}

pub fn resolve(base: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    base.join(path)
  }
}
