use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RulesError;

/// TLS 1.3 suites as printed by nmap (`TLS_AKE_WITH_...`). Always strong,
/// whatever the configured lists say.
pub const AKE_PREFIX: &str = "TLS_AKE_";

const BUNDLED_STRONG: &str = include_str!("../../rules/strong_ciphers.json");
const BUNDLED_WEAK: &str = include_str!("../../rules/weak_ciphers.json");

/// Strong and weak cipher name fragments. Matching is substring containment,
/// so `RC4` flags every suite that mentions it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CipherRules {
  strong: Vec<String>,
  weak: Vec<String>,
}

impl CipherRules {
  pub fn new<S, W>(strong: S, weak: W) -> Self
  where
    S: IntoIterator,
    S::Item: Into<String>,
    W: IntoIterator,
    W::Item: Into<String>,
  {
    Self {
      strong: normalize(strong),
      weak: normalize(weak),
    }
  }

  /// The lists shipped with the tool.
  pub fn bundled() -> Result<Self, RulesError> {
    Self::load(None, None)
  }

  /// Reads each list from its file, or uses the shipped list when no file is
  /// given.
  pub fn load(strong_path: Option<&Path>, weak_path: Option<&Path>) -> Result<Self, RulesError> {
    let strong = load_list(strong_path, BUNDLED_STRONG)?;
    let weak = load_list(weak_path, BUNDLED_WEAK)?;
    Ok(Self::new(strong, weak))
  }

  /// Like [`CipherRules::load`], but a list that cannot be loaded becomes
  /// empty. The errors are handed back so the caller can warn about them.
  pub fn load_lenient(
    strong_path: Option<&Path>,
    weak_path: Option<&Path>,
  ) -> (Self, Vec<RulesError>) {
    let mut errors = Vec::new();
    let mut take = |path: Option<&Path>, bundled: &str| match load_list(path, bundled) {
      Ok(list) => list,
      Err(e) => {
        tracing::debug!(error = %e, "cipher list unavailable; treating it as empty");
        errors.push(e);
        Vec::new()
      }
    };
    let strong = take(strong_path, BUNDLED_STRONG);
    let weak = take(weak_path, BUNDLED_WEAK);
    (Self::new(strong, weak), errors)
  }

  pub fn is_strong(&self, cipher: &str) -> bool {
    self.strong.iter().any(|s| cipher.contains(s.as_str())) || cipher.starts_with(AKE_PREFIX)
  }

  pub fn is_weak(&self, cipher: &str) -> bool {
    self.weak.iter().any(|w| cipher.contains(w.as_str()))
  }

  pub fn strong(&self) -> &[String] {
    &self.strong
  }

  pub fn weak(&self) -> &[String] {
    &self.weak
  }

  pub fn is_empty(&self) -> bool {
    self.strong.is_empty() && self.weak.is_empty()
  }
}

fn load_list(path: Option<&Path>, bundled: &str) -> Result<Vec<String>, RulesError> {
  let Some(path) = path else {
    return serde_json::from_str(bundled).map_err(|source| RulesError::Parse {
      path: PathBuf::from("<bundled>"),
      source,
    });
  };

  let raw = fs::read_to_string(path).map_err(|source| RulesError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  let list: Vec<String> = serde_json::from_str(&raw).map_err(|source| RulesError::Parse {
    path: path.to_path_buf(),
    source,
  })?;
  tracing::debug!(path = %path.display(), entries = list.len(), "loaded cipher list");
  Ok(list)
}

// An empty fragment would be contained in every cipher name.
fn normalize<I>(entries: I) -> Vec<String>
where
  I: IntoIterator,
  I::Item: Into<String>,
{
  let mut out: Vec<String> = Vec::new();
  for e in entries {
    let e: String = e.into();
    let e = e.trim();
    if e.is_empty() || out.iter().any(|x| x == e) {
      continue;
    }
    out.push(e.to_string());
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn write_list(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let p = dir.join(name);
    let mut f = fs::File::create(&p).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    p
  }

  #[test]
  fn substring_matching() {
    let rules = CipherRules::new(["AES_256_GCM"], ["RC4", "3DES"]);
    assert!(rules.is_strong("TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"));
    assert!(rules.is_weak("TLS_RSA_WITH_RC4_128_SHA"));
    assert!(rules.is_weak("TLS_RSA_WITH_3DES_EDE_CBC_SHA"));
    assert!(!rules.is_strong("TLS_RSA_WITH_RC4_128_SHA"));
    assert!(!rules.is_weak("TLS_AES_128_GCM_SHA256"));
  }

  #[test]
  fn ake_prefix_is_strong_without_config() {
    let rules = CipherRules::default();
    assert!(rules.is_strong("TLS_AKE_WITH_AES_128_GCM_SHA256"));
    assert!(!rules.is_strong("TLS_RSA_WITH_AES_128_GCM_SHA256"));
  }

  #[test]
  fn blank_and_duplicate_entries_are_dropped() {
    let rules = CipherRules::new(["", "  ", "GCM", "GCM"], Vec::<String>::new());
    assert_eq!(rules.strong(), ["GCM".to_string()]);
    assert!(!rules.is_strong("TLS_RSA_WITH_RC4_128_SHA"));
  }

  #[test]
  fn load_reads_json_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let strong = write_list(dir.path(), "strong.json", r#"["AES_256_GCM", "CHACHA20"]"#);
    let weak = write_list(dir.path(), "weak.json", r#"["RC4"]"#);

    let rules = CipherRules::load(Some(strong.as_path()), Some(weak.as_path())).unwrap();
    assert_eq!(rules.strong().len(), 2);
    assert_eq!(rules.weak(), ["RC4".to_string()]);
  }

  #[test]
  fn strict_load_reports_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_list(dir.path(), "good.json", r#"["RC4"]"#);
    let bad = write_list(dir.path(), "bad.json", "{ not json");
    let missing = dir.path().join("missing.json");

    let err = CipherRules::load(Some(missing.as_path()), Some(good.as_path())).unwrap_err();
    assert!(matches!(err, RulesError::Read { .. }));

    let err = CipherRules::load(Some(good.as_path()), Some(bad.as_path())).unwrap_err();
    assert!(matches!(err, RulesError::Parse { .. }));
  }

  #[test]
  fn lenient_load_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let weak = write_list(dir.path(), "weak.json", r#"["RC4"]"#);
    let missing = dir.path().join("missing.json");

    let (rules, errors) = CipherRules::load_lenient(Some(missing.as_path()), Some(weak.as_path()));
    assert_eq!(errors.len(), 1);
    assert!(rules.strong().is_empty());
    assert!(rules.is_weak("TLS_RSA_WITH_RC4_128_SHA"));
  }

  #[test]
  fn shipped_lists_are_built_in() {
    let rules = CipherRules::bundled().unwrap();
    assert!(rules.is_weak("TLS_RSA_WITH_RC4_128_SHA"));
    assert!(rules.is_strong("TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"));
    assert!(!rules.is_strong("TLS_RSA_WITH_RC4_128_SHA"));
  }

  #[test]
  fn unset_path_uses_the_shipped_list() {
    let dir = tempfile::tempdir().unwrap();
    let weak = write_list(dir.path(), "weak.json", r#"["CAMELLIA"]"#);

    let (rules, errors) = CipherRules::load_lenient(None, Some(weak.as_path()));
    assert!(errors.is_empty());
    assert!(rules.is_strong("TLS_AES_128_GCM_SHA256"));
    assert_eq!(rules.weak(), ["CAMELLIA".to_string()]);
    assert!(!rules.is_weak("TLS_RSA_WITH_RC4_128_SHA"));
  }
}
