use crate::rules_engine::rules::CipherRules;
use crate::types::{ClassifiedCiphers, Verdict};

// Strong is checked first: a suite matching both lists is strong.
pub fn verdict(rules: &CipherRules, cipher: &str) -> Verdict {
  if rules.is_strong(cipher) {
    Verdict::Strong
  } else if rules.is_weak(cipher) {
    Verdict::Weak
  } else {
    Verdict::Unknown
  }
}

pub fn classify(rules: &CipherRules, ciphers: &[String]) -> ClassifiedCiphers {
  let mut out = ClassifiedCiphers::default();
  for cipher in ciphers {
    out.push(verdict(rules, cipher), cipher.clone());
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rules() -> CipherRules {
    CipherRules::new(["AES_256_GCM", "CHACHA20"], ["RC4", "3DES", "CBC"])
  }

  fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn weak_only_match_is_weak() {
    let out = classify(&rules(), &names(&["TLS_RSA_WITH_RC4_128_SHA"]));
    assert_eq!(out.weak, names(&["TLS_RSA_WITH_RC4_128_SHA"]));
    assert!(out.strong.is_empty());
    assert!(out.unknown.is_empty());
  }

  #[test]
  fn ake_suites_are_strong_even_with_empty_rules() {
    let out = classify(
      &CipherRules::default(),
      &names(&["TLS_AKE_WITH_AES_128_GCM_SHA256", "TLS_RSA_WITH_RC4_128_SHA"]),
    );
    assert_eq!(out.strong, names(&["TLS_AKE_WITH_AES_128_GCM_SHA256"]));
    assert_eq!(out.unknown, names(&["TLS_RSA_WITH_RC4_128_SHA"]));
  }

  #[test]
  fn overlap_goes_to_strong_once() {
    let out = classify(&rules(), &names(&["TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA384_AES_256_GCM"]));
    assert_eq!(out.strong.len(), 1);
    assert!(out.weak.is_empty());
    assert_eq!(verdict(&rules(), "TLS_X_AES_256_GCM_CBC"), Verdict::Strong);
  }

  #[test]
  fn partition_keeps_every_input_and_its_order() {
    let input = names(&[
      "TLS_RSA_WITH_3DES_EDE_CBC_SHA",
      "TLS_AES_256_GCM_SHA384",
      "TLS_FOO_BAR_SHA",
      "TLS_RSA_WITH_RC4_128_SHA",
      "TLS_CHACHA20_POLY1305_SHA256",
      "TLS_FOO_BAR_SHA",
      "TLS_RSA_WITH_RC4_128_MD5",
    ]);
    let out = classify(&rules(), &input);

    assert_eq!(out.len(), input.len());
    assert_eq!(
      out.strong,
      names(&["TLS_AES_256_GCM_SHA384", "TLS_CHACHA20_POLY1305_SHA256"])
    );
    assert_eq!(
      out.weak,
      names(&[
        "TLS_RSA_WITH_3DES_EDE_CBC_SHA",
        "TLS_RSA_WITH_RC4_128_SHA",
        "TLS_RSA_WITH_RC4_128_MD5",
      ])
    );
    assert_eq!(out.unknown, names(&["TLS_FOO_BAR_SHA", "TLS_FOO_BAR_SHA"]));

    let mut all: Vec<String> = out
      .strong
      .iter()
      .chain(&out.weak)
      .chain(&out.unknown)
      .cloned()
      .collect();
    let mut expected = input.clone();
    all.sort();
    expected.sort();
    assert_eq!(all, expected);
  }

  #[test]
  fn empty_input_gives_empty_partitions() {
    let out = classify(&rules(), &[]);
    assert!(out.is_empty());
  }
}
