use std::sync::OnceLock;

use regex::Regex;

use crate::types::LegacyProtocolFlags;

pub const CIPHER_PATTERN: &str = r"TLS_[A-Z_]+(?:_[A-Z0-9]+)+";
pub const TLS1_0_MARKER: &str = "TLSv1.0";
pub const TLS1_1_MARKER: &str = "TLSv1.1";

fn cipher_regex() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(CIPHER_PATTERN).expect("cipher pattern is a valid regex"))
}

/// Every cipher suite name in `text`, in order of appearance. Suites listed
/// under several protocol versions appear once per listing.
pub fn extract_ciphers(text: &str) -> Vec<String> {
  cipher_regex()
    .find_iter(text)
    .map(|m| m.as_str().trim().to_string())
    .collect()
}

pub fn extract_legacy_protocol_flags(text: &str) -> LegacyProtocolFlags {
  LegacyProtocolFlags {
    tls1_0: text.contains(TLS1_0_MARKER),
    tls1_1: text.contains(TLS1_1_MARKER),
  }
}
