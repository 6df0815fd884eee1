use crate::types::{ClassifiedCiphers, HostReport, LegacyProtocolFlags};

pub const DEFAULT_WRAP_WIDTH: usize = 50;

pub const HEADERS: [&str; 6] = [
  "Hostname",
  "Supports TLS 1.0",
  "Supports TLS 1.1",
  "Weak Ciphers",
  "Strong Ciphers",
  "Unknown Ciphers",
];

/// Severity hint for a rendered cell. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Alert,
  Safe,
  Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCell {
  pub text: String,
  pub tone: Tone,
}

impl DisplayCell {
  fn new(text: impl Into<String>, tone: Tone) -> Self {
    Self {
      text: text.into(),
      tone,
    }
  }
}

pub fn build_row(host: &str, legacy: LegacyProtocolFlags, ciphers: ClassifiedCiphers) -> HostReport {
  HostReport {
    host: host.to_string(),
    legacy,
    ciphers,
  }
}

impl HostReport {
  /// One cell per entry of [`HEADERS`].
  pub fn display_cells(&self, wrap_width: usize) -> [DisplayCell; 6] {
    [
      DisplayCell::new(self.host.clone(), Tone::Neutral),
      format_support(self.legacy.tls1_0),
      format_support(self.legacy.tls1_1),
      DisplayCell::new(format_ciphers(&self.ciphers.weak, wrap_width), Tone::Alert),
      DisplayCell::new(format_ciphers(&self.ciphers.strong, wrap_width), Tone::Safe),
      DisplayCell::new(format_ciphers(&self.ciphers.unknown, wrap_width), Tone::Neutral),
    ]
  }
}

pub fn format_support(supported: bool) -> DisplayCell {
  if supported {
    DisplayCell::new("Yes", Tone::Alert)
  } else {
    DisplayCell::new("No", Tone::Safe)
  }
}

pub fn format_ciphers(ciphers: &[String], wrap_width: usize) -> String {
  wrap(&ciphers.join(", "), wrap_width).join("\n")
}

/// Greedy word wrap. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
  let width = width.max(1);
  let mut lines = Vec::new();
  let mut line = String::new();
  let mut line_len = 0usize;

  for word in text.split_whitespace() {
    let mut word: Vec<char> = word.chars().collect();

    while word.len() > width {
      if line_len > 0 {
        lines.push(std::mem::take(&mut line));
        line_len = 0;
      }
      let rest = word.split_off(width);
      lines.push(word.into_iter().collect());
      word = rest;
    }

    if word.is_empty() {
      continue;
    }
    if line_len > 0 && line_len + 1 + word.len() > width {
      lines.push(std::mem::take(&mut line));
      line_len = 0;
    }
    if line_len > 0 {
      line.push(' ');
      line_len += 1;
    }
    line_len += word.len();
    line.extend(word);
  }

  if line_len > 0 {
    lines.push(line);
  }
  lines
}
