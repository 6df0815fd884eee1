use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use sweep_core::report::HEADERS;
use sweep_core::HostReport;

fn ansi_regex() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("ansi pattern is a valid regex"))
}

pub fn strip_ansi(text: &str) -> Cow<'_, str> {
  ansi_regex().replace_all(text, "")
}

pub fn write_csv(path: &Path, rows: &[HostReport], wrap_width: usize) -> anyhow::Result<()> {
  let file = std::fs::File::create(path)?;
  write_csv_to(file, rows, wrap_width)
}

pub fn write_csv_to<W: Write>(out: W, rows: &[HostReport], wrap_width: usize) -> anyhow::Result<()> {
  let mut writer = csv::Writer::from_writer(out);
  writer.write_record(HEADERS)?;
  for row in rows {
    let cells = row.display_cells(wrap_width);
    writer.write_record(cells.iter().map(|c| strip_ansi(&c.text).into_owned()))?;
  }
  writer.flush()?;
  Ok(())
}
