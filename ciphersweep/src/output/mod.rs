mod banner;
pub mod csv;
pub mod table;

pub use banner::print_banner;
pub use self::csv::{strip_ansi, write_csv, write_csv_to};
pub use self::table::{print_table, render_table};

use console::style;
use sweep_core::BatchEvent;

pub fn print_event(event: &BatchEvent<'_>) {
  match event {
    BatchEvent::Started { host, port } => println!("Scanning {host}:{port}..."),
    BatchEvent::Finished { .. } => {}
    BatchEvent::Skipped { reason, .. } if reason.is_cancelled() => {}
    BatchEvent::Skipped { host, reason } => {
      eprintln!("  {} {host}: {reason}", style("skipped").yellow().bold());
    }
  }
}

pub fn print_warning(message: &str) {
  eprintln!("{} {message}", style("Warning:").yellow().bold());
}
