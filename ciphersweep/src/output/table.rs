use comfy_table::presets::ASCII_FULL;
use comfy_table::{
  Attribute, Cell, Color, ColumnConstraint, ContentArrangement, Table, TableComponent, Width,
};

use sweep_core::report::{DisplayCell, Tone, HEADERS};
use sweep_core::HostReport;

/// Indices of the weak, strong and unknown cipher columns.
const CIPHER_COLUMNS: [usize; 3] = [3, 4, 5];

pub fn print_table(rows: &[HostReport], wrap_width: usize) {
  println!("{}", render_table(rows, wrap_width, console::colors_enabled()));
}

pub fn render_table(rows: &[HostReport], wrap_width: usize, color: bool) -> String {
  let mut table = Table::new();
  table.load_preset(ASCII_FULL);
  // Grid look: column junctions on the header rule too.
  table.set_style(TableComponent::MiddleHeaderIntersections, '+');
  table.set_content_arrangement(ContentArrangement::Disabled);
  if color {
    table.enforce_styling();
  } else {
    table.force_no_tty();
  }

  table.set_header(
    HEADERS
      .iter()
      .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
  );

  for row in rows {
    table.add_row(row.display_cells(wrap_width).into_iter().map(cell));
  }

  let cap = u16::try_from(wrap_width).unwrap_or(u16::MAX);
  for idx in CIPHER_COLUMNS {
    if let Some(column) = table.column_mut(idx) {
      column.set_constraint(ColumnConstraint::UpperBoundary(Width::Fixed(cap)));
    }
  }

  table.to_string()
}

fn cell(c: DisplayCell) -> Cell {
  let cell = Cell::new(c.text);
  match c.tone {
    Tone::Alert => cell.fg(Color::Red),
    Tone::Safe => cell.fg(Color::Green),
    Tone::Neutral => cell,
  }
}
