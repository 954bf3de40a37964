use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color as TableColor, ContentArrangement, Table};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn seconds_cell(seconds: f64) -> Cell {
    Cell::new(format!("{seconds:.2}s")).set_alignment(CellAlignment::Right)
}

/// Standard deviation colored by its ratio to the mean: tight (<10%),
/// noticeable (<25%) or noisy.
pub fn color_coded_spread_cell(std_dev: f64, mean: f64) -> Cell {
    let cell = seconds_cell(std_dev);
    if mean <= 0.0 {
        return cell;
    }

    let ratio = std_dev / mean;
    if ratio < 0.10 {
        cell.fg(TableColor::Green)
    } else if ratio < 0.25 {
        cell.fg(TableColor::Yellow)
    } else {
        cell.fg(TableColor::Red)
    }
}
