mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::PhaseProgress;
use styling::{brand, label};
pub use summary::print_summary;

/// Prints the `stepstats` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        brand("⏱️ stepstats"),
        label(env!("CARGO_PKG_VERSION")),
        label("GitHub Actions step duration statistics")
    );
}
