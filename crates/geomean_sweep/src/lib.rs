pub mod driver;
pub mod export;
pub mod progress;
pub mod sort;

pub use driver::{DateRange, SweepSummary, fetch_date_range};
pub use export::{DEFAULT_COMMODITY_LABEL, DEFAULT_OUTPUT_PATH, export_csv, render_csv};
pub use progress::{LogProgress, ProgressSink, TerminalProgress};
pub use sort::sort_by_date;
