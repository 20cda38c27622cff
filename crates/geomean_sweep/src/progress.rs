use log::info;
use std::io::Write;

const BAR_WIDTH: usize = 40;

/// Observer for a date sweep.
pub trait ProgressSink {
    fn start(&mut self, total: u64);
    fn increment(&mut self);
    fn stop(&mut self);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counter {
    value: u64,
    total: u64,
}

impl Counter {
    fn percentage(&self) -> u64 {
        if self.total == 0 {
            return 100;
        }
        (self.value.min(self.total) * 100) / self.total
    }

    fn bar(&self) -> String {
        let filled = (self.percentage() as usize * BAR_WIDTH) / 100;
        format!(
            "{}{}",
            "\u{2588}".repeat(filled),
            "\u{2591}".repeat(BAR_WIDTH - filled)
        )
    }

    fn line(&self) -> String {
        format!(
            "Scraping Progress: {} {}% | {}/{} dates",
            self.bar(),
            self.percentage(),
            self.value,
            self.total
        )
    }
}

/// Redraws a single progress line on stderr.
#[derive(Debug, Default)]
pub struct TerminalProgress {
    counter: Counter,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn redraw(&self) {
        let mut stderr = std::io::stderr().lock();
        // a broken stderr only loses the indicator
        let _ = write!(stderr, "\r{}", self.counter.line());
        let _ = stderr.flush();
    }
}

impl ProgressSink for TerminalProgress {
    fn start(&mut self, total: u64) {
        self.counter = Counter { value: 0, total };
        self.redraw();
    }

    fn increment(&mut self) {
        self.counter.value += 1;
        self.redraw();
    }

    fn stop(&mut self) {
        let _ = writeln!(std::io::stderr());
    }
}

/// Emits a log line each time the whole percentage advances.
#[derive(Debug, Default)]
pub struct LogProgress {
    counter: Counter,
    last_percentage: Option<u64>,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn report(&mut self) {
        let percentage = self.counter.percentage();
        if self.last_percentage != Some(percentage) {
            self.last_percentage = Some(percentage);
            info!("{}", self.counter.line());
        }
    }
}

impl ProgressSink for LogProgress {
    fn start(&mut self, total: u64) {
        self.counter = Counter { value: 0, total };
        self.last_percentage = None;
        self.report();
    }

    fn increment(&mut self) {
        self.counter.value += 1;
        self.report();
    }

    fn stop(&mut self) {
        info!(
            "Scraping finished: {}/{} dates",
            self.counter.value, self.counter.total
        );
    }
}
