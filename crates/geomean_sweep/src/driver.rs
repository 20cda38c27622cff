use chrono::NaiveDate;
use harga_model::{FetchStatus, PriceRecord, day_span, inclusive_day_count, next_day};
use log::debug;
use panelharga_api::api::{PanelHargaAPI, Transport};

use crate::progress::ProgressSink;

/// Every calendar day in `[start, end]`, in order.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange {
            next: Some(start),
            end,
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|date| *date <= self.end)?;
        self.next = next_day(current);
        Some(current)
    }
}

/// Fetches one record per day in `[start, end]`, one request at a time.
///
/// The progress total is the day difference between the bounds, so a sink
/// sees one more increment than its total.
pub async fn fetch_date_range<T: Transport>(
    api: &PanelHargaAPI<T>,
    start: NaiveDate,
    end: NaiveDate,
    province_id: i64,
    mut progress: Option<&mut dyn ProgressSink>,
) -> Vec<PriceRecord> {
    let total = day_span(start, end).max(0) as u64;
    let mut results = Vec::with_capacity(inclusive_day_count(start, end));

    debug!(
        "fetch_date_range | {} to {} | province_id: {}",
        start, end, province_id
    );

    if let Some(sink) = progress.as_deref_mut() {
        sink.start(total);
    }

    for date in DateRange::new(start, end) {
        results.push(api.get_geomean(date, province_id).await);
        if let Some(sink) = progress.as_deref_mut() {
            sink.increment();
        }
    }

    if let Some(sink) = progress.as_deref_mut() {
        sink.stop();
    }

    results
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub found: usize,
    pub no_data: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl SweepSummary {
    pub fn from_records(records: &[PriceRecord]) -> Self {
        let mut summary = SweepSummary::default();
        for record in records {
            match record.status {
                FetchStatus::Found => summary.found += 1,
                FetchStatus::NoData => summary.no_data += 1,
                FetchStatus::NotFound => summary.not_found += 1,
                FetchStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.found + self.no_data + self.not_found + self.failed
    }
}
