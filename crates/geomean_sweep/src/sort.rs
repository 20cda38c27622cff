use harga_model::PriceRecord;

/// Stable sort by the calendar date parsed back out of each record's token.
/// A token that fails to parse sorts first.
pub fn sort_by_date(records: &mut [PriceRecord]) {
    records.sort_by_cached_key(|record| record.date.to_naive_date().ok());
}
