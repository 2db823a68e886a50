use time::Date;

/// Every calendar date from `start` through `end`, inclusive. Empty when the
/// range is inverted.
pub fn days_inclusive(start: Date, end: Date) -> Vec<Date> {
    std::iter::successors(Some(start), |d| d.next_day().filter(|next| *next <= end))
        .take_while(|d| *d <= end)
        .collect()
}
