//! Stats module - monthly accident summaries

mod summary;

pub use summary::{count_by_month, summarize, MonthlyCounts, SummaryError, MONTHS};
