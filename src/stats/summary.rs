//! Monthly Summary Module
//! Counts accidents per (year, month) and spreads years into columns.

use crate::data::{YearBatch, MONTH_COLUMN, YEAR_COLUMN};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

/// Months are the fixed row domain of the summary.
pub const MONTHS: usize = 12;

const COUNT_COLUMN: &str = "n";

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Dense month x year grid of accident counts. Missing combinations are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyCounts {
    by_year: BTreeMap<i32, [u32; MONTHS]>,
}

impl MonthlyCounts {
    /// Register a year so it gets a column even when it has no rows.
    pub fn add_year(&mut self, year: i32) {
        self.by_year.entry(year).or_insert([0; MONTHS]);
    }

    /// Add `count` accidents. Returns false when the month is outside 1..=12.
    pub fn add(&mut self, year: i32, month: i64, count: u32) -> bool {
        if !(1..=MONTHS as i64).contains(&month) {
            return false;
        }
        let row = self.by_year.entry(year).or_insert([0; MONTHS]);
        row[(month - 1) as usize] += count;
        true
    }

    pub fn get(&self, year: i32, month: usize) -> Option<u32> {
        if !(1..=MONTHS).contains(&month) {
            return None;
        }
        self.by_year.get(&year).map(|row| row[month - 1])
    }

    /// Years in ascending order.
    pub fn years(&self) -> Vec<i32> {
        self.by_year.keys().copied().collect()
    }

    /// `MONTH` column followed by one column per year.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.by_year.len() + 1);
        columns.push(Column::new(
            MONTH_COLUMN.into(),
            (1..=MONTHS as i32).collect::<Vec<i32>>(),
        ));
        for (year, row) in &self.by_year {
            columns.push(Column::new(year.to_string().into(), row.to_vec()));
        }
        DataFrame::new(columns)
    }
}

/// Group the loaded years by (year, month) and count rows.
///
/// A year requested more than once is counted once.
pub fn count_by_month(batch: &YearBatch) -> Result<MonthlyCounts, SummaryError> {
    let mut counts = MonthlyCounts::default();
    let mut seen = BTreeSet::new();
    let mut frames: Vec<LazyFrame> = Vec::new();

    for yf in batch.loaded() {
        if seen.insert(yf.year) {
            counts.add_year(yf.year.value());
            frames.push(yf.frame.clone().lazy());
        }
    }

    if frames.is_empty() {
        return Ok(counts);
    }

    let grouped = concat(frames, UnionArgs::default())?
        .group_by([col(YEAR_COLUMN), col(MONTH_COLUMN)])
        .agg([len().alias(COUNT_COLUMN)])
        .collect()?;

    let years = grouped.column(YEAR_COLUMN)?.cast(&DataType::Int32)?;
    let months = grouped.column(MONTH_COLUMN)?.cast(&DataType::Int64)?;
    let n = grouped.column(COUNT_COLUMN)?.cast(&DataType::UInt32)?;

    let mut dropped = 0u64;
    for ((year, month), count) in years
        .i32()?
        .into_iter()
        .zip(months.i64()?.into_iter())
        .zip(n.u32()?.into_iter())
    {
        let (Some(year), Some(count)) = (year, count) else {
            continue;
        };
        let placed = match month {
            Some(m) => counts.add(year, m, count),
            None => false,
        };
        if !placed {
            dropped += u64::from(count);
        }
    }

    if dropped > 0 {
        debug!(rows = dropped, "rows outside months 1-12 left out of summary");
    }
    Ok(counts)
}

/// Build the monthly summary table for a batch.
pub fn summarize(batch: &YearBatch) -> Result<DataFrame, SummaryError> {
    let counts = count_by_month(batch)?;
    Ok(counts.to_dataframe()?)
}
