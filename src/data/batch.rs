//! Year-Batch Reader Module
//! Loads several yearly files, tags rows with their year and isolates per-year failures.

use super::filename::{ArgError, IntegerArg, Year};
use super::loader::{fars_read, require_columns, LoaderError};
use polars::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

pub const MONTH_COLUMN: &str = "MONTH";
pub const YEAR_COLUMN: &str = "year";

#[derive(Error, Debug)]
pub enum YearReadError {
    #[error(transparent)]
    Year(#[from] ArgError),
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// One year's accident rows, projected to (MONTH, year).
#[derive(Debug, Clone)]
pub struct YearFrame {
    pub year: Year,
    pub frame: DataFrame,
}

/// A year that could not be loaded. Never fatal to the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearWarning {
    pub year: String,
    pub reason: String,
}

impl fmt::Display for YearWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid year: {} ({})", self.year, self.reason)
    }
}

/// Result of reading a batch of years: one entry per requested year, in request order.
#[derive(Debug, Clone, Default)]
pub struct YearBatch {
    pub frames: Vec<Option<YearFrame>>,
    pub warnings: Vec<YearWarning>,
}

impl YearBatch {
    /// Entries that loaded successfully.
    pub fn loaded(&self) -> impl Iterator<Item = &YearFrame> {
        self.frames.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Add the year column and keep only (MONTH, year).
pub fn tag_year(df: DataFrame, year: Year) -> PolarsResult<DataFrame> {
    df.lazy()
        .with_column(lit(year.value()).alias(YEAR_COLUMN))
        .select([
            col(MONTH_COLUMN).strict_cast(DataType::Int64),
            col(YEAR_COLUMN),
        ])
        .collect()
}

/// Load a single year from `data_dir` and project it. Failures are returned, not logged.
pub fn read_year<A>(data_dir: &Path, year: &A) -> Result<YearFrame, YearReadError>
where
    A: IntegerArg + ?Sized,
{
    let year = Year::parse(year)?;
    let path = data_dir.join(year.filename());
    let df = fars_read(&path)?;
    require_columns(&df, &path, &[MONTH_COLUMN])?;
    let frame = tag_year(df, year)?;
    Ok(YearFrame { year, frame })
}

/// Drop repeated requests for the same year, keeping the first in request order.
/// Unconvertible entries are compared by their text.
pub fn distinct_years<I>(years: I) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: IntegerArg + fmt::Display,
{
    let mut seen = BTreeSet::new();
    let mut seen_invalid = BTreeSet::new();
    years
        .into_iter()
        .filter(|year| match Year::parse(year) {
            Ok(y) => seen.insert(y),
            Err(_) => seen_invalid.insert(year.to_string()),
        })
        .collect()
}

/// Read every requested year. A year that fails becomes `None` plus a warning.
pub fn read_years<I>(data_dir: &Path, years: I) -> YearBatch
where
    I: IntoIterator,
    I::Item: IntegerArg + fmt::Display,
{
    years
        .into_iter()
        .fold(YearBatch::default(), |mut batch, year| {
            match read_year(data_dir, &year) {
                Ok(yf) => {
                    debug!(year = %yf.year, rows = yf.frame.height(), "year loaded");
                    batch.frames.push(Some(yf));
                }
                Err(e) => {
                    warn!(year = %year, error = %e, "invalid year");
                    batch.frames.push(None);
                    batch.warnings.push(YearWarning {
                        year: year.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
            batch
        })
}
