//! FARS Toolkit - yearly accident file summaries and state maps
//!
//! Reads `accident_<year>.csv.bz2` files from the Fatality Analysis Reporting System,
//! counts accidents per month across years and plots accident locations for one state.

pub mod charts;
pub mod config;
pub mod data;
pub mod stats;

use charts::{MapError, MapOptions, MapOutcome};
use data::{IntegerArg, YearBatch};
use polars::prelude::DataFrame;
use stats::SummaryError;
use std::fmt;
use std::path::{Path, PathBuf};

pub use data::{fars_read, make_filename};

/// Entry point for the year-based operations, bound to a data directory.
#[derive(Debug, Clone)]
pub struct FarsReader {
    data_dir: PathBuf,
}

impl Default for FarsReader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FarsReader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Read each year, one entry per requested year. Failures become warnings.
    pub fn read_years<I>(&self, years: I) -> YearBatch
    where
        I: IntoIterator,
        I::Item: IntegerArg + fmt::Display,
    {
        data::read_years(&self.data_dir, years)
    }

    /// Monthly accident counts: months 1-12 as rows, one column per loaded year.
    /// A year requested more than once is read once.
    pub fn summarize_years<I>(&self, years: I) -> Result<DataFrame, SummaryError>
    where
        I: IntoIterator,
        I::Item: IntegerArg + fmt::Display,
    {
        stats::summarize(&self.read_years(data::distinct_years(years)))
    }

    /// Plot the accidents of one state in one year.
    pub fn map_state<S, Y>(
        &self,
        state: &S,
        year: &Y,
        options: &MapOptions,
    ) -> Result<MapOutcome, MapError>
    where
        S: IntegerArg + ?Sized,
        Y: IntegerArg + ?Sized,
    {
        charts::map_state(&self.data_dir, state, year, options)
    }
}

/// [`FarsReader::read_years`] against the current directory.
pub fn fars_read_years<I>(years: I) -> YearBatch
where
    I: IntoIterator,
    I::Item: IntegerArg + fmt::Display,
{
    FarsReader::default().read_years(years)
}

/// [`FarsReader::summarize_years`] against the current directory.
pub fn fars_summarize_years<I>(years: I) -> Result<DataFrame, SummaryError>
where
    I: IntoIterator,
    I::Item: IntegerArg + fmt::Display,
{
    FarsReader::default().summarize_years(years)
}

/// [`FarsReader::map_state`] against the current directory.
pub fn fars_map_state<S, Y>(state: &S, year: &Y, options: &MapOptions) -> Result<MapOutcome, MapError>
where
    S: IntegerArg + ?Sized,
    Y: IntegerArg + ?Sized,
{
    FarsReader::default().map_state(state, year, options)
}
