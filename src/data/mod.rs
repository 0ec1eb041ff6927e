//! Data module - accident file naming, loading and year batches

mod batch;
mod filename;
mod loader;

pub use batch::{
    distinct_years, read_year, read_years, tag_year, YearBatch, YearFrame, YearReadError,
    YearWarning, MONTH_COLUMN, YEAR_COLUMN,
};
pub use filename::{make_filename, ArgError, IntegerArg, Year};
pub use loader::{fars_read, require_columns, LoaderError};
