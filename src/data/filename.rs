//! Filename Builder Module
//! Maps a year onto the name of its yearly accident file.

use std::fmt;
use thiserror::Error;

const FILE_PREFIX: &str = "accident_";
const FILE_SUFFIX: &str = ".csv.bz2";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("Cannot convert '{0}' to an integer")]
    NotNumeric(String),
    #[error("Value {0} is out of range")]
    OutOfRange(String),
}

/// Anything a caller may pass where an integer argument is expected:
/// plain integers, or strings holding a number.
pub trait IntegerArg {
    fn to_integer(&self) -> Result<i64, ArgError>;
}

macro_rules! integer_arg_for_ints {
    ($($t:ty),*) => {
        $(
            impl IntegerArg for $t {
                fn to_integer(&self) -> Result<i64, ArgError> {
                    i64::try_from(*self).map_err(|_| ArgError::OutOfRange(self.to_string()))
                }
            }
        )*
    };
}

integer_arg_for_ints!(i16, i32, i64, u16, u32, u64, usize);

impl IntegerArg for f64 {
    fn to_integer(&self) -> Result<i64, ArgError> {
        if !self.is_finite() {
            return Err(ArgError::NotNumeric(self.to_string()));
        }
        let truncated = self.trunc();
        if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
            return Err(ArgError::OutOfRange(self.to_string()));
        }
        Ok(truncated as i64)
    }
}

impl IntegerArg for str {
    fn to_integer(&self) -> Result<i64, ArgError> {
        let trimmed = self.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            return Ok(v);
        }
        // "2013.0" style input truncates like integer coercion does
        trimmed
            .parse::<f64>()
            .map_err(|_| ArgError::NotNumeric(self.to_string()))
            .and_then(|v| v.to_integer())
            .map_err(|_| ArgError::NotNumeric(self.to_string()))
    }
}

impl IntegerArg for String {
    fn to_integer(&self) -> Result<i64, ArgError> {
        self.as_str().to_integer()
    }
}

impl<T: IntegerArg + ?Sized> IntegerArg for &T {
    fn to_integer(&self) -> Result<i64, ArgError> {
        (**self).to_integer()
    }
}

/// A calendar year identifying one accident file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(i32);

impl Year {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Convert a loosely typed argument into a year.
    pub fn parse<A: IntegerArg + ?Sized>(arg: &A) -> Result<Self, ArgError> {
        let v = arg.to_integer()?;
        i32::try_from(v)
            .map(Self)
            .map_err(|_| ArgError::OutOfRange(v.to_string()))
    }

    /// Name of the accident file holding this year's records.
    pub fn filename(self) -> String {
        format!("{FILE_PREFIX}{}{FILE_SUFFIX}", self.0)
    }
}

impl From<i32> for Year {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the expected file name for a year's accident data.
pub fn make_filename<A: IntegerArg + ?Sized>(year: &A) -> Result<String, ArgError> {
    Year::parse(year).map(Year::filename)
}
